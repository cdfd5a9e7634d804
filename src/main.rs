use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use log::{error, LevelFilter};
use std::path::Path;
use std::process;

use czikit::commands::{CommandFactory, CziCommandFactory};
use czikit::config::Config;
use czikit::utils::logger::Logger;

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input CZI file")
        .required(true)
        .index(1)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .help("Array format (npy, csv, json, png, tif)")
        .value_name("FORMAT")
        .required(false)
}

fn build_cli() -> ClapCommand {
    ClapCommand::new("czikit")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Extract scenes and subblocks from Zeiss CZI microscopy files")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Operation journal file")
                .value_name("FILE")
                .global(true),
        )
        .subcommand(
            ClapCommand::new("info")
                .about("Show the structure of a CZI file")
                .arg(input_arg()),
        )
        .subcommand(
            ClapCommand::new("metadata")
                .about("Print the metadata XML")
                .arg(input_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write the XML to this file")
                        .value_name("FILE"),
                )
                .arg(
                    Arg::new("summary")
                        .long("summary")
                        .help("Print only the declared image sizes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            ClapCommand::new("scene")
                .about("Extract a scene or pixel box from channel 0")
                .arg(input_arg())
                .arg(
                    Arg::new("region")
                        .short('r')
                        .long("region")
                        .help("Scene index (negative for all scenes) or 'x,y,w,h'")
                        .value_name("REGION")
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(format_arg()),
        )
        .subcommand(
            ClapCommand::new("subblocks")
                .about("Export every subblock with its coordinates")
                .arg(input_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_name("DIR")
                        .required(true),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .help("File name prefix for subblock files")
                        .value_name("PREFIX"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Do not draw a progress bar")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Configuration file settings overridden by the command line
fn effective_config(matches: &ArgMatches) -> Result<Config, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(Path::new(path)).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    if let Some(log_file) = matches.get_one::<String>("log-file") {
        config.log_file = Some(log_file.clone());
    }
    if matches.get_flag("verbose") {
        config.log_level = LevelFilter::Debug;
    }
    Ok(config)
}

fn main() {
    let matches = build_cli().get_matches();

    let config = match effective_config(&matches) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(2);
        }
    };

    Logger::init_global_logger(config.log_level);

    let logger = match &config.log_file {
        Some(log_file) => match Logger::new(log_file) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error initializing logger: {}", e);
                process::exit(1);
            }
        },
        None => Logger::disabled(),
    };

    let factory = CziCommandFactory::new(config);

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
}
