//! Metadata command
//!
//! Prints the metadata XML of a CZI file, writes it to a file, or prints
//! just the declared image sizes.

use clap::ArgMatches;
use log::info;
use std::fs;
use std::path::Path;

use crate::commands::command_traits::Command;
use crate::commands::input_arg;
use crate::czi::errors::CziResult;
use crate::czi::MetadataSummary;
use crate::extractor::SceneExtractor;
use crate::utils::logger::Logger;

/// Command for reading the metadata segment
pub struct MetadataCommand<'a> {
    input_file: String,
    /// Write the XML here instead of printing it
    output_file: Option<String>,
    /// Print only the size summary
    summary: bool,
    logger: &'a Logger,
}

impl<'a> MetadataCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> CziResult<Self> {
        Ok(MetadataCommand {
            input_file: input_arg(args)?,
            output_file: args.get_one::<String>("output").cloned(),
            summary: args.get_flag("summary"),
            logger,
        })
    }
}

impl<'a> Command for MetadataCommand<'a> {
    fn execute(&self) -> CziResult<()> {
        let extractor = SceneExtractor::new(self.logger);
        let xml = extractor.read_metadata(Path::new(&self.input_file))?;

        if self.summary {
            let summary = MetadataSummary::from_xml(&xml)?;
            println!("{}", summary.describe());
            return Ok(());
        }

        match &self.output_file {
            Some(output) => {
                fs::write(output, &xml)?;
                info!("Metadata written to {}", output);
            },
            None => println!("{}", xml),
        }
        Ok(())
    }
}
