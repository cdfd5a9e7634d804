//! Container structure command
//!
//! Prints the structure report of a CZI file.

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::commands::input_arg;
use crate::czi::errors::CziResult;
use crate::czi::CziReader;
use crate::extractor::container_report;
use crate::utils::logger::Logger;

/// Command for analyzing CZI file structure
pub struct InfoCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    /// Create a new info command
    ///
    /// # Arguments
    /// * `args` - Argument matches of the `info` subcommand
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> CziResult<Self> {
        Ok(InfoCommand {
            input_file: input_arg(args)?,
            logger,
        })
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> CziResult<()> {
        info!("Analyzing file: {}", self.input_file);

        let reader = CziReader::open(&self.input_file)?;
        let report = container_report(&reader);
        reader.close();

        println!("{}", report?);

        debug!("Analysis completed successfully");
        self.logger.log(&format!("Analyzed {}", self.input_file))?;
        Ok(())
    }
}
