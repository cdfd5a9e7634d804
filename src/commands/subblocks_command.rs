//! Bulk subblock export command

use clap::ArgMatches;
use log::info;
use std::path::Path;

use crate::commands::command_traits::Command;
use crate::commands::input_arg;
use crate::config::Config;
use crate::czi::errors::{CziError, CziResult};
use crate::extractor::{ArrayFormat, SceneExtractor};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Command exporting every subblock of a file into a directory
pub struct SubblocksCommand<'a> {
    input_file: String,
    output_dir: String,
    format: ArrayFormat,
    prefix: String,
    show_progress: bool,
    logger: &'a Logger,
}

impl<'a> SubblocksCommand<'a> {
    pub fn new(args: &ArgMatches, config: &Config, logger: &'a Logger) -> CziResult<Self> {
        let output_dir = args.get_one::<String>("output")
            .ok_or_else(|| CziError::Usage("Missing output directory".to_string()))?
            .clone();

        let format = match args.get_one::<String>("format") {
            Some(name) => ArrayFormat::from_name(name)?,
            None => config.array_format,
        };

        let prefix = args.get_one::<String>("prefix")
            .cloned()
            .unwrap_or_else(|| config.subblock_prefix.clone());

        Ok(SubblocksCommand {
            input_file: input_arg(args)?,
            output_dir,
            format,
            prefix,
            show_progress: !args.get_flag("quiet"),
            logger,
        })
    }
}

impl<'a> Command for SubblocksCommand<'a> {
    fn execute(&self) -> CziResult<()> {
        let extractor = SceneExtractor::new(self.logger);
        let input = Path::new(&self.input_file);

        let total = extractor.count_subblocks(input)? as u64;
        let progress = if self.show_progress {
            ProgressTracker::new(total, "Decoding subblocks")
        } else {
            ProgressTracker::hidden(total)
        };

        let written = extractor.export_subblocks(
            input, Path::new(&self.output_dir), self.format, &self.prefix, Some(&progress))?;
        progress.finish();

        info!("Wrote {} subblocks to {}", written, self.output_dir);
        Ok(())
    }
}
