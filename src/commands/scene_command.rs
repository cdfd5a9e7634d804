//! Region extraction command
//!
//! Extracts a scene or an explicit pixel box from channel 0 of a CZI file
//! and saves it as an array or grayscale image.

use clap::ArgMatches;
use log::info;
use std::path::Path;

use crate::commands::command_traits::Command;
use crate::commands::input_arg;
use crate::config::Config;
use crate::czi::errors::{CziError, CziResult};
use crate::extractor::{ArrayFormat, RegionSelector, SceneExtractor};
use crate::utils::logger::Logger;

/// Command for extracting one region
pub struct SceneCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Path to the output file
    output_file: String,
    /// Region to extract
    selector: RegionSelector,
    /// Output format
    format: ArrayFormat,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> SceneCommand<'a> {
    /// Create a new scene command
    ///
    /// The region is parsed here, so a malformed selector fails before the
    /// input file is touched. The output format comes from `--format`, then
    /// from the output extension, then from the configuration.
    ///
    /// # Arguments
    /// * `args` - Argument matches of the `scene` subcommand
    /// * `config` - Effective configuration
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, config: &Config, logger: &'a Logger) -> CziResult<Self> {
        let input_file = input_arg(args)?;

        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| CziError::Usage("Missing output file path for extraction".to_string()))?
            .clone();

        let selector = match args.get_one::<String>("region") {
            Some(region) => RegionSelector::parse(region)?,
            None => RegionSelector::SceneIndex(-1),
        };
        info!("Region selector: {:?}", selector);

        let format = match args.get_one::<String>("format") {
            Some(name) => ArrayFormat::from_name(name)?,
            None => ArrayFormat::from_path(Path::new(&output_file)).unwrap_or(config.array_format),
        };

        Ok(SceneCommand {
            input_file,
            output_file,
            selector,
            format,
            logger,
        })
    }
}

impl<'a> Command for SceneCommand<'a> {
    fn execute(&self) -> CziResult<()> {
        info!("Extracting {:?} from {} to {} as {:?}",
              self.selector, self.input_file, self.output_file, self.format);

        SceneExtractor::new(self.logger).save_region(
            Path::new(&self.input_file),
            Path::new(&self.output_file),
            &self.selector,
            self.format,
        )
    }
}
