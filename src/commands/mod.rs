//! CLI command implementations
//!
//! One command per subcommand of the command-line tool, created by
//! [`CziCommandFactory`] from the parsed arguments.

pub mod command_traits;
pub mod info_command;
pub mod metadata_command;
pub mod scene_command;
pub mod subblocks_command;

pub use command_traits::{Command, CommandFactory};
pub use info_command::InfoCommand;
pub use metadata_command::MetadataCommand;
pub use scene_command::SceneCommand;
pub use subblocks_command::SubblocksCommand;

use clap::ArgMatches;

use crate::config::Config;
use crate::czi::errors::{CziError, CziResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// Holds the effective configuration so commands can fall back to its
/// defaults for options not given on the command line.
pub struct CziCommandFactory {
    config: Config,
}

impl CziCommandFactory {
    /// Create a new factory instance
    pub fn new(config: Config) -> Self {
        CziCommandFactory { config }
    }
}

impl<'a> CommandFactory<'a> for CziCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> CziResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some(("info", sub)) => Ok(Box::new(InfoCommand::new(sub, logger)?)),
            Some(("metadata", sub)) => Ok(Box::new(MetadataCommand::new(sub, logger)?)),
            Some(("scene", sub)) => Ok(Box::new(SceneCommand::new(sub, &self.config, logger)?)),
            Some(("subblocks", sub)) => Ok(Box::new(SubblocksCommand::new(sub, &self.config, logger)?)),
            Some((other, _)) => Err(CziError::Usage(format!("Unknown command: {}", other))),
            None => Err(CziError::Usage("No command given".to_string())),
        }
    }
}

/// Fetch the required `input` argument of a subcommand
pub(crate) fn input_arg(args: &ArgMatches) -> CziResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| CziError::Usage("Missing input file".to_string()))
}
