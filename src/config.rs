//! Tool configuration
//!
//! Defaults for the command-line tool, optionally overridden from a TOML
//! file:
//!
//! ```toml
//! [logging]
//! file = "czikit.log"
//! level = "info"
//!
//! [export]
//! format = "npy"
//! prefix = "subblock"
//! ```
//!
//! Command-line arguments override both.

use log::LevelFilter;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::czi::errors::{CziError, CziResult};
use crate::extractor::ArrayFormat;

/// Settings shared by all commands
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Journal file; `None` disables journaling
    pub log_file: Option<String>,
    /// Default level for diagnostic logging
    pub log_level: LevelFilter,
    /// Array format used when the output path does not imply one
    pub array_format: ArrayFormat,
    /// File name prefix for exported subblocks
    pub subblock_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_file: Some("czikit.log".to_string()),
            log_level: LevelFilter::Info,
            array_format: ArrayFormat::Npy,
            subblock_prefix: "subblock".to_string(),
        }
    }
}

impl FromStr for Config {
    type Err = CziError;

    /// Parse a configuration from a TOML string, filling gaps with defaults
    fn from_str(content: &str) -> CziResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| CziError::Config(format!("Failed to parse TOML: {}", e)))?;

        let mut config = Config::default();

        if let Some(logging) = toml_value.get("logging").and_then(|v| v.as_table()) {
            match logging.get("file") {
                Some(toml::Value::String(file)) if file.is_empty() => config.log_file = None,
                Some(toml::Value::String(file)) => config.log_file = Some(file.clone()),
                Some(toml::Value::Boolean(false)) => config.log_file = None,
                Some(other) => return Err(CziError::Config(format!("logging.file must be a string, got {}", other))),
                None => {},
            }
            if let Some(level) = logging.get("level") {
                let level = level.as_str()
                    .ok_or_else(|| CziError::Config("logging.level must be a string".to_string()))?;
                config.log_level = LevelFilter::from_str(level)
                    .map_err(|_| CziError::Config(format!("Unknown log level: {}", level)))?;
            }
        }

        if let Some(export) = toml_value.get("export").and_then(|v| v.as_table()) {
            if let Some(format) = export.get("format") {
                let format = format.as_str()
                    .ok_or_else(|| CziError::Config("export.format must be a string".to_string()))?;
                config.array_format = ArrayFormat::from_name(format)
                    .map_err(|e| CziError::Config(e.to_string()))?;
            }
            if let Some(prefix) = export.get("prefix") {
                config.subblock_prefix = prefix.as_str()
                    .ok_or_else(|| CziError::Config("export.prefix must be a string".to_string()))?
                    .to_string();
            }
        }

        Ok(config)
    }
}

impl Config {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> CziResult<Self> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(Config::from_str("").unwrap(), Config::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_str(r#"
            [logging]
            file = ""
            level = "debug"

            [export]
            format = "tiff"
            prefix = "tile"
        "#).unwrap();

        assert_eq!(config.log_file, None);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.array_format, ArrayFormat::Tiff);
        assert_eq!(config.subblock_prefix, "tile");
    }

    #[test]
    fn bad_level_is_a_config_error() {
        let result = Config::from_str("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(CziError::Config(_))));
    }

    #[test]
    fn parses_through_str_parse() {
        let config: Config = "[export]\nformat = \"csv\"\n".parse().unwrap();
        assert_eq!(config.array_format, ArrayFormat::Csv);
        assert_eq!(config.log_level, LevelFilter::Info);

        assert!(matches!("[logging".parse::<Config>(), Err(CziError::Config(_))));
    }
}
