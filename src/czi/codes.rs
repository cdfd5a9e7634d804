//! CZI code name tables
//!
//! Maps the numeric pixel type and compression codes, and the single-letter
//! dimension names, to readable names for reports. The tables are kept in
//! `czi_codes.toml` and embedded at compile time.

use std::collections::HashMap;
use std::str::FromStr;
use lazy_static::lazy_static;
use crate::czi::errors::{CziError, CziResult};

lazy_static! {
    // Parse the embedded table once, on first use
    static ref CZI_CODES: CziCodeTables = {
        let content = include_str!("../../czi_codes.toml");
        content.parse::<CziCodeTables>().unwrap_or_else(|e| {
                log::warn!("Failed to parse CZI code tables: {}", e);
                CziCodeTables::default()
            })
    };
}

/// Container for the CZI code name tables
#[derive(Debug, Default)]
pub struct CziCodeTables {
    // Maps pixel type codes to names
    pub pixel_type_names: HashMap<i32, String>,
    // Maps compression codes to names
    pub compression_names: HashMap<i32, String>,
    // Maps dimension letters to descriptions
    pub dimension_names: HashMap<String, String>,
}

impl FromStr for CziCodeTables {
    type Err = CziError;

    /// Parse code tables from a TOML string
    fn from_str(content: &str) -> CziResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| CziError::Config(format!("Failed to parse TOML: {}", e)))?;

        let mut tables = CziCodeTables::default();
        Self::parse_code_table(&toml_value, "pixel_type_codes", &mut tables.pixel_type_names);
        Self::parse_code_table(&toml_value, "compression_codes", &mut tables.compression_names);

        if let Some(table) = toml_value.get("dimension_names").and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let Some(name) = v.as_str() {
                    tables.dimension_names.insert(k.clone(), name.to_string());
                }
            }
        }

        Ok(tables)
    }
}

impl CziCodeTables {
    /// Helper to parse numeric code tables from TOML
    fn parse_code_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<i32, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<i32>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }
}

/// Readable name of a pixel type code
pub fn pixel_type_name(code: i32) -> String {
    CZI_CODES.pixel_type_names.get(&code)
        .cloned()
        .unwrap_or_else(|| format!("Unknown-{}", code))
}

/// Readable name of a compression code
pub fn compression_name(code: i32) -> String {
    CZI_CODES.compression_names.get(&code)
        .cloned()
        .unwrap_or_else(|| format!("Unknown-{}", code))
}

/// Description of a dimension letter
pub fn dimension_description(letter: &str) -> String {
    CZI_CODES.dimension_names.get(letter)
        .cloned()
        .unwrap_or_else(|| format!("Unknown dimension '{}'", letter))
}
