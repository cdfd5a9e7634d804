//! Factory for creating compression handlers

use crate::czi::constants::compression;
use crate::czi::errors::{CziError, CziResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::zstd::{Zstd0Handler, Zstd1Handler};

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(code: i32) -> CziResult<Box<dyn CompressionHandler>> {
        match code {
            compression::UNCOMPRESSED => Ok(Box::new(UncompressedHandler)),
            compression::ZSTD0 => Ok(Box::new(Zstd0Handler::new())),
            compression::ZSTD1 => Ok(Box::new(Zstd1Handler::new())),
            _ => Err(CziError::UnsupportedCompression(code))
        }
    }
}
