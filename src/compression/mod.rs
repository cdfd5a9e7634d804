//! Compression handling for CZI subblocks
//!
//! This module implements strategies for the subblock compression methods
//! the reader can decode.

mod handler;
mod uncompressed;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use factory::CompressionFactory;
pub use zstd::{Zstd0Handler, Zstd1Handler};
