//! CZI container access
//!
//! This module provides the image source abstraction the extraction core
//! works against, and a reader for Zeiss CZI (ZISRAW) files implementing it.

pub mod errors;
pub mod types;
pub mod bitmap;
pub mod source;
pub mod reader;
pub mod accessor;
pub mod metadata;
pub mod builder;
pub mod codes;
pub mod constants;
pub(crate) mod segments;
#[cfg(test)]
mod tests;

pub use errors::{CziError, CziResult};
pub use types::{DimCoordinate, Dimension, IntRect, PixelType, SubblockInfo};
pub use bitmap::{BitmapData, BitmapLockGuard, LockInfo, MemoryBitmap};
pub use source::{AccessorOptions, ImageSource, SubBlock, SubblockVisitor, TileAccessor};
pub use reader::CziReader;
pub use accessor::SingleChannelTileAccessor;
pub use metadata::MetadataSummary;
pub use builder::{CziBuilder, SubblockSpec};
