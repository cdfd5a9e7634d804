//! Custom error types for CZI processing

use std::io;
use thiserror::Error;

use crate::czi::types::{IntRect, PixelType};

/// CZI-specific error types
#[derive(Debug, Error)]
pub enum CziError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Segment id at a file position did not match what was expected
    #[error("Invalid segment at offset {offset}: expected {expected}, found '{found}'")]
    InvalidSegment {
        expected: &'static str,
        found: String,
        offset: u64,
    },

    /// File header or directory could not be interpreted
    #[error("Invalid CZI header: {0}")]
    InvalidHeader(String),

    /// Pixel type code not known to the reader
    #[error("Unknown pixel type code: {0}")]
    UnknownPixelType(i32),

    /// Pixel type known but not supported by the buffer codec
    #[error("Unsupported pixel type {0}, only Gray8 and Gray16 can be copied")]
    UnsupportedPixelType(PixelType),

    /// Unsupported subblock compression method
    #[error("Unsupported compression method: {0}")]
    UnsupportedCompression(i32),

    /// Decompressing subblock data failed
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Subblock index past the end of the directory
    #[error("Subblock index {index} out of range ({count} subblocks)")]
    SubblockOutOfRange { index: usize, count: usize },

    /// Subblock payload inconsistent with its directory entry
    #[error("Corrupt subblock {index}: {reason}")]
    CorruptSubblock { index: usize, reason: String },

    /// Locked bitmap memory inconsistent with its reported geometry
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// Pixel memory for a bitmap of this size cannot be allocated
    #[error("Cannot allocate a {width}x{height} {pixel_type} bitmap")]
    BitmapTooLarge {
        width: u32,
        height: u32,
        pixel_type: PixelType,
    },

    /// No subblock in the requested plane to take the pixel type from
    #[error("Unable to determine pixel type for plane {0}")]
    PixelTypeUndetermined(String),

    /// Subblocks of different pixel types met in one composite
    #[error("Pixel type mismatch: composite is {expected}, subblock {index} is {found}")]
    PixelTypeMismatch {
        expected: PixelType,
        found: PixelType,
        index: usize,
    },

    /// Region with non-positive extent handed to the tile composer
    #[error("Degenerate region {0}: width and height must be positive")]
    DegenerateRegion(IntRect),

    /// Caller supplied arguments of the wrong shape
    #[error("Usage error: {0}")]
    Usage(String),

    /// Metadata XML could not be parsed
    #[error("Metadata XML error: {0}")]
    Xml(String),

    /// Encoding an output image failed
    #[error("Image output error: {0}")]
    Image(String),

    /// Writing an output file failed for a non-I/O reason
    #[error("Output error: {0}")]
    Output(String),

    /// Configuration file could not be used
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for CZI operations
pub type CziResult<T> = Result<T, CziError>;

impl From<image::ImageError> for CziError {
    fn from(error: image::ImageError) -> Self {
        CziError::Image(error.to_string())
    }
}

impl From<quick_xml::Error> for CziError {
    fn from(error: quick_xml::Error) -> Self {
        CziError::Xml(error.to_string())
    }
}
