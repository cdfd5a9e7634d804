//! CZI format constants
//!
//! Segment identifiers, fixed header sizes and numeric codes used in
//! the ZISRAW container layout. All multi-byte values in a CZI file are
//! little-endian.

/// Segment identifiers (16 bytes, NUL padded on disk)
pub mod segments {
    pub const FILE_HEADER: &str = "ZISRAWFILE";
    pub const DIRECTORY: &str = "ZISRAWDIRECTORY";
    pub const SUBBLOCK: &str = "ZISRAWSUBBLOCK";
    pub const METADATA: &str = "ZISRAWMETADATA";
    pub const ATTACHMENT_DIRECTORY: &str = "ZISRAWATTDIR";
    pub const DELETED: &str = "DELETED";
}

/// Sizes of fixed parts of the layout, in bytes
pub mod sizes {
    /// Segment id field
    pub const SEGMENT_ID: usize = 16;
    /// Segment header: id + allocated size + used size
    pub const SEGMENT_HEADER: u64 = 32;
    /// Allocated data part of the file header segment
    pub const FILE_HEADER_DATA: u64 = 512;
    /// Fixed part of the directory segment before its entries
    pub const DIRECTORY_HEADER: u64 = 128;
    /// Fixed part of a DV directory entry before its dimension entries
    pub const DIRECTORY_ENTRY_FIXED: usize = 32;
    /// One DV dimension entry
    pub const DIMENSION_ENTRY: usize = 20;
    /// Minimum size of the subblock header (sizes + directory entry + fill)
    pub const SUBBLOCK_HEADER_MINIMUM: u64 = 256;
    /// Metadata segment header: xml size + attachment size + spare
    pub const METADATA_HEADER: u64 = 256;
}

/// Pixel type codes as stored in directory entries
pub mod pixel_type {
    pub const GRAY8: i32 = 0;
    pub const GRAY16: i32 = 1;
    pub const GRAY32_FLOAT: i32 = 2;
    pub const BGR24: i32 = 3;
    pub const BGR48: i32 = 4;
    pub const BGR96_FLOAT: i32 = 8;
    pub const BGRA32: i32 = 9;
    pub const GRAY64_COMPLEX_FLOAT: i32 = 10;
    pub const BGR192_COMPLEX_FLOAT: i32 = 11;
    pub const GRAY32: i32 = 12;
    pub const GRAY64_FLOAT: i32 = 13;
}

/// Compression codes as stored in directory entries
pub mod compression {
    pub const UNCOMPRESSED: i32 = 0;
    pub const JPG: i32 = 1;
    pub const LZW: i32 = 2;
    pub const JPGXR: i32 = 4;
    pub const ZSTD0: i32 = 5;
    pub const ZSTD1: i32 = 6;
}

/// zstd1 payload header chunk types
pub mod zstd1 {
    /// Chunk carrying the hi/lo byte packing flag
    pub const CHUNK_HILO_PACKING: u8 = 1;
    /// Header size when only the size byte is present
    pub const HEADER_MINIMAL: u8 = 1;
    /// Header size with the hi/lo packing chunk
    pub const HEADER_WITH_HILO: u8 = 3;
}

/// Schema tag of the directory entries this reader understands
pub const DIRECTORY_ENTRY_SCHEMA: &[u8; 2] = b"DV";

/// Row alignment of bitmaps allocated by the tile accessor
pub const BITMAP_ROW_ALIGNMENT: usize = 4;
