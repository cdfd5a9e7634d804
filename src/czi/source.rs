//! Image source abstraction
//!
//! The extraction core talks to an opened container only through the
//! [`ImageSource`] and [`TileAccessor`] traits. [`crate::czi::CziReader`]
//! is the file-backed implementation.

use log::debug;

use crate::compression::CompressionFactory;
use crate::czi::bitmap::{BitmapData, MemoryBitmap};
use crate::czi::errors::{CziError, CziResult};
use crate::czi::types::{DimCoordinate, IntRect, SubblockInfo};

/// Visitor called for every subblock; return `false` to stop early
pub type SubblockVisitor<'v> = dyn FnMut(usize, &SubblockInfo) -> bool + 'v;

/// An opened image container
pub trait ImageSource {
    /// Visit every subblock once, in the container's order
    fn enumerate_subblocks(&self, visitor: &mut SubblockVisitor<'_>) -> CziResult<()>;

    /// Raw metadata XML of the container
    fn read_metadata_xml(&self) -> CziResult<String>;

    /// Read the stored payload of one subblock
    fn read_subblock(&self, index: usize) -> CziResult<SubBlock>;

    /// Create an accessor composing single-channel planes from subblocks
    fn create_single_channel_tile_accessor(&self) -> Box<dyn TileAccessor + '_>;
}

/// Options for a tile accessor request
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorOptions {
    /// Draw subblocks in ascending M-index order
    pub sort_by_m: bool,
    /// Value written to pixels no subblock covers
    pub background: u8,
}

impl Default for AccessorOptions {
    fn default() -> Self {
        AccessorOptions {
            sort_by_m: true,
            background: 0,
        }
    }
}

/// Composes a region of one plane from the subblocks covering it
pub trait TileAccessor {
    /// Compose the pixels of `roi` on the plane selected by `plane`
    ///
    /// Dimensions absent from `plane` are not constrained. `None` for
    /// `options` selects the defaults.
    fn get(&self, roi: IntRect, plane: &DimCoordinate, options: Option<&AccessorOptions>) -> CziResult<Box<dyn BitmapData>>;
}

/// Payload of one subblock as stored in the container
#[derive(Debug, Clone)]
pub struct SubBlock {
    /// Directory index of the subblock
    pub index: usize,
    /// Directory information
    pub info: SubblockInfo,
    /// Stored (possibly compressed) pixel data
    pub data: Vec<u8>,
    /// Subblock metadata XML bytes, often empty
    pub metadata: Vec<u8>,
}

impl SubBlock {
    /// Decode the stored data into a bitmap of the physical size
    pub fn create_bitmap(&self) -> CziResult<Box<dyn BitmapData>> {
        let handler = CompressionFactory::create_handler(self.info.compression)?;
        let pixel_type = self.info.pixel_type;
        let width = self.info.physical_width;
        let height = self.info.physical_height;
        let stride = width as usize * pixel_type.bytes_per_pixel();

        debug!("Decoding subblock {} ({}x{} {}, {})",
               self.index, width, height, pixel_type, handler.name());

        let pixels = handler.decompress(&self.data)?;
        let expected = stride * height as usize;
        if pixels.len() < expected {
            return Err(CziError::CorruptSubblock {
                index: self.index,
                reason: format!("{} bytes of pixel data, {} expected", pixels.len(), expected),
            });
        }

        let bitmap = MemoryBitmap::from_raw(pixel_type, width, height, stride, pixels)?;
        Ok(Box::new(bitmap))
    }
}
