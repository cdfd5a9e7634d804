use std::cell::Cell;

use crate::czi::bitmap::{BitmapData, LockInfo};
use crate::czi::constants::compression;
use crate::czi::errors::{CziError, CziResult};
use crate::czi::source::{ImageSource, SubBlock, SubblockVisitor, TileAccessor};
use crate::czi::types::{DimCoordinate, Dimension, IntRect, PixelType, SubblockInfo};
use crate::czi::SingleChannelTileAccessor;

/// Directory information for an uncompressed layer-0 subblock
pub fn subblock_info(pixel_type: PixelType, rect: IntRect, scene: Option<i32>) -> SubblockInfo {
    let mut coordinate = DimCoordinate::from_pairs(&[(Dimension::C, 0)]);
    if let Some(scene) = scene {
        coordinate.set(Dimension::S, scene);
    }
    SubblockInfo {
        coordinate,
        logical_rect: rect,
        physical_width: rect.w as u32,
        physical_height: rect.h as u32,
        pixel_type,
        compression: compression::UNCOMPRESSED,
        m_index: None,
        pyramid_type: 0,
        file_position: 0,
    }
}

/// In-memory image source holding uncompressed subblocks
#[derive(Default)]
pub struct FakeSource {
    pub subblocks: Vec<(SubblockInfo, Vec<u8>)>,
    pub enumerations: Cell<usize>,
}

impl FakeSource {
    pub fn new() -> Self {
        FakeSource::default()
    }

    /// Add a Gray8 subblock filled with `value`
    pub fn with_gray8(mut self, rect: IntRect, scene: Option<i32>, value: u8) -> Self {
        let data = vec![value; (rect.w * rect.h) as usize];
        self.subblocks.push((subblock_info(PixelType::Gray8, rect, scene), data));
        self
    }

    /// Add a subblock with explicit pixel bytes
    pub fn with_raw(mut self, pixel_type: PixelType, rect: IntRect, scene: Option<i32>, data: Vec<u8>) -> Self {
        self.subblocks.push((subblock_info(pixel_type, rect, scene), data));
        self
    }
}

impl ImageSource for FakeSource {
    fn enumerate_subblocks(&self, visitor: &mut SubblockVisitor<'_>) -> CziResult<()> {
        self.enumerations.set(self.enumerations.get() + 1);
        for (index, (info, _)) in self.subblocks.iter().enumerate() {
            if !visitor(index, info) {
                break;
            }
        }
        Ok(())
    }

    fn read_metadata_xml(&self) -> CziResult<String> {
        Ok("<ImageDocument/>".to_string())
    }

    fn read_subblock(&self, index: usize) -> CziResult<SubBlock> {
        let (info, data) = self.subblocks.get(index).ok_or(CziError::SubblockOutOfRange {
            index,
            count: self.subblocks.len(),
        })?;
        Ok(SubBlock {
            index,
            info: info.clone(),
            data: data.clone(),
            metadata: Vec::new(),
        })
    }

    fn create_single_channel_tile_accessor(&self) -> Box<dyn TileAccessor + '_> {
        Box::new(SingleChannelTileAccessor::new(self))
    }
}

/// Bitmap whose lock reports a caller-chosen stride
pub struct PaddedBitmap {
    pub pixel_type: PixelType,
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub data: Vec<u8>,
    pub locks: Cell<u32>,
    pub unlocks: Cell<u32>,
}

impl PaddedBitmap {
    /// Build from rows of pixel bytes, each padded with `0xEE` up to `stride`
    pub fn from_rows(pixel_type: PixelType, width: u32, rows: &[Vec<u8>], stride: usize) -> Self {
        let mut data = Vec::new();
        for row in rows {
            data.extend_from_slice(row);
            data.extend(std::iter::repeat(0xEE).take(stride - row.len()));
        }
        PaddedBitmap {
            pixel_type,
            width,
            height: rows.len() as u32,
            stride,
            data,
            locks: Cell::new(0),
            unlocks: Cell::new(0),
        }
    }

    /// Locks taken and not yet released
    pub fn outstanding_locks(&self) -> u32 {
        self.locks.get() - self.unlocks.get()
    }
}

impl BitmapData for PaddedBitmap {
    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn lock(&self) -> LockInfo<'_> {
        self.locks.set(self.locks.get() + 1);
        LockInfo {
            data: &self.data,
            stride: self.stride,
        }
    }

    fn unlock(&self) {
        self.unlocks.set(self.unlocks.get() + 1);
    }
}
