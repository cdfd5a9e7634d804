//! Pixel buffer codec
//!
//! Copies a locked bitmap into a dense array. Bitmap rows may be padded,
//! so the copy always walks the rows using the stride reported by the
//! lock and never copies the padding. The freshly copied buffer follows
//! the container's column-major `(x, y)` convention; it is handed out
//! with its axes swapped, which makes it C-contiguous and indexed
//! `[y][x]`. Swapping axes only relabels shape and strides.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::czi::bitmap::{required_len, BitmapData, BitmapLockGuard};
use crate::czi::errors::{CziError, CziResult};
use crate::czi::types::PixelType;

/// Element type of an output array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    U8,
    U16,
}

impl ElementType {
    /// Map a source pixel type to the element type it is copied into
    ///
    /// Only single-channel 8 and 16 bit pixels have a mapping.
    pub fn for_pixel_type(pixel_type: PixelType) -> CziResult<Self> {
        match pixel_type {
            PixelType::Gray8 => Ok(ElementType::U8),
            PixelType::Gray16 => Ok(ElementType::U16),
            other => Err(CziError::UnsupportedPixelType(other)),
        }
    }

    /// Size of one element in bytes
    pub fn size(&self) -> usize {
        match self {
            ElementType::U8 => 1,
            ElementType::U16 => 2,
        }
    }

    /// NumPy type descriptor
    pub fn npy_descr(&self) -> &'static str {
        match self {
            ElementType::U8 => "|u1",
            ElementType::U16 => "<u2",
        }
    }
}

/// Element storage of an array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(values) => values.len(),
            PixelData::U16(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at a flat memory offset, widened to 16 bits
    fn at(&self, offset: usize) -> Option<u16> {
        match self {
            PixelData::U8(values) => values.get(offset).map(|&v| v as u16),
            PixelData::U16(values) => values.get(offset).copied(),
        }
    }
}

/// Dense two-dimensional pixel array
///
/// `strides` are in elements. The data vector is always tightly packed;
/// only the interpretation of the two axes changes on [`PixelArray::transpose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArray {
    data: PixelData,
    shape: [usize; 2],
    strides: [usize; 2],
}

impl PixelArray {
    /// Wrap row-by-row copied data in the column-major `(x, y)` view
    pub fn column_major(data: PixelData, width: usize, height: usize) -> CziResult<Self> {
        if data.len() != width * height {
            return Err(CziError::InvalidBitmap(format!(
                "{} elements cannot form a {}x{} array", data.len(), width, height)));
        }
        Ok(PixelArray {
            data,
            shape: [width, height],
            strides: [1, width],
        })
    }

    /// Swap the two axes without moving any data
    pub fn transpose(self) -> Self {
        PixelArray {
            data: self.data,
            shape: [self.shape[1], self.shape[0]],
            strides: [self.strides[1], self.strides[0]],
        }
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn strides(&self) -> [usize; 2] {
        self.strides
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn element_type(&self) -> ElementType {
        match self.data {
            PixelData::U8(_) => ElementType::U8,
            PixelData::U16(_) => ElementType::U16,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `[i, j]` in the current axis order, widened to 16 bits
    pub fn get(&self, i: usize, j: usize) -> Option<u16> {
        if i >= self.shape[0] || j >= self.shape[1] {
            return None;
        }
        self.data.at(i * self.strides[0] + j * self.strides[1])
    }

    /// Whether the last axis is the fastest varying one in memory
    pub fn is_c_contiguous(&self) -> bool {
        self.strides == [self.shape[1], 1]
    }

    /// Raw element memory as little-endian bytes, in storage order
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(values) => values.clone(),
            PixelData::U16(values) => {
                let mut bytes = vec![0u8; values.len() * 2];
                LittleEndian::write_u16_into(values, &mut bytes);
                bytes
            },
        }
    }
}

/// Copy a bitmap into a dense array indexed `[y][x]`
///
/// The pixel type is checked before anything is allocated or locked.
/// The bitmap lock is released on every path out of the copy.
///
/// # Arguments
/// * `bitmap` - Decoded bitmap from an image source
///
/// # Returns
/// A C-contiguous array of shape `[height, width]`, or an error
pub fn copy_bitmap_to_buffer(bitmap: &dyn BitmapData) -> CziResult<PixelArray> {
    let element = ElementType::for_pixel_type(bitmap.pixel_type())?;
    let width = bitmap.width() as usize;
    let height = bitmap.height() as usize;
    let row_bytes = width * element.size();

    let guard = BitmapLockGuard::acquire(bitmap);
    let stride = guard.stride();
    let source = guard.data();
    debug!("Copying {}x{} {} bitmap, stride {} bytes", width, height, bitmap.pixel_type(), stride);

    if height > 0 && stride < row_bytes {
        return Err(CziError::InvalidBitmap(format!(
            "stride {} is smaller than the row size {}", stride, row_bytes)));
    }
    let required = required_len(row_bytes, stride, height);
    if source.len() < required {
        return Err(CziError::InvalidBitmap(format!(
            "locked memory holds {} bytes, {} rows need {}", source.len(), height, required)));
    }

    let data = match element {
        ElementType::U8 => {
            let mut out = vec![0u8; width * height];
            for y in 0..height {
                let row = &source[y * stride..y * stride + row_bytes];
                out[y * width..(y + 1) * width].copy_from_slice(row);
            }
            PixelData::U8(out)
        },
        ElementType::U16 => {
            let mut out = vec![0u16; width * height];
            for y in 0..height {
                let row = &source[y * stride..y * stride + row_bytes];
                LittleEndian::read_u16_into(row, &mut out[y * width..(y + 1) * width]);
            }
            PixelData::U16(out)
        },
    };
    drop(guard);

    Ok(PixelArray::column_major(data, width, height)?.transpose())
}
