//! Decoded bitmaps and their lock discipline
//!
//! A bitmap exposes its pixel memory only while locked. Locking hands out
//! the base of the pixel data together with the row stride in bytes, which
//! can be larger than `width * bytes_per_pixel`. [`BitmapLockGuard`] pairs
//! every lock with an unlock when it goes out of scope.

use std::cell::Cell;

use crate::czi::constants::BITMAP_ROW_ALIGNMENT;
use crate::czi::errors::{CziError, CziResult};
use crate::czi::types::PixelType;

/// Pixel memory of a locked bitmap
#[derive(Debug, Clone, Copy)]
pub struct LockInfo<'a> {
    /// Pixel data starting at row 0, column 0
    pub data: &'a [u8],
    /// Distance between the starts of consecutive rows, in bytes
    pub stride: usize,
}

/// A decoded bitmap produced by an image source
pub trait BitmapData {
    /// Pixel type of the bitmap
    fn pixel_type(&self) -> PixelType;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Lock the bitmap and expose its pixel memory
    ///
    /// Every call must be matched by a call to [`BitmapData::unlock`];
    /// use [`BitmapLockGuard`] rather than calling this directly.
    fn lock(&self) -> LockInfo<'_>;

    /// Release a lock taken with [`BitmapData::lock`]
    fn unlock(&self);
}

/// Scoped lock on a bitmap, unlocked on drop
pub struct BitmapLockGuard<'a> {
    bitmap: &'a dyn BitmapData,
    info: LockInfo<'a>,
}

impl<'a> BitmapLockGuard<'a> {
    /// Lock `bitmap` until the guard is dropped
    pub fn acquire(bitmap: &'a dyn BitmapData) -> Self {
        let info = bitmap.lock();
        BitmapLockGuard { bitmap, info }
    }

    /// Locked pixel memory
    pub fn data(&self) -> &'a [u8] {
        self.info.data
    }

    /// Row stride in bytes
    pub fn stride(&self) -> usize {
        self.info.stride
    }
}

impl Drop for BitmapLockGuard<'_> {
    fn drop(&mut self) {
        self.bitmap.unlock();
    }
}

/// Bitmap backed by an owned byte vector
#[derive(Debug)]
pub struct MemoryBitmap {
    pixel_type: PixelType,
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
    locks: Cell<u32>,
}

impl MemoryBitmap {
    /// Allocate a zero-filled bitmap with aligned rows
    ///
    /// Fails with [`CziError::BitmapTooLarge`] when the pixel memory cannot
    /// be sized or reserved, instead of aborting on allocation failure.
    pub fn new(pixel_type: PixelType, width: u32, height: u32) -> CziResult<Self> {
        let too_large = || CziError::BitmapTooLarge { width, height, pixel_type };

        let stride = (width as usize)
            .checked_mul(pixel_type.bytes_per_pixel())
            .and_then(|row_size| row_size.checked_next_multiple_of(BITMAP_ROW_ALIGNMENT))
            .ok_or_else(too_large)?;
        let len = stride.checked_mul(height as usize).ok_or_else(too_large)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0u8);

        Ok(MemoryBitmap {
            pixel_type,
            width,
            height,
            stride,
            data,
            locks: Cell::new(0),
        })
    }

    /// Wrap existing pixel memory
    ///
    /// # Arguments
    /// * `pixel_type` - Pixel type of the data
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `stride` - Row stride in bytes, at least `width * bytes_per_pixel`
    /// * `data` - Pixel memory, long enough to hold every row
    pub fn from_raw(pixel_type: PixelType, width: u32, height: u32, stride: usize, data: Vec<u8>) -> CziResult<Self> {
        let row_size = width as usize * pixel_type.bytes_per_pixel();
        if stride < row_size {
            return Err(CziError::InvalidBitmap(format!(
                "stride {} is smaller than the row size {}", stride, row_size)));
        }
        let required = required_len(row_size, stride, height as usize);
        if data.len() < required {
            return Err(CziError::InvalidBitmap(format!(
                "{} bytes supplied, {}x{} {} with stride {} needs {}",
                data.len(), width, height, pixel_type, stride, required)));
        }

        Ok(MemoryBitmap {
            pixel_type,
            width,
            height,
            stride,
            data,
            locks: Cell::new(0),
        })
    }

    /// Row stride in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Mutable access to one row of pixels, without the padding
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let row_size = self.width as usize * self.pixel_type.bytes_per_pixel();
        let start = y as usize * self.stride;
        &mut self.data[start..start + row_size]
    }

    /// Number of locks currently held
    pub fn lock_count(&self) -> u32 {
        self.locks.get()
    }
}

impl BitmapData for MemoryBitmap {
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
        self.locks.set(self.locks.get().saturating_sub(1));
    }
}

/// Bytes needed to hold `height` rows of `row_size` bytes spaced `stride` apart
pub(crate) fn required_len(row_size: usize, stride: usize, height: usize) -> usize {
    if height == 0 {
        0
    } else {
        stride.saturating_mul(height - 1).saturating_add(row_size)
    }
}
