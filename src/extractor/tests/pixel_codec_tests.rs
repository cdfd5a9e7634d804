//! Tests for copying bitmaps into arrays

use std::cell::Cell;

use crate::czi::bitmap::MemoryBitmap;
use crate::czi::errors::CziError;
use crate::czi::types::PixelType;
use crate::extractor::{copy_bitmap_to_buffer, ElementType, PixelArray, PixelData};

use super::test_utils::PaddedBitmap;

#[test]
fn test_gray8_skips_row_padding() {
    let bitmap = PaddedBitmap::from_rows(PixelType::Gray8, 3, &[vec![1, 2, 3], vec![4, 5, 6]], 8);

    let array = copy_bitmap_to_buffer(&bitmap).unwrap();

    assert_eq!(array.element_type(), ElementType::U8);
    assert_eq!(array.shape(), [2, 3]);
    assert_eq!(array.data(), &PixelData::U8(vec![1, 2, 3, 4, 5, 6]));
    assert_eq!(array.get(0, 2), Some(3));
    assert_eq!(array.get(1, 0), Some(4));
    assert_eq!(array.get(2, 0), None);
    assert!(array.is_c_contiguous());
    assert_eq!(bitmap.outstanding_locks(), 0);
}

#[test]
fn test_gray16_is_little_endian() {
    let rows = vec![
        vec![0x01, 0x00, 0x00, 0x01],
        vec![0xFF, 0xFF, 0x34, 0x12],
    ];
    let bitmap = PaddedBitmap::from_rows(PixelType::Gray16, 2, &rows, 6);

    let array = copy_bitmap_to_buffer(&bitmap).unwrap();

    assert_eq!(array.element_type(), ElementType::U16);
    assert_eq!(array.shape(), [2, 2]);
    assert_eq!(array.data(), &PixelData::U16(vec![1, 256, 0xFFFF, 0x1234]));
    assert_eq!(array.get(1, 1), Some(0x1234));
    assert_eq!(array.to_le_bytes(), vec![0x01, 0x00, 0x00, 0x01, 0xFF, 0xFF, 0x34, 0x12]);
}

#[test]
fn test_tight_memory_bitmap() {
    let bitmap = MemoryBitmap::from_raw(PixelType::Gray8, 4, 1, 4, vec![9, 8, 7, 6]).unwrap();

    let array = copy_bitmap_to_buffer(&bitmap).unwrap();

    assert_eq!(array.shape(), [1, 4]);
    assert_eq!(array.strides(), [4, 1]);
    assert_eq!(bitmap.lock_count(), 0);
}

#[test]
fn test_unsupported_type_is_rejected_before_locking() {
    let bitmap = PaddedBitmap::from_rows(PixelType::Bgr24, 1, &[vec![1, 2, 3]], 4);

    let result = copy_bitmap_to_buffer(&bitmap);

    assert!(matches!(result, Err(CziError::UnsupportedPixelType(PixelType::Bgr24))));
    assert_eq!(bitmap.locks.get(), 0);
}

#[test]
fn test_short_stride_releases_lock() {
    let bitmap = PaddedBitmap {
        pixel_type: PixelType::Gray8,
        width: 4,
        height: 2,
        stride: 2,
        data: vec![0; 8],
        locks: Cell::new(0),
        unlocks: Cell::new(0),
    };

    let result = copy_bitmap_to_buffer(&bitmap);

    assert!(matches!(result, Err(CziError::InvalidBitmap(_))));
    assert_eq!(bitmap.locks.get(), 1);
    assert_eq!(bitmap.outstanding_locks(), 0);
}

#[test]
fn test_truncated_memory_releases_lock() {
    let bitmap = PaddedBitmap {
        pixel_type: PixelType::Gray16,
        width: 2,
        height: 3,
        stride: 4,
        data: vec![0; 10],
        locks: Cell::new(0),
        unlocks: Cell::new(0),
    };

    assert!(matches!(copy_bitmap_to_buffer(&bitmap), Err(CziError::InvalidBitmap(_))));
    assert_eq!(bitmap.outstanding_locks(), 0);
}

#[test]
fn test_empty_bitmap() {
    let bitmap = MemoryBitmap::new(PixelType::Gray16, 0, 0).unwrap();
    let array = copy_bitmap_to_buffer(&bitmap).unwrap();
    assert!(array.is_empty());
    assert_eq!(array.shape(), [0, 0]);
}

#[test]
fn test_transpose_twice_is_identity() {
    let array = PixelArray::column_major(PixelData::U8(vec![1, 2, 3, 4, 5, 6]), 3, 2).unwrap();
    assert_eq!(array.shape(), [3, 2]);
    assert!(!array.is_c_contiguous());

    let transposed = array.clone().transpose();
    assert_eq!(transposed.shape(), [2, 3]);
    assert_eq!(transposed.get(1, 2), array.get(2, 1));

    assert_eq!(transposed.transpose(), array);
}

#[test]
fn test_column_major_checks_length() {
    let result = PixelArray::column_major(PixelData::U16(vec![1, 2, 3]), 2, 2);
    assert!(matches!(result, Err(CziError::InvalidBitmap(_))));
}
