//! Tests for bulk subblock enumeration

use crate::czi::errors::CziError;
use crate::czi::types::{IntRect, PixelType};
use crate::extractor::{count_subblocks, enumerate_all, enumerate_all_with_progress, PixelData};
use crate::utils::progress::ProgressTracker;

use super::test_utils::FakeSource;

#[test]
fn test_arrays_and_coordinates_line_up() {
    let source = FakeSource::new()
        .with_gray8(IntRect::new(0, 0, 2, 1), Some(0), 1)
        .with_gray8(IntRect::new(10, 20, 1, 3), Some(1), 2)
        .with_gray8(IntRect::new(-5, 7, 2, 2), None, 3);

    let collection = enumerate_all(&source).unwrap();

    assert_eq!(collection.len(), 3);
    assert_eq!(collection.coordinates, vec![[0, 0], [10, 20], [-5, 7]]);
    assert_eq!(collection.coordinate_shape(), [3, 2]);
    assert_eq!(collection.arrays[0].shape(), [1, 2]);
    assert_eq!(collection.arrays[1].shape(), [3, 1]);
    assert_eq!(collection.arrays[1].data(), &PixelData::U8(vec![2, 2, 2]));
    assert_eq!(collection.arrays[2].get(1, 1), Some(3));
}

#[test]
fn test_mixed_supported_types() {
    let source = FakeSource::new()
        .with_raw(PixelType::Gray8, IntRect::new(0, 0, 1, 1), Some(0), vec![200])
        .with_raw(PixelType::Gray16, IntRect::new(1, 0, 1, 1), Some(0), vec![0x00, 0x10]);

    let collection = enumerate_all(&source).unwrap();

    assert_eq!(collection.arrays[0].data(), &PixelData::U8(vec![200]));
    assert_eq!(collection.arrays[1].data(), &PixelData::U16(vec![0x1000]));
}

#[test]
fn test_empty_source() {
    let source = FakeSource::new();
    let collection = enumerate_all(&source).unwrap();
    assert!(collection.is_empty());
    assert_eq!(collection.coordinate_shape(), [0, 2]);
}

#[test]
fn test_unsupported_subblock_aborts_everything() {
    let source = FakeSource::new()
        .with_gray8(IntRect::new(0, 0, 1, 1), Some(0), 1)
        .with_raw(PixelType::Bgr24, IntRect::new(1, 0, 1, 1), Some(0), vec![1, 2, 3])
        .with_gray8(IntRect::new(2, 0, 1, 1), Some(0), 1);

    let result = enumerate_all(&source);
    assert!(matches!(result, Err(CziError::UnsupportedPixelType(PixelType::Bgr24))));
}

#[test]
fn test_progress_ticks_once_per_subblock() {
    let source = FakeSource::new()
        .with_gray8(IntRect::new(0, 0, 1, 1), Some(0), 1)
        .with_gray8(IntRect::new(1, 0, 1, 1), Some(0), 1);
    let progress = ProgressTracker::hidden(2);

    assert_eq!(count_subblocks(&source).unwrap(), 2);
    enumerate_all_with_progress(&source, Some(&progress)).unwrap();

    assert_eq!(progress.position(), 2);
}
