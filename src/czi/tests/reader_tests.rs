//! Tests for the CZI reader

use std::io::Cursor;

use crate::czi::constants::compression;
use crate::czi::{
    BitmapData, BitmapLockGuard, CziBuilder, CziError, CziReader, DimCoordinate, Dimension,
    ImageSource, IntRect, PixelType, SubblockSpec,
};

const METADATA: &str = "<ImageDocument><Metadata><Information><Image><SizeX>8</SizeX></Image></Information></Metadata></ImageDocument>";

fn gray16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn open(builder: &CziBuilder) -> CziReader<Cursor<Vec<u8>>> {
    CziReader::from_reader(Cursor::new(builder.build().unwrap())).unwrap()
}

#[test]
fn test_directory_is_parsed() {
    let builder = CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(0, 0, 4, 2), vec![1; 8])
            .with_coordinate(Dimension::C, 0)
            .with_coordinate(Dimension::S, 0)
            .with_m_index(0))
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(-4, 10, 2, 2), vec![0; 8])
            .with_coordinate(Dimension::C, 1)
            .with_coordinate(Dimension::S, 1)
            .with_compression(compression::ZSTD0));
    let reader = open(&builder);

    assert_eq!(reader.header().major, 1);
    assert_eq!(reader.subblock_count(), 2);

    let first = reader.subblock_info(0).unwrap();
    assert_eq!(first.pixel_type, PixelType::Gray8);
    assert_eq!(first.logical_rect, IntRect::new(0, 0, 4, 2));
    assert_eq!(first.coordinate, DimCoordinate::from_pairs(&[(Dimension::C, 0), (Dimension::S, 0)]));
    assert_eq!(first.m_index, Some(0));
    assert!(first.is_layer0());
    assert!(first.file_position > 0);

    let second = reader.subblock_info(1).unwrap();
    assert_eq!(second.pixel_type, PixelType::Gray16);
    assert_eq!(second.logical_rect, IntRect::new(-4, 10, 2, 2));
    assert_eq!(second.coordinate.try_get(Dimension::S), Some(1));
    assert_eq!(second.compression, compression::ZSTD0);
    assert_eq!(second.m_index, None);
}

#[test]
fn test_metadata_round_trips() {
    let reader = open(&CziBuilder::new().metadata(METADATA));
    assert_eq!(reader.read_metadata_xml().unwrap(), METADATA);
}

#[test]
fn test_missing_metadata_is_an_error() {
    let reader = open(&CziBuilder::new());
    assert!(matches!(reader.read_metadata_xml(), Err(CziError::InvalidHeader(_))));
}

#[test]
fn test_read_uncompressed_subblock() {
    let pixels: Vec<u8> = (0..12).collect();
    let builder = CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(0, 0, 4, 3), pixels.clone()));
    let reader = open(&builder);

    let subblock = reader.read_subblock(0).unwrap();
    assert_eq!(subblock.index, 0);
    assert_eq!(subblock.data, pixels);
    assert!(subblock.metadata.is_empty());

    let bitmap = subblock.create_bitmap().unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (4, 3));
    let guard = BitmapLockGuard::acquire(bitmap.as_ref());
    assert_eq!(guard.stride(), 4);
    assert_eq!(&guard.data()[4..8], &[4, 5, 6, 7]);
}

#[test]
fn test_read_zstd_subblocks() {
    let values: Vec<u16> = (0..16).map(|v| v * 1000 + 7).collect();
    let builder = CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(0, 0, 4, 4), gray16_bytes(&values))
            .with_compression(compression::ZSTD0))
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(4, 0, 4, 4), gray16_bytes(&values))
            .with_hilo_packed_zstd());
    let reader = open(&builder);

    for index in 0..2 {
        let bitmap = reader.read_subblock(index).unwrap().create_bitmap().unwrap();
        let guard = BitmapLockGuard::acquire(bitmap.as_ref());
        assert_eq!(&guard.data()[..32], gray16_bytes(&values).as_slice());
    }
}

#[test]
fn test_subblock_out_of_range() {
    let reader = open(&CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(0, 0, 1, 1), vec![0])));

    assert!(matches!(reader.read_subblock(5), Err(CziError::SubblockOutOfRange { index: 5, count: 1 })));
    assert!(reader.subblock_info(1).is_err());
}

#[test]
fn test_enumeration_can_stop_early() {
    let mut builder = CziBuilder::new();
    for x in 0..5 {
        builder = builder.add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(x, 0, 1, 1), vec![0]));
    }
    let reader = open(&builder);

    let mut seen = Vec::new();
    reader.enumerate_subblocks(&mut |index, _| {
        seen.push(index);
        index < 2
    }).unwrap();

    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn test_downscaled_subblock_is_not_layer0() {
    let builder = CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(0, 0, 4, 4), vec![0; 4])
            .with_physical_size(2, 2));
    let reader = open(&builder);

    let info = reader.subblock_info(0).unwrap();
    assert_eq!((info.physical_width, info.physical_height), (2, 2));
    assert!(!info.is_layer0());
}

#[test]
fn test_not_a_czi_file() {
    let result = CziReader::from_reader(Cursor::new(vec![0u8; 1024]));
    assert!(matches!(result, Err(CziError::InvalidSegment { offset: 0, .. })));
}

#[test]
fn test_truncated_file() {
    let bytes = CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(0, 0, 2, 2), vec![0; 4]))
        .build()
        .unwrap();
    let result = CziReader::from_reader(Cursor::new(bytes[..100].to_vec()));
    assert!(matches!(result, Err(CziError::Io(_))));
}
