//! Integration tests for the czikit API

extern crate std;

use std::fs;
use std::path::{Path, PathBuf};

use czikit::czi::constants::compression;
use czikit::czi::{CziBuilder, Dimension, SubblockSpec};
use czikit::extractor::{ArrayFormat, PixelData, RegionSelector};
use czikit::{CziError, CziKit, IntRect, PixelType};

const METADATA: &str = r#"<?xml version="1.0"?>
<ImageDocument><Metadata><Information><Image>
<SizeX>12</SizeX><SizeY>6</SizeY><SizeC>2</SizeC><SizeS>2</SizeS><PixelType>Gray16</PixelType>
</Image></Information></Metadata></ImageDocument>"#;

fn gray16(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Two scenes of 16-bit tiles on channel 0, one tile on channel 1
///
/// Scene 0 covers (0,0)-(4,2), scene 1 covers (8,4)-(12,6).
fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("sample.czi");
    CziBuilder::new()
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(0, 0, 2, 2), gray16(&[1, 2, 3, 4]))
            .with_coordinate(Dimension::C, 0)
            .with_coordinate(Dimension::S, 0)
            .with_m_index(0))
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(2, 0, 2, 2), gray16(&[5, 6, 7, 8]))
            .with_coordinate(Dimension::C, 0)
            .with_coordinate(Dimension::S, 0)
            .with_m_index(1)
            .with_hilo_packed_zstd())
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(8, 4, 4, 2), gray16(&[9; 8]))
            .with_coordinate(Dimension::C, 0)
            .with_coordinate(Dimension::S, 1)
            .with_compression(compression::ZSTD0))
        .add_subblock(SubblockSpec::new(PixelType::Gray16, IntRect::new(0, 0, 2, 2), gray16(&[500; 4]))
            .with_coordinate(Dimension::C, 1)
            .with_coordinate(Dimension::S, 0))
        .metadata(METADATA)
        .write_file(&path)
        .unwrap();
    path
}

#[test]
fn test_read_scene_by_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let array = kit.read_scene_values(path.to_str().unwrap(), &[0]).unwrap();

    std::assert_eq!(array.shape(), [2, 4]);
    std::assert_eq!(array.data(), &PixelData::U16(vec![1, 2, 5, 6, 3, 4, 7, 8]));
    std::assert!(array.is_c_contiguous());
}

#[test]
fn test_read_all_scenes_fills_gaps_with_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let array = kit.read_scene(path.to_str().unwrap(), &RegionSelector::SceneIndex(-1)).unwrap();

    std::assert_eq!(array.shape(), [6, 12]);
    std::assert_eq!(array.get(0, 0), Some(1));
    std::assert_eq!(array.get(1, 3), Some(8));
    std::assert_eq!(array.get(2, 6), Some(0));
    std::assert_eq!(array.get(5, 11), Some(9));
}

#[test]
fn test_read_explicit_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let array = kit.read_scene_values(path.to_str().unwrap(), &[1, 1, 2, 1]).unwrap();

    std::assert_eq!(array.shape(), [1, 2]);
    std::assert_eq!(array.data(), &PixelData::U16(vec![4, 7]));
}

#[test]
fn test_unknown_scene_is_degenerate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let result = kit.read_scene_values(path.to_str().unwrap(), &[5]);
    std::assert!(matches!(result, Err(CziError::DegenerateRegion(_))));
}

#[test]
fn test_huge_box_fails_without_aborting() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let result = kit.read_scene_values(path.to_str().unwrap(), &[0, 0, i32::MAX as i64, i32::MAX as i64]);
    std::assert!(matches!(result, Err(CziError::BitmapTooLarge { .. })));
}

#[test]
fn test_bad_selector_fails_before_opening_the_file() {
    let kit = CziKit::without_journal();
    let result = kit.read_scene_values("/nonexistent/file.czi", &[1, 2]);
    std::assert!(matches!(result, Err(CziError::Usage(_))));

    let result = kit.read_scene_values("/nonexistent/file.czi", &[0]);
    std::assert!(matches!(result, Err(CziError::Io(_))));
}

#[test]
fn test_read_all_subblocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let collection = kit.read_all_subblocks(path.to_str().unwrap()).unwrap();

    std::assert_eq!(collection.len(), 4);
    std::assert_eq!(collection.coordinates, vec![[0, 0], [2, 0], [8, 4], [0, 0]]);
    std::assert_eq!(collection.arrays[1].data(), &PixelData::U16(vec![5, 6, 7, 8]));
    std::assert_eq!(collection.arrays[2].shape(), [2, 4]);
    std::assert_eq!(collection.arrays[3].get(0, 0), Some(500));
}

#[test]
fn test_read_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    std::assert_eq!(kit.read_metadata(path.to_str().unwrap()).unwrap(), METADATA);
}

#[test]
fn test_extract_scene_to_npy() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let output = dir.path().join("scene0.npy");
    let kit = CziKit::new(Some(dir.path().join("journal.log").to_str().unwrap())).unwrap();

    kit.extract_scene_to_file(path.to_str().unwrap(), output.to_str().unwrap(),
                              &RegionSelector::SceneIndex(0), None).unwrap();

    let bytes = fs::read(&output).unwrap();
    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let header = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
    std::assert!(header.contains("'shape': (2, 4)"));
    std::assert_eq!(bytes.len(), 10 + header_len + 16);

    let journal = fs::read_to_string(dir.path().join("journal.log")).unwrap();
    std::assert!(journal.contains("scene0.npy"));
}

#[test]
fn test_export_subblocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let out = dir.path().join("tiles");
    let kit = CziKit::without_journal();

    let written = kit.export_subblocks(path.to_str().unwrap(), out.to_str().unwrap(), ArrayFormat::Csv, "tile").unwrap();

    std::assert_eq!(written, 4);
    for index in 0..4 {
        std::assert!(out.join(format!("tile_{}.csv", index)).exists());
    }
    let coordinates = fs::read_to_string(out.join("coordinates.csv")).unwrap();
    std::assert_eq!(coordinates, "index,x,y\n0,0,0\n1,2,0\n2,8,4\n3,0,0\n");
}

#[test]
fn test_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let kit = CziKit::without_journal();

    let report = kit.analyze(path.to_str().unwrap()).unwrap();

    std::assert!(report.contains("Number of subblocks: 4"));
    std::assert!(report.contains("Zstd1 (6): 1 subblocks"));
    std::assert!(report.contains("Scene 0: (x=0, y=0, w=4, h=2)"));
    std::assert!(report.contains("Scene 1: (x=8, y=4, w=4, h=2)"));
    std::assert!(report.contains("Metadata: X=12 Y=6 C=2 S=2 (Gray16)"));
}
