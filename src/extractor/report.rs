//! Container structure report
//!
//! Summarizes what a CZI file holds: version, subblock counts by pixel
//! type and compression, the dimensions in use, the bounds of every scene
//! and the image sizes declared in the metadata.

use log::warn;
use std::collections::{BTreeMap, BTreeSet};

use crate::czi::codes::{compression_name, dimension_description, pixel_type_name};
use crate::czi::errors::CziResult;
use crate::czi::{CziReader, Dimension, ImageSource, MetadataSummary};
use crate::io::seekable::SeekableReader;

use super::region::{resolve_region, RegionSelector};

/// Counts gathered in one pass over the directory
#[derive(Debug, Default)]
struct DirectoryStats {
    pixel_types: BTreeMap<i32, usize>,
    compressions: BTreeMap<i32, usize>,
    dimensions: BTreeSet<Dimension>,
    scenes: BTreeSet<i32>,
    layer0: usize,
}

/// Build a human-readable report of an opened container
///
/// # Arguments
/// * `reader` - Opened CZI reader
///
/// # Returns
/// The report text, or an error from the reader
pub fn container_report<R: SeekableReader>(reader: &CziReader<R>) -> CziResult<String> {
    let header = reader.header();
    let mut result = "CZI Analysis Results:\n".to_string();
    result.push_str(&format!("  Version: {}.{}\n", header.major, header.minor));
    result.push_str(&format!("  Number of subblocks: {}\n", reader.subblock_count()));

    let mut stats = DirectoryStats::default();
    reader.enumerate_subblocks(&mut |_, info| {
        *stats.pixel_types.entry(info.pixel_type.code()).or_default() += 1;
        *stats.compressions.entry(info.compression).or_default() += 1;
        stats.dimensions.extend(info.coordinate.iter().map(|(dimension, _)| dimension));
        if let Some(scene) = info.coordinate.try_get(Dimension::S) {
            stats.scenes.insert(scene);
        }
        if info.is_layer0() {
            stats.layer0 += 1;
        }
        true
    })?;
    result.push_str(&format!("  Layer-0 subblocks: {}\n", stats.layer0));

    result.push_str("\nPixel types:\n");
    for (code, count) in &stats.pixel_types {
        result.push_str(&format!("  {} ({}): {} subblocks\n", pixel_type_name(*code), code, count));
    }

    result.push_str("\nCompression:\n");
    for (code, count) in &stats.compressions {
        result.push_str(&format!("  {} ({}): {} subblocks\n", compression_name(*code), code, count));
    }

    result.push_str("\nDimensions:\n");
    for dimension in &stats.dimensions {
        let letter = dimension.letter().to_string();
        result.push_str(&format!("  {}: {}\n", letter, dimension_description(&letter)));
    }

    result.push_str("\nScenes:\n");
    for scene in &stats.scenes {
        let rect = resolve_region(reader, &RegionSelector::SceneIndex(*scene))?;
        result.push_str(&format!("  Scene {}: {}\n", scene, rect));
    }
    let all = resolve_region(reader, &RegionSelector::SceneIndex(-1))?;
    result.push_str(&format!("  All scenes: {}\n", all));

    if header.metadata_position == 0 {
        result.push_str("\nMetadata: none\n");
        return Ok(result);
    }

    // A broken metadata document should not hide the rest of the report
    match reader.read_metadata_xml().and_then(|xml| MetadataSummary::from_xml(&xml)) {
        Ok(summary) => result.push_str(&format!("\nMetadata: {}\n", summary.describe())),
        Err(e) => {
            warn!("Could not summarize metadata: {}", e);
            result.push_str("\nMetadata: unreadable\n");
        },
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::czi::{CziBuilder, IntRect, PixelType, SubblockSpec};

    #[test]
    fn report_lists_scenes_and_codes() {
        let bytes = CziBuilder::new()
            .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(0, 0, 2, 2), vec![0; 4])
                .with_coordinate(Dimension::C, 0)
                .with_coordinate(Dimension::S, 0))
            .add_subblock(SubblockSpec::new(PixelType::Gray8, IntRect::new(10, 0, 2, 2), vec![0; 4])
                .with_coordinate(Dimension::C, 0)
                .with_coordinate(Dimension::S, 1))
            .metadata("<ImageDocument><Metadata><Information><Image><SizeX>12</SizeX><SizeS>2</SizeS></Image></Information></Metadata></ImageDocument>")
            .build()
            .unwrap();
        let reader = CziReader::from_reader(Cursor::new(bytes)).unwrap();

        let report = container_report(&reader).unwrap();

        assert!(report.contains("Version: 1.0"));
        assert!(report.contains("Number of subblocks: 2"));
        assert!(report.contains("Gray8 (0): 2 subblocks"));
        assert!(report.contains("Uncompressed (0): 2 subblocks"));
        assert!(report.contains("Scene 1: (x=10, y=0, w=2, h=2)"));
        assert!(report.contains("All scenes: (x=0, y=0, w=12, h=2)"));
        assert!(report.contains("Metadata: X=12 S=2"));
    }
}
