//! Scene extraction pipeline
//!
//! Ties the pieces together per call: open the container, resolve the
//! region, compose it, copy it into an array. The source is opened for a
//! single operation and dropped when the operation ends, whether it
//! succeeded or not.

use log::{error, info};
use std::fs;
use std::path::Path;

use crate::czi::errors::CziResult;
use crate::czi::reader::CziReader;
use crate::czi::source::ImageSource;
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

use super::array_output::{save_array, save_coordinates, ArrayFormat};
use super::composer::compose_region;
use super::enumerator::{count_subblocks, enumerate_all_with_progress, SubblockCollection};
use super::pixel_codec::{copy_bitmap_to_buffer, PixelArray};
use super::region::{resolve_region, RegionSelector};

/// Extracts regions and subblocks from CZI files
pub struct SceneExtractor<'a> {
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> SceneExtractor<'a> {
    pub fn new(logger: &'a Logger) -> Self {
        SceneExtractor { logger }
    }

    /// Read the metadata XML of a file
    pub fn read_metadata(&self, path: &Path) -> CziResult<String> {
        let reader = CziReader::open(path)?;
        let xml = reader.read_metadata_xml()?;
        reader.close();
        self.logger.log(&format!("Read {} bytes of metadata from {}", xml.len(), path.display()))?;
        Ok(xml)
    }

    /// Extract the region a selector describes from a file
    ///
    /// # Arguments
    /// * `path` - CZI file to open
    /// * `selector` - Scene index or explicit box
    ///
    /// # Returns
    /// The composed region as an array indexed `[y][x]`
    pub fn extract_region(&self, path: &Path, selector: &RegionSelector) -> CziResult<PixelArray> {
        let reader = CziReader::open(path)?;
        let array = self.extract_region_from(&reader, selector);
        reader.close();

        match &array {
            Ok(a) => self.logger.log(&format!(
                "Extracted {:?} from {} as {:?} {:?}", selector, path.display(), a.element_type(), a.shape()))?,
            Err(e) => error!("Extraction of {:?} from {} failed: {}", selector, path.display(), e),
        }
        array
    }

    /// Extract the region a selector describes from an opened source
    pub fn extract_region_from(&self, source: &dyn ImageSource, selector: &RegionSelector) -> CziResult<PixelArray> {
        let rect = resolve_region(source, selector)?;
        info!("Resolved {:?} to {}", selector, rect);
        let bitmap = compose_region(source, rect)?;
        copy_bitmap_to_buffer(bitmap.as_ref())
    }

    /// Decode every subblock of a file
    pub fn extract_subblocks(&self, path: &Path, progress: Option<&ProgressTracker>) -> CziResult<SubblockCollection> {
        let reader = CziReader::open(path)?;
        let collection = enumerate_all_with_progress(&reader, progress);
        reader.close();

        let collection = collection?;
        self.logger.log(&format!("Decoded {} subblocks from {}", collection.len(), path.display()))?;
        Ok(collection)
    }

    /// Number of subblocks in a file
    pub fn count_subblocks(&self, path: &Path) -> CziResult<usize> {
        let reader = CziReader::open(path)?;
        let count = count_subblocks(&reader);
        reader.close();
        count
    }

    /// Extract a region and save it
    ///
    /// # Arguments
    /// * `path` - CZI file to open
    /// * `output` - File to write
    /// * `selector` - Scene index or explicit box
    /// * `format` - Output format
    pub fn save_region(&self, path: &Path, output: &Path, selector: &RegionSelector, format: ArrayFormat) -> CziResult<()> {
        let array = self.extract_region(path, selector)?;
        save_array(&array, output, format)?;
        self.logger.log(&format!("Saved {:?} of {} to {}", selector, path.display(), output.display()))?;
        Ok(())
    }

    /// Decode every subblock of a file and write them into a directory
    ///
    /// Writes `<prefix>_<index>.<ext>` per subblock and the coordinate
    /// table as `coordinates.<ext>`. Image formats cannot hold the table,
    /// so it is written as CSV for them.
    ///
    /// # Returns
    /// The number of subblocks written
    pub fn export_subblocks(&self,
                            path: &Path,
                            output_dir: &Path,
                            format: ArrayFormat,
                            prefix: &str,
                            progress: Option<&ProgressTracker>) -> CziResult<usize> {
        let collection = self.extract_subblocks(path, progress)?;

        fs::create_dir_all(output_dir)?;
        for (index, array) in collection.arrays.iter().enumerate() {
            let file = output_dir.join(format!("{}_{}.{}", prefix, index, format.extension()));
            save_array(array, &file, format)?;
        }

        let coordinate_format = if format.is_image() { ArrayFormat::Csv } else { format };
        let coordinate_file = output_dir.join(format!("coordinates.{}", coordinate_format.extension()));
        save_coordinates(&collection.coordinates, &coordinate_file, coordinate_format)?;

        info!("Exported {} subblocks to {}", collection.len(), output_dir.display());
        self.logger.log(&format!("Exported {} subblocks of {} to {}",
                                 collection.len(), path.display(), output_dir.display()))?;
        Ok(collection.len())
    }
}
