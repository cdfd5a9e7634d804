use std::path::Path;

use crate::czi::errors::CziResult;
use crate::czi::CziReader;
use crate::extractor::{
    container_report, ArrayFormat, PixelArray, RegionSelector, SceneExtractor,
    SubblockCollection,
};
use crate::utils::logger::Logger;

/// Main interface to the czikit library
pub struct CziKit {
    logger: Logger,
}

impl CziKit {
    /// Create a new CziKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "czikit.log"
    ///
    /// # Returns
    /// A CziKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> CziResult<Self> {
        let log_path = log_file.unwrap_or("czikit.log");
        let logger = Logger::new(log_path)?;
        Ok(CziKit { logger })
    }

    /// Create an instance that keeps no operation journal
    pub fn without_journal() -> Self {
        CziKit { logger: Logger::disabled() }
    }

    /// Logger used for the operation journal
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Read the raw metadata XML of a CZI file
    ///
    /// # Arguments
    /// * `input_path` - Path to the CZI file
    ///
    /// # Returns
    /// The metadata document, unmodified
    pub fn read_metadata(&self, input_path: &str) -> CziResult<String> {
        SceneExtractor::new(&self.logger).read_metadata(Path::new(input_path))
    }

    /// Read one region of a CZI file as a `[y][x]` array
    ///
    /// # Arguments
    /// * `input_path` - Path to the CZI file
    /// * `selector` - Scene index (negative for all scenes) or explicit box
    ///
    /// # Returns
    /// The composed channel-0 region
    pub fn read_scene(&self, input_path: &str, selector: &RegionSelector) -> CziResult<PixelArray> {
        SceneExtractor::new(&self.logger).extract_region(Path::new(input_path), selector)
    }

    /// Read one region given as a list of integers
    ///
    /// One value is a scene index, four values are `x, y, w, h`. The count
    /// is checked before the file is opened.
    pub fn read_scene_values(&self, input_path: &str, values: &[i64]) -> CziResult<PixelArray> {
        let selector = RegionSelector::from_values(values)?;
        self.read_scene(input_path, &selector)
    }

    /// Decode every subblock of a CZI file
    ///
    /// # Returns
    /// One array per subblock plus the `(x, y)` origin of each
    pub fn read_all_subblocks(&self, input_path: &str) -> CziResult<SubblockCollection> {
        SceneExtractor::new(&self.logger).extract_subblocks(Path::new(input_path), None)
    }

    /// Number of subblocks in a CZI file
    pub fn count_subblocks(&self, input_path: &str) -> CziResult<usize> {
        SceneExtractor::new(&self.logger).count_subblocks(Path::new(input_path))
    }

    /// Extract a region and save it to a file
    ///
    /// # Arguments
    /// * `input_path` - Path to the CZI file
    /// * `output_path` - Where to save the array
    /// * `selector` - Scene index or explicit box
    /// * `format` - Output format; inferred from the output extension if `None`
    pub fn extract_scene_to_file(&self,
                                 input_path: &str,
                                 output_path: &str,
                                 selector: &RegionSelector,
                                 format: Option<ArrayFormat>) -> CziResult<()> {
        let output = Path::new(output_path);
        let format = match format {
            Some(format) => format,
            None => ArrayFormat::from_path(output)?,
        };
        SceneExtractor::new(&self.logger).save_region(Path::new(input_path), output, selector, format)
    }

    /// Export every subblock of a CZI file into a directory
    ///
    /// # Arguments
    /// * `input_path` - Path to the CZI file
    /// * `output_dir` - Directory to write into, created if missing
    /// * `format` - Array format for the subblocks
    /// * `prefix` - File name prefix
    ///
    /// # Returns
    /// The number of subblocks written
    pub fn export_subblocks(&self,
                            input_path: &str,
                            output_dir: &str,
                            format: ArrayFormat,
                            prefix: &str) -> CziResult<usize> {
        SceneExtractor::new(&self.logger)
            .export_subblocks(Path::new(input_path), Path::new(output_dir), format, prefix, None)
    }

    /// Analyze a CZI file and return information about its structure
    ///
    /// # Arguments
    /// * `input_path` - Path to the CZI file to analyze
    ///
    /// # Returns
    /// String containing analysis information or an error
    pub fn analyze(&self, input_path: &str) -> CziResult<String> {
        let reader = CziReader::open(input_path)?;
        let report = container_report(&reader);
        reader.close();

        let report = report?;
        self.logger.log(&format!("Analyzed {}", input_path))?;
        Ok(report)
    }
}
