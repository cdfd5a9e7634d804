//! Metadata XML summary
//!
//! The metadata segment is handed out verbatim by
//! [`crate::czi::ImageSource::read_metadata_xml`]. This module only pulls
//! the image sizes out of `ImageDocument/Metadata/Information/Image` for
//! reports.

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::czi::errors::{CziError, CziResult};

/// Image sizes declared in the metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataSummary {
    pub size_x: Option<u32>,
    pub size_y: Option<u32>,
    pub size_z: Option<u32>,
    pub size_c: Option<u32>,
    pub size_t: Option<u32>,
    pub size_s: Option<u32>,
    pub size_m: Option<u32>,
    pub pixel_type: Option<String>,
}

impl MetadataSummary {
    /// Parse the summary out of a metadata XML document
    pub fn from_xml(xml: &str) -> CziResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut summary = MetadataSummary::default();
        let mut path: Vec<String> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(element) => {
                    path.push(String::from_utf8_lossy(element.name().as_ref()).into_owned());
                },
                Event::End(_) => {
                    path.pop();
                },
                Event::Text(text) => {
                    if !in_image_information(&path) {
                        continue;
                    }
                    let Some(field) = path.last() else { continue };
                    let value = text.unescape().map_err(|e| CziError::Xml(e.to_string()))?;
                    summary.record(field, value.trim())?;
                },
                Event::Eof => break,
                _ => {},
            }
        }

        debug!("Metadata summary: {:?}", summary);
        Ok(summary)
    }

    fn record(&mut self, field: &str, value: &str) -> CziResult<()> {
        let slot = match field {
            "SizeX" => &mut self.size_x,
            "SizeY" => &mut self.size_y,
            "SizeZ" => &mut self.size_z,
            "SizeC" => &mut self.size_c,
            "SizeT" => &mut self.size_t,
            "SizeS" => &mut self.size_s,
            "SizeM" => &mut self.size_m,
            "PixelType" => {
                self.pixel_type = Some(value.to_string());
                return Ok(());
            },
            _ => return Ok(()),
        };

        let parsed = value.parse::<u32>()
            .map_err(|_| CziError::Xml(format!("{} is not a number: '{}'", field, value)))?;
        *slot = Some(parsed);
        Ok(())
    }

    /// One-line description of the declared sizes
    pub fn describe(&self) -> String {
        let fields = [
            ("X", self.size_x),
            ("Y", self.size_y),
            ("Z", self.size_z),
            ("C", self.size_c),
            ("T", self.size_t),
            ("S", self.size_s),
            ("M", self.size_m),
        ];
        let sizes: Vec<String> = fields.iter()
            .filter_map(|(name, size)| size.map(|s| format!("{}={}", name, s)))
            .collect();

        match &self.pixel_type {
            Some(pixel_type) => format!("{} ({})", sizes.join(" "), pixel_type),
            None => sizes.join(" "),
        }
    }
}

/// Whether the element path ends in `Information/Image/<field>`
fn in_image_information(path: &[String]) -> bool {
    path.len() >= 3
        && path[path.len() - 3] == "Information"
        && path[path.len() - 2] == "Image"
}
