//! CZI container writer
//!
//! Writes small ZISRAW containers: a file header, one segment per
//! subblock, a subblock directory and an optional metadata segment.
//! Used for fixtures; the layout matches what [`crate::czi::CziReader`]
//! expects.

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info};
use std::fs;
use std::io::{Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use crate::compression::{CompressionFactory, CompressionHandler, Zstd1Handler};
use crate::czi::constants::{compression, segments, sizes, DIRECTORY_ENTRY_SCHEMA};
use crate::czi::errors::{CziError, CziResult};
use crate::czi::types::{DimCoordinate, Dimension, IntRect, PixelType};

/// Segment sizes are kept at multiples of this
const SEGMENT_ALIGNMENT: u64 = 32;

/// Description of one subblock to write
#[derive(Debug, Clone)]
pub struct SubblockSpec {
    pub pixel_type: PixelType,
    pub logical_rect: IntRect,
    pub physical_width: u32,
    pub physical_height: u32,
    pub coordinate: DimCoordinate,
    pub m_index: Option<i32>,
    pub compression: i32,
    pub hilo_packing: bool,
    /// Tightly packed pixel rows of the physical size
    pub data: Vec<u8>,
}

impl SubblockSpec {
    /// Uncompressed layer-0 subblock covering `rect`
    pub fn new(pixel_type: PixelType, rect: IntRect, data: Vec<u8>) -> Self {
        SubblockSpec {
            pixel_type,
            logical_rect: rect,
            physical_width: rect.w.max(0) as u32,
            physical_height: rect.h.max(0) as u32,
            coordinate: DimCoordinate::new(),
            m_index: None,
            compression: compression::UNCOMPRESSED,
            hilo_packing: false,
            data,
        }
    }

    pub fn with_coordinate(mut self, dimension: Dimension, value: i32) -> Self {
        self.coordinate.set(dimension, value);
        self
    }

    pub fn with_m_index(mut self, m_index: i32) -> Self {
        self.m_index = Some(m_index);
        self
    }

    pub fn with_compression(mut self, code: i32) -> Self {
        self.compression = code;
        self
    }

    /// Compress as zstd1 with 16-bit values split into byte planes
    pub fn with_hilo_packed_zstd(mut self) -> Self {
        self.compression = compression::ZSTD1;
        self.hilo_packing = true;
        self
    }

    /// Store the data at a size different from the logical rectangle
    pub fn with_physical_size(mut self, width: u32, height: u32) -> Self {
        self.physical_width = width;
        self.physical_height = height;
        self
    }

    fn encoded_data(&self) -> CziResult<Vec<u8>> {
        let expected = self.physical_width as usize * self.physical_height as usize * self.pixel_type.bytes_per_pixel();
        if self.data.len() != expected {
            return Err(CziError::Usage(format!(
                "subblock {}x{} {} needs {} bytes, got {}",
                self.physical_width, self.physical_height, self.pixel_type, expected, self.data.len())));
        }

        let handler: Box<dyn CompressionHandler> = if self.hilo_packing {
            Box::new(Zstd1Handler::with_hilo_packing(true))
        } else {
            CompressionFactory::create_handler(self.compression)?
        };
        handler.compress(&self.data)
    }
}

/// Builder assembling a CZI container in memory
#[derive(Debug, Default)]
pub struct CziBuilder {
    subblocks: Vec<SubblockSpec>,
    metadata: Option<String>,
}

impl CziBuilder {
    pub fn new() -> Self {
        CziBuilder::default()
    }

    /// Add a subblock; subblocks are written in insertion order
    pub fn add_subblock(mut self, spec: SubblockSpec) -> Self {
        self.subblocks.push(spec);
        self
    }

    /// Set the metadata XML document
    pub fn metadata(mut self, xml: &str) -> Self {
        self.metadata = Some(xml.to_string());
        self
    }

    /// Assemble the container bytes
    pub fn build(&self) -> CziResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());

        // File header, positions patched at the end
        write_segment_header(&mut out, segments::FILE_HEADER, sizes::FILE_HEADER_DATA)?;
        out.write_all(&[0u8; sizes::FILE_HEADER_DATA as usize])?;

        let mut entries = Vec::with_capacity(self.subblocks.len());
        for spec in &self.subblocks {
            let position = out.position();
            let data = spec.encoded_data()?;
            let entry = directory_entry(spec, position)?;

            let header_size = (16 + entry.len() as u64).max(sizes::SUBBLOCK_HEADER_MINIMUM);
            let used = header_size + data.len() as u64;
            write_segment_header(&mut out, segments::SUBBLOCK, used)?;
            out.write_i32::<LittleEndian>(0)?;
            out.write_i32::<LittleEndian>(0)?;
            out.write_i64::<LittleEndian>(data.len() as i64)?;
            out.write_all(&entry)?;
            out.write_all(&vec![0u8; (header_size - 16) as usize - entry.len()])?;
            out.write_all(&data)?;
            pad_segment(&mut out, used)?;

            debug!("Wrote subblock at {} ({} data bytes)", position, data.len());
            entries.push(entry);
        }

        let directory_position = out.position();
        let entries_len: u64 = entries.iter().map(|e| e.len() as u64).sum();
        let used = sizes::DIRECTORY_HEADER + entries_len;
        write_segment_header(&mut out, segments::DIRECTORY, used)?;
        out.write_i32::<LittleEndian>(entries.len() as i32)?;
        out.write_all(&[0u8; sizes::DIRECTORY_HEADER as usize - 4])?;
        for entry in &entries {
            out.write_all(entry)?;
        }
        pad_segment(&mut out, used)?;

        let metadata_position = match &self.metadata {
            Some(xml) => {
                let position = out.position();
                let used = sizes::METADATA_HEADER + xml.len() as u64;
                write_segment_header(&mut out, segments::METADATA, used)?;
                out.write_i32::<LittleEndian>(xml.len() as i32)?;
                out.write_i32::<LittleEndian>(0)?;
                out.write_all(&[0u8; sizes::METADATA_HEADER as usize - 8])?;
                out.write_all(xml.as_bytes())?;
                pad_segment(&mut out, used)?;
                position
            },
            None => 0,
        };

        // Version, GUIDs and directory positions
        out.seek(SeekFrom::Start(sizes::SEGMENT_HEADER))?;
        out.write_i32::<LittleEndian>(1)?;
        out.write_i32::<LittleEndian>(0)?;
        out.seek(SeekFrom::Current(8 + 32 + 4))?;
        out.write_i64::<LittleEndian>(directory_position as i64)?;
        out.write_i64::<LittleEndian>(metadata_position as i64)?;

        info!("Built CZI container with {} subblocks", self.subblocks.len());
        Ok(out.into_inner())
    }

    /// Assemble the container and write it to `path`
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> CziResult<()> {
        let bytes = self.build()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

fn write_segment_header(out: &mut Cursor<Vec<u8>>, id: &str, used: u64) -> CziResult<()> {
    let mut id_bytes = [0u8; sizes::SEGMENT_ID];
    id_bytes[..id.len()].copy_from_slice(id.as_bytes());
    out.write_all(&id_bytes)?;
    out.write_i64::<LittleEndian>(aligned(used) as i64)?;
    out.write_i64::<LittleEndian>(used as i64)?;
    Ok(())
}

fn pad_segment(out: &mut Cursor<Vec<u8>>, used: u64) -> CziResult<()> {
    out.write_all(&vec![0u8; (aligned(used) - used) as usize])?;
    Ok(())
}

fn aligned(size: u64) -> u64 {
    size.div_ceil(SEGMENT_ALIGNMENT) * SEGMENT_ALIGNMENT
}

fn directory_entry(spec: &SubblockSpec, file_position: u64) -> CziResult<Vec<u8>> {
    let mut entry = Vec::new();
    entry.write_all(DIRECTORY_ENTRY_SCHEMA)?;
    entry.write_i32::<LittleEndian>(spec.pixel_type.code())?;
    entry.write_i64::<LittleEndian>(file_position as i64)?;
    entry.write_i32::<LittleEndian>(0)?;
    entry.write_i32::<LittleEndian>(spec.compression)?;
    entry.write_u8(0)?;
    entry.write_all(&[0u8; 5])?;

    let dimension_count = 2 + spec.coordinate.iter().count() + usize::from(spec.m_index.is_some());
    entry.write_i32::<LittleEndian>(dimension_count as i32)?;

    let rect = spec.logical_rect;
    write_dimension(&mut entry, 'X', rect.x, rect.w, spec.physical_width as i32)?;
    write_dimension(&mut entry, 'Y', rect.y, rect.h, spec.physical_height as i32)?;
    for (dimension, value) in spec.coordinate.iter() {
        write_dimension(&mut entry, dimension.letter(), value, 1, 1)?;
    }
    if let Some(m_index) = spec.m_index {
        write_dimension(&mut entry, 'M', m_index, 1, 1)?;
    }
    Ok(entry)
}

fn write_dimension(entry: &mut Vec<u8>, letter: char, start: i32, size: i32, stored_size: i32) -> CziResult<()> {
    entry.write_all(&[letter as u8, 0, 0, 0])?;
    entry.write_i32::<LittleEndian>(start)?;
    entry.write_i32::<LittleEndian>(size)?;
    entry.write_f32::<LittleEndian>(0.0)?;
    entry.write_i32::<LittleEndian>(stored_size)?;
    Ok(())
}
