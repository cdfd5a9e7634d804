//! ZISRAW segment parsing
//!
//! Every structure in a CZI file lives in a segment that starts with a
//! 32-byte header: a 16-byte NUL padded ASCII id, the allocated size and
//! the used size of the segment data.

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};
use std::io::{Read, SeekFrom};

use crate::czi::constants::{sizes, DIRECTORY_ENTRY_SCHEMA};
use crate::czi::errors::{CziError, CziResult};
use crate::czi::types::{DimCoordinate, Dimension, IntRect, PixelType, SubblockInfo};
use crate::io::seekable::SeekableReader;

/// Header preceding every segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentHeader {
    pub id: String,
    pub allocated_size: i64,
    pub used_size: i64,
}

impl SegmentHeader {
    /// Read a segment header at the current position
    pub fn read(reader: &mut dyn SeekableReader) -> CziResult<Self> {
        let mut id_bytes = [0u8; sizes::SEGMENT_ID];
        reader.read_exact(&mut id_bytes)?;
        let end = id_bytes.iter().position(|&b| b == 0).unwrap_or(id_bytes.len());
        let id = String::from_utf8_lossy(&id_bytes[..end]).into_owned();

        let allocated_size = reader.read_i64::<LittleEndian>()?;
        let used_size = reader.read_i64::<LittleEndian>()?;

        Ok(SegmentHeader { id, allocated_size, used_size })
    }

    /// Seek to `offset` and read a segment header, checking its id
    pub fn read_expected(reader: &mut dyn SeekableReader, offset: u64, expected: &'static str) -> CziResult<Self> {
        reader.seek(SeekFrom::Start(offset))?;
        let header = Self::read(reader)?;
        if header.id != expected {
            return Err(CziError::InvalidSegment {
                expected,
                found: header.id,
                offset,
            });
        }
        debug!("Segment {} at offset {} ({} bytes used)", header.id, offset, header.used_size);
        Ok(header)
    }
}

/// Contents of the ZISRAWFILE segment
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    pub major: i32,
    pub minor: i32,
    pub primary_file_guid: [u8; 16],
    pub file_guid: [u8; 16],
    pub file_part: i32,
    pub directory_position: u64,
    pub metadata_position: u64,
    pub update_pending: bool,
    pub attachment_directory_position: u64,
}

impl FileHeader {
    /// Read the file header segment data at the current position
    pub fn read(reader: &mut dyn SeekableReader) -> CziResult<Self> {
        let major = reader.read_i32::<LittleEndian>()?;
        let minor = reader.read_i32::<LittleEndian>()?;
        let _reserved1 = reader.read_i32::<LittleEndian>()?;
        let _reserved2 = reader.read_i32::<LittleEndian>()?;

        let mut primary_file_guid = [0u8; 16];
        reader.read_exact(&mut primary_file_guid)?;
        let mut file_guid = [0u8; 16];
        reader.read_exact(&mut file_guid)?;

        let file_part = reader.read_i32::<LittleEndian>()?;
        let directory_position = read_position(reader, "subblock directory")?;
        let metadata_position = read_position(reader, "metadata")?;
        let update_pending = reader.read_i32::<LittleEndian>()? != 0;
        let attachment_directory_position = read_position(reader, "attachment directory")?;

        Ok(FileHeader {
            major,
            minor,
            primary_file_guid,
            file_guid,
            file_part,
            directory_position,
            metadata_position,
            update_pending,
            attachment_directory_position,
        })
    }
}

fn read_position(reader: &mut dyn SeekableReader, what: &str) -> CziResult<u64> {
    let position = reader.read_i64::<LittleEndian>()?;
    u64::try_from(position)
        .map_err(|_| CziError::InvalidHeader(format!("negative {} position {}", what, position)))
}

/// Read a DV directory entry at the current position
///
/// # Returns
/// The subblock information and the number of bytes the entry occupies
pub fn read_directory_entry(reader: &mut dyn SeekableReader) -> CziResult<(SubblockInfo, usize)> {
    let mut schema = [0u8; 2];
    reader.read_exact(&mut schema)?;
    if &schema != DIRECTORY_ENTRY_SCHEMA {
        return Err(CziError::InvalidHeader(format!(
            "unsupported directory entry schema '{}'", String::from_utf8_lossy(&schema))));
    }

    let pixel_type = PixelType::from_code(reader.read_i32::<LittleEndian>()?)?;
    let file_position = read_position(reader, "subblock")?;
    let _file_part = reader.read_i32::<LittleEndian>()?;
    let compression = reader.read_i32::<LittleEndian>()?;
    let pyramid_type = reader.read_u8()?;
    let mut spare = [0u8; 5];
    reader.read_exact(&mut spare)?;
    let dimension_count = reader.read_i32::<LittleEndian>()?;
    if dimension_count < 0 {
        return Err(CziError::InvalidHeader(format!("negative dimension count {}", dimension_count)));
    }

    let mut coordinate = DimCoordinate::new();
    let mut logical_rect = IntRect::default();
    let mut physical_width = 0u32;
    let mut physical_height = 0u32;
    let mut m_index = None;

    for _ in 0..dimension_count {
        let mut name = [0u8; 4];
        reader.read_exact(&mut name)?;
        let start = reader.read_i32::<LittleEndian>()?;
        let size = reader.read_i32::<LittleEndian>()?;
        let _start_coordinate = reader.read_f32::<LittleEndian>()?;
        let stored_size = reader.read_i32::<LittleEndian>()?;

        let letter = name[0] as char;
        match letter {
            'X' => {
                logical_rect.x = start;
                logical_rect.w = size;
                physical_width = stored_size.max(0) as u32;
            },
            'Y' => {
                logical_rect.y = start;
                logical_rect.h = size;
                physical_height = stored_size.max(0) as u32;
            },
            'M' => m_index = Some(start),
            _ => match Dimension::from_letter(letter) {
                Some(dimension) => coordinate.set(dimension, start),
                None => warn!("Ignoring unknown dimension '{}'", String::from_utf8_lossy(&name)),
            },
        }
    }

    let info = SubblockInfo {
        coordinate,
        logical_rect,
        physical_width,
        physical_height,
        pixel_type,
        compression,
        m_index,
        pyramid_type,
        file_position,
    };
    let entry_size = sizes::DIRECTORY_ENTRY_FIXED + sizes::DIMENSION_ENTRY * dimension_count as usize;
    Ok((info, entry_size))
}

/// Read the bytes of a sized block at the current position
pub fn read_block(reader: &mut dyn SeekableReader, len: i64, what: &str) -> CziResult<Vec<u8>> {
    let len = usize::try_from(len)
        .map_err(|_| CziError::InvalidHeader(format!("negative {} size {}", what, len)))?;
    let mut buffer = Vec::new();
    (&mut *reader).take(len as u64).read_to_end(&mut buffer)?;
    if buffer.len() != len {
        return Err(CziError::InvalidHeader(format!(
            "{} truncated: {} of {} bytes present", what, buffer.len(), len)));
    }
    Ok(buffer)
}
