//! CZI file reader implementation
//!
//! Opens a ZISRAW container, reads the file header and the subblock
//! directory up front, and serves metadata and subblock payloads on
//! demand. Implements [`ImageSource`] for the extraction core.

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::Path;

use crate::czi::accessor::SingleChannelTileAccessor;
use crate::czi::constants::{segments, sizes};
use crate::czi::errors::{CziError, CziResult};
use crate::czi::segments::{read_block, read_directory_entry, FileHeader, SegmentHeader};
use crate::czi::source::{ImageSource, SubBlock, SubblockVisitor, TileAccessor};
use crate::czi::types::SubblockInfo;
use crate::io::seekable::SeekableReader;

/// Reader for CZI containers
pub struct CziReader<R: SeekableReader> {
    /// Underlying stream; the collaborator interface takes `&self`
    stream: RefCell<R>,
    /// Parsed file header
    header: FileHeader,
    /// Subblock directory in file order
    directory: Vec<SubblockInfo>,
}

impl CziReader<BufReader<File>> {
    /// Opens the CZI file at the given path
    ///
    /// # Arguments
    /// * `filepath` - Path to the CZI file
    ///
    /// # Returns
    /// A reader with the directory loaded, or an error
    pub fn open<P: AsRef<Path>>(filepath: P) -> CziResult<Self> {
        let path = filepath.as_ref();
        info!("Opening CZI file: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::with_capacity(1024 * 1024, file))
    }
}

impl<R: SeekableReader> CziReader<R> {
    /// Reads the file header and subblock directory from a stream
    ///
    /// # Arguments
    /// * `reader` - Any struct implementing the SeekableReader trait
    pub fn from_reader(mut reader: R) -> CziResult<Self> {
        SegmentHeader::read_expected(&mut reader, 0, segments::FILE_HEADER)?;
        let header = FileHeader::read(&mut reader)?;
        info!("CZI version {}.{}, directory at {}, metadata at {}",
              header.major, header.minor, header.directory_position, header.metadata_position);

        if header.directory_position == 0 {
            return Err(CziError::InvalidHeader("file has no subblock directory".to_string()));
        }
        let directory = Self::read_directory(&mut reader, header.directory_position)?;
        info!("Subblock directory holds {} entries", directory.len());

        Ok(CziReader {
            stream: RefCell::new(reader),
            header,
            directory,
        })
    }

    fn read_directory(reader: &mut R, position: u64) -> CziResult<Vec<SubblockInfo>> {
        SegmentHeader::read_expected(reader, position, segments::DIRECTORY)?;
        let entry_count = reader.read_i32::<LittleEndian>()?;
        let entry_count = usize::try_from(entry_count)
            .map_err(|_| CziError::InvalidHeader(format!("negative directory entry count {}", entry_count)))?;

        reader.seek(SeekFrom::Start(position + sizes::SEGMENT_HEADER + sizes::DIRECTORY_HEADER))?;
        let mut directory = Vec::with_capacity(entry_count.min(1 << 16));
        for index in 0..entry_count {
            let (info, _) = read_directory_entry(reader)?;
            debug!("Directory entry {}: {} rect={} {}", index, info.coordinate, info.logical_rect, info.pixel_type);
            directory.push(info);
        }
        Ok(directory)
    }

    /// File header of the container
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Number of subblocks in the directory
    pub fn subblock_count(&self) -> usize {
        self.directory.len()
    }

    /// Directory information of one subblock
    pub fn subblock_info(&self, index: usize) -> CziResult<&SubblockInfo> {
        self.directory.get(index).ok_or(CziError::SubblockOutOfRange {
            index,
            count: self.directory.len(),
        })
    }

    /// Close the reader, releasing the stream
    pub fn close(self) {
        debug!("Closing CZI reader");
        drop(self.stream);
    }
}

impl<R: SeekableReader> ImageSource for CziReader<R> {
    fn enumerate_subblocks(&self, visitor: &mut SubblockVisitor<'_>) -> CziResult<()> {
        for (index, info) in self.directory.iter().enumerate() {
            if !visitor(index, info) {
                debug!("Subblock enumeration stopped at {}", index);
                break;
            }
        }
        Ok(())
    }

    fn read_metadata_xml(&self) -> CziResult<String> {
        let position = self.header.metadata_position;
        if position == 0 {
            return Err(CziError::InvalidHeader("file has no metadata segment".to_string()));
        }

        let mut stream = self.stream.borrow_mut();
        SegmentHeader::read_expected(&mut *stream, position, segments::METADATA)?;
        let xml_size = stream.read_i32::<LittleEndian>()?;
        stream.seek(SeekFrom::Start(position + sizes::SEGMENT_HEADER + sizes::METADATA_HEADER))?;
        let bytes = read_block(&mut *stream, xml_size as i64, "metadata XML")?;

        let xml = String::from_utf8(bytes)
            .map_err(|e| CziError::Xml(format!("metadata is not valid UTF-8: {}", e)))?;
        Ok(xml.trim_end_matches('\0').to_string())
    }

    fn read_subblock(&self, index: usize) -> CziResult<SubBlock> {
        let info = self.subblock_info(index)?.clone();
        let position = info.file_position;

        let mut stream = self.stream.borrow_mut();
        SegmentHeader::read_expected(&mut *stream, position, segments::SUBBLOCK)?;
        let metadata_size = stream.read_i32::<LittleEndian>()?;
        let _attachment_size = stream.read_i32::<LittleEndian>()?;
        let data_size = stream.read_i64::<LittleEndian>()?;
        let (_, entry_size) = read_directory_entry(&mut *stream)?;

        let header_size = (16 + entry_size as u64).max(sizes::SUBBLOCK_HEADER_MINIMUM);
        stream.seek(SeekFrom::Start(position + sizes::SEGMENT_HEADER + header_size))?;
        let metadata = read_block(&mut *stream, metadata_size as i64, "subblock metadata")
            .map_err(|e| corrupt(index, e))?;
        let data = read_block(&mut *stream, data_size, "subblock data")
            .map_err(|e| corrupt(index, e))?;

        debug!("Read subblock {}: {} data bytes, {} metadata bytes", index, data.len(), metadata.len());
        Ok(SubBlock { index, info, data, metadata })
    }

    fn create_single_channel_tile_accessor(&self) -> Box<dyn TileAccessor + '_> {
        Box::new(SingleChannelTileAccessor::new(self))
    }
}

fn corrupt(index: usize, error: CziError) -> CziError {
    match error {
        CziError::InvalidHeader(reason) => CziError::CorruptSubblock { index, reason },
        other => other,
    }
}
