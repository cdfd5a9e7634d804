//! Seekable input streams
//!
//! CZI segments are addressed by absolute file offsets, so the reader
//! needs a stream it can both read and reposition. Files and in-memory
//! cursors both qualify.

use std::io::{Read, Seek};

/// A byte stream supporting random access
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
