//! I/O utilities for file handling
//!
//! Stream abstractions the container reader is written against.

pub mod seekable;
