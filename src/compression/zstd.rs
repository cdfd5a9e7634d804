//! Handlers for ZSTD compressed subblocks
//!
//! CZI knows two zstd flavors. `zstd0` is a bare zstd frame. `zstd1`
//! prefixes the frame with a small header whose first byte is the header
//! size; a 3-byte header carries a chunk that says whether 16-bit data was
//! split into a plane of low bytes followed by a plane of high bytes before
//! compressing.

use log::{debug, warn};

use crate::czi::constants::{compression, zstd1};
use crate::czi::errors::{CziError, CziResult};
use super::handler::CompressionHandler;

/// Default compression level used when writing
const DEFAULT_LEVEL: i32 = 3;

fn decode_frame(data: &[u8]) -> CziResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    match zstd::decode_all(data) {
        Ok(decompressed_data) => {
            debug!("ZSTD decompressed {} bytes to {} bytes", data.len(), decompressed_data.len());
            Ok(decompressed_data)
        },
        Err(e) => {
            warn!("ZSTD decompression error: {}", e);
            Err(CziError::Decompression(format!("ZSTD decompression error: {}", e)))
        }
    }
}

fn encode_frame(data: &[u8], level: i32) -> CziResult<Vec<u8>> {
    zstd::encode_all(data, level)
        .map_err(|e| CziError::Decompression(format!("ZSTD compression error: {}", e)))
}

/// Bare zstd frame handler (compression code 5)
pub struct Zstd0Handler {
    /// Compression level (1-22)
    compression_level: i32,
}

impl Zstd0Handler {
    pub fn new() -> Self {
        Zstd0Handler {
            compression_level: DEFAULT_LEVEL
        }
    }
}

impl Default for Zstd0Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for Zstd0Handler {
    fn decompress(&self, data: &[u8]) -> CziResult<Vec<u8>> {
        decode_frame(data)
    }

    fn compress(&self, data: &[u8]) -> CziResult<Vec<u8>> {
        encode_frame(data, self.compression_level)
    }

    fn name(&self) -> &'static str {
        "Zstd0"
    }

    fn code(&self) -> i32 {
        compression::ZSTD0
    }
}

/// zstd frame with header handler (compression code 6)
pub struct Zstd1Handler {
    /// Compression level (1-22)
    compression_level: i32,
    /// Split 16-bit values into low and high byte planes when compressing
    hilo_packing: bool,
}

impl Zstd1Handler {
    pub fn new() -> Self {
        Zstd1Handler {
            compression_level: DEFAULT_LEVEL,
            hilo_packing: false,
        }
    }

    /// Create a handler that writes hi/lo packed payloads
    pub fn with_hilo_packing(hilo_packing: bool) -> Self {
        Zstd1Handler {
            compression_level: DEFAULT_LEVEL,
            hilo_packing,
        }
    }
}

impl Default for Zstd1Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for Zstd1Handler {
    fn decompress(&self, data: &[u8]) -> CziResult<Vec<u8>> {
        let Some(&header_size) = data.first() else {
            return Err(CziError::Decompression("empty zstd1 payload".to_string()));
        };

        let hilo = match header_size {
            zstd1::HEADER_MINIMAL => false,
            zstd1::HEADER_WITH_HILO => {
                if data.len() < 3 {
                    return Err(CziError::Decompression("truncated zstd1 header".to_string()));
                }
                if data[1] != zstd1::CHUNK_HILO_PACKING {
                    return Err(CziError::Decompression(format!(
                        "unknown zstd1 header chunk type {}", data[1])));
                }
                data[2] & 1 == 1
            },
            other => {
                return Err(CziError::Decompression(format!(
                    "unsupported zstd1 header size {}", other)));
            }
        };

        let decoded = decode_frame(&data[header_size as usize..])?;
        if hilo {
            unpack_hilo(&decoded)
        } else {
            Ok(decoded)
        }
    }

    fn compress(&self, data: &[u8]) -> CziResult<Vec<u8>> {
        let mut out = if self.hilo_packing {
            vec![zstd1::HEADER_WITH_HILO, zstd1::CHUNK_HILO_PACKING, 1]
        } else {
            vec![zstd1::HEADER_MINIMAL]
        };

        let payload = if self.hilo_packing {
            pack_hilo(data)?
        } else {
            data.to_vec()
        };
        out.extend_from_slice(&encode_frame(&payload, self.compression_level)?);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "Zstd1"
    }

    fn code(&self) -> i32 {
        compression::ZSTD1
    }
}

/// Interleave a low byte plane and a high byte plane back into 16-bit values
fn unpack_hilo(packed: &[u8]) -> CziResult<Vec<u8>> {
    if packed.len() % 2 != 0 {
        return Err(CziError::Decompression(format!(
            "hi/lo packed payload has odd length {}", packed.len())));
    }

    let half = packed.len() / 2;
    let (low, high) = packed.split_at(half);
    let mut out = Vec::with_capacity(packed.len());
    for (lo, hi) in low.iter().zip(high) {
        out.push(*lo);
        out.push(*hi);
    }
    Ok(out)
}

/// Split little-endian 16-bit values into a low byte plane and a high byte plane
fn pack_hilo(data: &[u8]) -> CziResult<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(CziError::Decompression(format!(
            "cannot hi/lo pack odd length {}", data.len())));
    }

    let mut out = Vec::with_capacity(data.len());
    out.extend(data.iter().step_by(2));
    out.extend(data.iter().skip(1).step_by(2));
    Ok(out)
}
