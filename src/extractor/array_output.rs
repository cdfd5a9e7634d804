//! Writing extracted arrays to disk
//!
//! Pixel arrays can be saved as NumPy `.npy`, CSV, JSON, or as 8/16-bit
//! grayscale PNG and TIFF images. The subblock coordinate table is saved
//! as NumPy, CSV or JSON.

use byteorder::{LittleEndian, WriteBytesExt};
use image::{ImageBuffer, ImageFormat, Luma};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::czi::errors::{CziError, CziResult};

use super::pixel_codec::{PixelArray, PixelData};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFormat {
    Npy,
    Csv,
    Json,
    Png,
    Tiff,
}

impl ArrayFormat {
    /// Look up a format by name or file extension
    pub fn from_name(name: &str) -> CziResult<Self> {
        match name.to_lowercase().as_str() {
            "npy" => Ok(ArrayFormat::Npy),
            "csv" => Ok(ArrayFormat::Csv),
            "json" => Ok(ArrayFormat::Json),
            "png" => Ok(ArrayFormat::Png),
            "tif" | "tiff" => Ok(ArrayFormat::Tiff),
            _ => Err(CziError::Usage(format!("Unsupported array format: {}", name))),
        }
    }

    /// Format implied by the extension of `path`
    pub fn from_path(path: &Path) -> CziResult<Self> {
        let extension = path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| CziError::Usage(format!("Cannot infer format of {}", path.display())))?;
        Self::from_name(extension)
    }

    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ArrayFormat::Npy => "npy",
            ArrayFormat::Csv => "csv",
            ArrayFormat::Json => "json",
            ArrayFormat::Png => "png",
            ArrayFormat::Tiff => "tif",
        }
    }

    /// Whether the format is an image format
    pub fn is_image(&self) -> bool {
        matches!(self, ArrayFormat::Png | ArrayFormat::Tiff)
    }
}

/// Save a pixel array in the given format
///
/// # Arguments
/// * `array` - Array to save, indexed `[row][column]`
/// * `path` - Output file
/// * `format` - Output format
pub fn save_array(array: &PixelArray, path: &Path, format: ArrayFormat) -> CziResult<()> {
    info!("Saving {:?} array of shape {:?} to {}", array.element_type(), array.shape(), path.display());
    match format {
        ArrayFormat::Npy => save_array_npy(array, path),
        ArrayFormat::Csv => save_array_csv(array, path),
        ArrayFormat::Json => save_array_json(array, path),
        ArrayFormat::Png => save_array_image(array, path, ImageFormat::Png),
        ArrayFormat::Tiff => save_array_image(array, path, ImageFormat::Tiff),
    }
}

/// Save the `(N, 2)` subblock coordinate table
pub fn save_coordinates(coordinates: &[[i32; 2]], path: &Path, format: ArrayFormat) -> CziResult<()> {
    info!("Saving {} coordinate pairs to {}", coordinates.len(), path.display());
    match format {
        ArrayFormat::Npy => {
            let mut bytes = Vec::with_capacity(coordinates.len() * 8);
            for [x, y] in coordinates {
                bytes.write_i32::<LittleEndian>(*x)?;
                bytes.write_i32::<LittleEndian>(*y)?;
            }
            let mut writer = BufWriter::new(File::create(path)?);
            write_npy(&mut writer, "<i4", false, &[coordinates.len(), 2], &bytes)?;
            writer.flush()?;
            Ok(())
        },
        ArrayFormat::Csv => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "index,x,y")?;
            for (index, [x, y]) in coordinates.iter().enumerate() {
                writeln!(writer, "{},{},{}", index, x, y)?;
            }
            writer.flush()?;
            Ok(())
        },
        ArrayFormat::Json => {
            let mut writer = BufWriter::new(File::create(path)?);
            let pairs: Vec<String> = coordinates.iter()
                .map(|[x, y]| format!("[{}, {}]", x, y))
                .collect();
            writeln!(writer, "{{")?;
            writeln!(writer, "  \"shape\": [{}, 2],", coordinates.len())?;
            writeln!(writer, "  \"coordinates\": [{}]", pairs.join(", "))?;
            writeln!(writer, "}}")?;
            writer.flush()?;
            Ok(())
        },
        other => Err(CziError::Usage(format!("Coordinates cannot be saved as {:?}", other))),
    }
}

/// Write a NumPy v1.0 `.npy` stream
///
/// The header is padded with spaces so that the data starts on a
/// 64-byte boundary.
pub fn write_npy<W: Write>(writer: &mut W, descr: &str, fortran_order: bool, shape: &[usize], data: &[u8]) -> CziResult<()> {
    let shape_str = match shape {
        [single] => format!("({},)", single),
        dims => format!("({})", dims.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")),
    };
    let header_str = format!(
        "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
        descr, if fortran_order { "True" } else { "False" }, shape_str
    );

    // magic (6) + version (2) + header length (2) + header + newline
    let unpadded = 10 + header_str.len() + 1;
    let padding_len = (64 - unpadded % 64) % 64;
    let padded_header = format!("{}{}\n", header_str, " ".repeat(padding_len));
    let header_len = u16::try_from(padded_header.len())
        .map_err(|_| CziError::Output("npy header too long".to_string()))?;

    writer.write_all(b"\x93NUMPY")?;
    writer.write_all(&[0x01, 0x00])?;
    writer.write_u16::<LittleEndian>(header_len)?;
    writer.write_all(padded_header.as_bytes())?;
    writer.write_all(data)?;
    Ok(())
}

fn save_array_npy(array: &PixelArray, path: &Path) -> CziResult<()> {
    // A transposed view is stored column-major; say so instead of reordering
    let fortran_order = !array.is_c_contiguous();
    let mut writer = BufWriter::new(File::create(path)?);
    write_npy(&mut writer, array.element_type().npy_descr(), fortran_order, &array.shape(), &array.to_le_bytes())?;
    writer.flush()?;
    Ok(())
}

fn save_array_csv(array: &PixelArray, path: &Path) -> CziResult<()> {
    let [rows, cols] = array.shape();
    let mut writer = BufWriter::new(File::create(path)?);

    write!(writer, "row/col")?;
    for col in 0..cols {
        write!(writer, ",{}", col)?;
    }
    writeln!(writer)?;

    for row in 0..rows {
        write!(writer, "{}", row)?;
        for col in 0..cols {
            match array.get(row, col) {
                Some(value) => write!(writer, ",{}", value)?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

fn save_array_json(array: &PixelArray, path: &Path) -> CziResult<()> {
    let [rows, cols] = array.shape();
    let dtype = match array.data() {
        PixelData::U8(_) => "uint8",
        PixelData::U16(_) => "uint16",
    };
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "{{")?;
    writeln!(writer, "  \"shape\": [{}, {}],", rows, cols)?;
    writeln!(writer, "  \"dtype\": \"{}\",", dtype)?;
    writeln!(writer, "  \"data\": [")?;
    for row in 0..rows {
        let values: Vec<String> = (0..cols)
            .map(|col| array.get(row, col).unwrap_or(0).to_string())
            .collect();
        let separator = if row + 1 < rows { "," } else { "" };
        writeln!(writer, "    [{}]{}", values.join(", "), separator)?;
    }
    writeln!(writer, "  ]")?;
    writeln!(writer, "}}")?;

    writer.flush()?;
    Ok(())
}

fn save_array_image(array: &PixelArray, path: &Path, format: ImageFormat) -> CziResult<()> {
    let [rows, cols] = array.shape();
    let (width, height) = (cols as u32, rows as u32);

    match array.data() {
        PixelData::U8(_) => {
            let values: Vec<u8> = row_major_values(array).into_iter().map(|v| v as u8).collect();
            let image = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, values)
                .ok_or_else(|| CziError::Image("pixel count does not match image size".to_string()))?;
            image.save_with_format(path, format)?;
        },
        PixelData::U16(_) => {
            let values = row_major_values(array);
            let image = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, values)
                .ok_or_else(|| CziError::Image("pixel count does not match image size".to_string()))?;
            image.save_with_format(path, format)?;
        },
    }
    Ok(())
}

/// Elements in row-major order of the current axis order
fn row_major_values(array: &PixelArray) -> Vec<u16> {
    let [rows, cols] = array.shape();
    let mut values = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            values.push(array.get(row, col).unwrap_or(0));
        }
    }
    values
}
