//! Core CZI data types
//!
//! Pixel types, plane dimensions, multi-dimensional coordinates and
//! rectangles in the container's global pixel coordinate space.

use std::collections::BTreeMap;
use std::fmt;

use crate::czi::constants::pixel_type as codes;
use crate::czi::errors::{CziError, CziResult};

/// Pixel layout of a subblock or bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    Gray8,
    Gray16,
    Gray32Float,
    Bgr24,
    Bgr48,
    Bgr96Float,
    Bgra32,
    Gray64ComplexFloat,
    Bgr192ComplexFloat,
    Gray32,
    Gray64Float,
}

impl PixelType {
    /// Decode a pixel type from its on-disk code
    pub fn from_code(code: i32) -> CziResult<Self> {
        match code {
            codes::GRAY8 => Ok(PixelType::Gray8),
            codes::GRAY16 => Ok(PixelType::Gray16),
            codes::GRAY32_FLOAT => Ok(PixelType::Gray32Float),
            codes::BGR24 => Ok(PixelType::Bgr24),
            codes::BGR48 => Ok(PixelType::Bgr48),
            codes::BGR96_FLOAT => Ok(PixelType::Bgr96Float),
            codes::BGRA32 => Ok(PixelType::Bgra32),
            codes::GRAY64_COMPLEX_FLOAT => Ok(PixelType::Gray64ComplexFloat),
            codes::BGR192_COMPLEX_FLOAT => Ok(PixelType::Bgr192ComplexFloat),
            codes::GRAY32 => Ok(PixelType::Gray32),
            codes::GRAY64_FLOAT => Ok(PixelType::Gray64Float),
            _ => Err(CziError::UnknownPixelType(code)),
        }
    }

    /// On-disk code of this pixel type
    pub fn code(&self) -> i32 {
        match self {
            PixelType::Gray8 => codes::GRAY8,
            PixelType::Gray16 => codes::GRAY16,
            PixelType::Gray32Float => codes::GRAY32_FLOAT,
            PixelType::Bgr24 => codes::BGR24,
            PixelType::Bgr48 => codes::BGR48,
            PixelType::Bgr96Float => codes::BGR96_FLOAT,
            PixelType::Bgra32 => codes::BGRA32,
            PixelType::Gray64ComplexFloat => codes::GRAY64_COMPLEX_FLOAT,
            PixelType::Bgr192ComplexFloat => codes::BGR192_COMPLEX_FLOAT,
            PixelType::Gray32 => codes::GRAY32,
            PixelType::Gray64Float => codes::GRAY64_FLOAT,
        }
    }

    /// Number of bytes one pixel occupies
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelType::Gray8 => 1,
            PixelType::Gray16 => 2,
            PixelType::Gray32Float | PixelType::Bgra32 | PixelType::Gray32 => 4,
            PixelType::Bgr24 => 3,
            PixelType::Bgr48 => 6,
            PixelType::Gray64ComplexFloat | PixelType::Gray64Float => 8,
            PixelType::Bgr96Float => 12,
            PixelType::Bgr192ComplexFloat => 24,
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Plane dimensions a subblock coordinate can carry
///
/// X, Y and the M-index are not plane dimensions; they are kept on
/// [`SubblockInfo`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Focus plane
    Z,
    /// Channel
    C,
    /// Time point
    T,
    /// Rotation
    R,
    /// Scene
    S,
    /// Illumination
    I,
    /// Phase
    H,
    /// View
    V,
    /// Block
    B,
}

impl Dimension {
    /// Parse a dimension from its on-disk letter
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'Z' => Some(Dimension::Z),
            'C' => Some(Dimension::C),
            'T' => Some(Dimension::T),
            'R' => Some(Dimension::R),
            'S' => Some(Dimension::S),
            'I' => Some(Dimension::I),
            'H' => Some(Dimension::H),
            'V' => Some(Dimension::V),
            'B' => Some(Dimension::B),
            _ => None,
        }
    }

    /// On-disk letter of this dimension
    pub fn letter(&self) -> char {
        match self {
            Dimension::Z => 'Z',
            Dimension::C => 'C',
            Dimension::T => 'T',
            Dimension::R => 'R',
            Dimension::S => 'S',
            Dimension::I => 'I',
            Dimension::H => 'H',
            Dimension::V => 'V',
            Dimension::B => 'B',
        }
    }
}

/// Multi-dimensional plane coordinate
///
/// Each dimension is either present with a value or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimCoordinate {
    values: BTreeMap<Dimension, i32>,
}

impl DimCoordinate {
    /// Create an empty coordinate
    pub fn new() -> Self {
        DimCoordinate::default()
    }

    /// Create a coordinate from (dimension, value) pairs
    pub fn from_pairs(pairs: &[(Dimension, i32)]) -> Self {
        let mut coordinate = DimCoordinate::new();
        for &(dimension, value) in pairs {
            coordinate.set(dimension, value);
        }
        coordinate
    }

    /// Set the value of a dimension
    pub fn set(&mut self, dimension: Dimension, value: i32) {
        self.values.insert(dimension, value);
    }

    /// Value of a dimension, or `None` if the dimension is absent
    pub fn try_get(&self, dimension: Dimension) -> Option<i32> {
        self.values.get(&dimension).copied()
    }

    /// Iterate over the present dimensions in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, i32)> + '_ {
        self.values.iter().map(|(d, v)| (*d, *v))
    }

    /// Whether no dimension is present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for DimCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values.is_empty() {
            return write!(f, "-");
        }
        for (dimension, value) in self.iter() {
            write!(f, "{}{}", dimension.letter(), value)?;
        }
        Ok(())
    }
}

/// Integer rectangle in the container's pixel coordinate space
///
/// Width and height are signed: a rectangle resolved from an empty
/// scene has non-positive extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        IntRect { x, y, w, h }
    }

    /// Whether the rectangle has positive width and height
    pub fn is_valid(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    /// Exclusive right edge, widened to avoid overflow
    pub fn end_x(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge, widened to avoid overflow
    pub fn end_y(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Overlap of two rectangles, `None` if they do not overlap
    pub fn intersect(&self, other: &IntRect) -> Option<IntRect> {
        let x0 = (self.x as i64).max(other.x as i64);
        let y0 = (self.y as i64).max(other.y as i64);
        let x1 = self.end_x().min(other.end_x());
        let y1 = self.end_y().min(other.end_y());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(IntRect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32))
    }
}

impl fmt::Display for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x={}, y={}, w={}, h={})", self.x, self.y, self.w, self.h)
    }
}

/// Directory information about one stored subblock
#[derive(Debug, Clone, PartialEq)]
pub struct SubblockInfo {
    /// Plane coordinate of the subblock
    pub coordinate: DimCoordinate,
    /// Position and size in the global pixel coordinate space
    pub logical_rect: IntRect,
    /// Stored width in pixels
    pub physical_width: u32,
    /// Stored height in pixels
    pub physical_height: u32,
    /// Pixel type of the stored data
    pub pixel_type: PixelType,
    /// Raw compression code
    pub compression: i32,
    /// Mosaic index, if the subblock has one
    pub m_index: Option<i32>,
    /// Pyramid type byte from the directory entry
    pub pyramid_type: u8,
    /// File offset of the subblock segment
    pub file_position: u64,
}

impl SubblockInfo {
    /// Whether the subblock belongs to pyramid layer 0 (stored at full resolution)
    pub fn is_layer0(&self) -> bool {
        self.logical_rect.w == self.physical_width as i32
            && self.logical_rect.h == self.physical_height as i32
    }
}
