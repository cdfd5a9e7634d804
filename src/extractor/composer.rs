//! Tile composition
//!
//! Obtains one composite bitmap for a resolved rectangle from the source's
//! single-channel tile accessor. Tiling, overlap handling and background
//! fill are the accessor's business.

use log::info;

use crate::czi::bitmap::BitmapData;
use crate::czi::errors::{CziError, CziResult};
use crate::czi::source::ImageSource;
use crate::czi::types::{DimCoordinate, Dimension, IntRect};

/// Channel every composite is taken from
pub const COMPOSITE_CHANNEL: i32 = 0;

/// Plane coordinate used for composites: channel 0, nothing else constrained
pub fn composite_plane() -> DimCoordinate {
    DimCoordinate::from_pairs(&[(Dimension::C, COMPOSITE_CHANNEL)])
}

/// Compose the pixels of `rect` into a single bitmap
///
/// Rectangles with non-positive width or height are rejected before the
/// source is asked for anything. Errors from the accessor are passed
/// through unchanged.
pub fn compose_region(source: &dyn ImageSource, rect: IntRect) -> CziResult<Box<dyn BitmapData>> {
    if !rect.is_valid() {
        return Err(CziError::DegenerateRegion(rect));
    }

    info!("Requesting composite of {} on channel {}", rect, COMPOSITE_CHANNEL);
    let accessor = source.create_single_channel_tile_accessor();
    accessor.get(rect, &composite_plane(), None)
}
