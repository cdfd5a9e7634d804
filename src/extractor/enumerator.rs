//! Subblock enumeration for bulk export
//!
//! Decodes every stored subblock and pairs it with the origin of its
//! logical rectangle. The first pass counts subblocks so the output
//! vectors are sized once; the second pass decodes in the source's order.
//! The i-th array always belongs to the i-th coordinate pair.

use log::{debug, info};

use crate::czi::errors::CziResult;
use crate::czi::source::ImageSource;
use crate::utils::progress::ProgressTracker;

use super::pixel_codec::{copy_bitmap_to_buffer, PixelArray};

/// Every subblock of a container as arrays plus their origins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubblockCollection {
    /// Decoded subblocks, indexed `[y][x]`
    pub arrays: Vec<PixelArray>,
    /// `(x, y)` origin of each subblock's logical rectangle
    pub coordinates: Vec<[i32; 2]>,
}

impl SubblockCollection {
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Shape of the coordinate table
    pub fn coordinate_shape(&self) -> [usize; 2] {
        [self.coordinates.len(), 2]
    }
}

/// Number of subblocks the source enumerates
pub fn count_subblocks(source: &dyn ImageSource) -> CziResult<usize> {
    let mut count = 0usize;
    source.enumerate_subblocks(&mut |_, _| {
        count += 1;
        true
    })?;
    Ok(count)
}

/// Decode every subblock of the source
///
/// Any failure, including an unsupported pixel type in a single subblock,
/// aborts the whole enumeration.
pub fn enumerate_all(source: &dyn ImageSource) -> CziResult<SubblockCollection> {
    enumerate_all_with_progress(source, None)
}

/// Decode every subblock of the source, ticking `progress` once per subblock
pub fn enumerate_all_with_progress(source: &dyn ImageSource, progress: Option<&ProgressTracker>) -> CziResult<SubblockCollection> {
    let count = count_subblocks(source)?;
    info!("Enumerating {} subblocks", count);

    let mut arrays = Vec::with_capacity(count);
    let mut coordinates = Vec::with_capacity(count);
    let mut failure = None;

    source.enumerate_subblocks(&mut |index, info| {
        let decoded = source.read_subblock(index)
            .and_then(|subblock| subblock.create_bitmap())
            .and_then(|bitmap| copy_bitmap_to_buffer(bitmap.as_ref()));

        match decoded {
            Ok(array) => {
                debug!("Subblock {} at ({}, {}) shape {:?}",
                       index, info.logical_rect.x, info.logical_rect.y, array.shape());
                arrays.push(array);
                coordinates.push([info.logical_rect.x, info.logical_rect.y]);
                if let Some(progress) = progress {
                    progress.increment(1);
                }
                true
            },
            Err(e) => {
                failure = Some(e);
                false
            },
        }
    })?;

    if let Some(e) = failure {
        return Err(e);
    }

    Ok(SubblockCollection { arrays, coordinates })
}
