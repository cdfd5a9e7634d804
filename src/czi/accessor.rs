//! Single-channel tile accessor
//!
//! Composes one plane of a region from every pyramid-layer-0 subblock that
//! lies on the requested plane and overlaps the region. Uncovered pixels
//! keep the background value; overlapping subblocks are drawn in ascending
//! M-index order, so the highest index ends up on top.

use log::{debug, info};

use crate::czi::bitmap::{BitmapData, BitmapLockGuard, MemoryBitmap};
use crate::czi::errors::{CziError, CziResult};
use crate::czi::source::{AccessorOptions, ImageSource, TileAccessor};
use crate::czi::types::{DimCoordinate, IntRect, PixelType, SubblockInfo};

/// Tile accessor working on top of any [`ImageSource`]
pub struct SingleChannelTileAccessor<'a, S: ImageSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ImageSource + ?Sized> SingleChannelTileAccessor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        SingleChannelTileAccessor { source }
    }

    /// Layer-0 subblocks on `plane`, plus the pixel type of the first one
    fn collect_candidates(&self, roi: &IntRect, plane: &DimCoordinate) -> CziResult<(Option<PixelType>, Vec<(usize, SubblockInfo)>)> {
        let mut pixel_type = None;
        let mut candidates = Vec::new();

        self.source.enumerate_subblocks(&mut |index, info| {
            if !info.is_layer0() || !is_on_plane(info, plane) {
                return true;
            }
            if pixel_type.is_none() {
                pixel_type = Some(info.pixel_type);
            }
            if info.logical_rect.intersect(roi).is_some() {
                candidates.push((index, info.clone()));
            }
            true
        })?;

        Ok((pixel_type, candidates))
    }

    /// Copy the part of one subblock that overlaps `roi` into the composite
    fn draw_subblock(&self, composite: &mut MemoryBitmap, roi: &IntRect, index: usize, info: &SubblockInfo) -> CziResult<()> {
        let Some(overlap) = info.logical_rect.intersect(roi) else {
            return Ok(());
        };

        let bitmap = self.source.read_subblock(index)?.create_bitmap()?;
        let bytes_per_pixel = info.pixel_type.bytes_per_pixel();
        let row_bytes = overlap.w as usize * bytes_per_pixel;
        let src_x = (overlap.x - info.logical_rect.x) as usize * bytes_per_pixel;
        let dst_x = (overlap.x - roi.x) as usize * bytes_per_pixel;

        let guard = BitmapLockGuard::acquire(bitmap.as_ref());
        for row in 0..overlap.h as usize {
            let src_y = (overlap.y - info.logical_rect.y) as usize + row;
            let dst_y = (overlap.y - roi.y) as usize + row;

            let start = src_y * guard.stride() + src_x;
            let source_row = guard.data().get(start..start + row_bytes).ok_or_else(|| CziError::CorruptSubblock {
                index,
                reason: format!("row {} lies outside the decoded bitmap", src_y),
            })?;
            composite.row_mut(dst_y as u32)[dst_x..dst_x + row_bytes].copy_from_slice(source_row);
        }

        Ok(())
    }
}

impl<S: ImageSource + ?Sized> TileAccessor for SingleChannelTileAccessor<'_, S> {
    fn get(&self, roi: IntRect, plane: &DimCoordinate, options: Option<&AccessorOptions>) -> CziResult<Box<dyn BitmapData>> {
        if !roi.is_valid() {
            return Err(CziError::DegenerateRegion(roi));
        }
        let defaults = AccessorOptions::default();
        let options = options.unwrap_or(&defaults);

        let (pixel_type, mut candidates) = self.collect_candidates(&roi, plane)?;
        let pixel_type = pixel_type.ok_or_else(|| CziError::PixelTypeUndetermined(plane.to_string()))?;
        info!("Composing {} on plane {} from {} subblocks as {}",
              roi, plane, candidates.len(), pixel_type);

        if options.sort_by_m {
            candidates.sort_by_key(|(_, info)| info.m_index);
        }

        let mut composite = MemoryBitmap::new(pixel_type, roi.w as u32, roi.h as u32)?;
        if options.background != 0 {
            for y in 0..roi.h as u32 {
                composite.row_mut(y).fill(options.background);
            }
        }

        for (index, info) in &candidates {
            if info.pixel_type != pixel_type {
                return Err(CziError::PixelTypeMismatch {
                    expected: pixel_type,
                    found: info.pixel_type,
                    index: *index,
                });
            }
            debug!("Drawing subblock {} at {}", index, info.logical_rect);
            self.draw_subblock(&mut composite, &roi, *index, info)?;
        }

        Ok(Box::new(composite))
    }
}

/// A subblock lies on `plane` unless it has a different value for one of its dimensions
fn is_on_plane(info: &SubblockInfo, plane: &DimCoordinate) -> bool {
    plane.iter().all(|(dimension, value)| {
        match info.coordinate.try_get(dimension) {
            Some(own) => own == value,
            None => true,
        }
    })
}
