//! Region extraction from CZI containers
//!
//! This module resolves regions, composes them through the source's tile
//! accessor, copies bitmaps into dense arrays and writes those arrays out.
//! It also builds the structure report for a container.

mod region;
mod pixel_codec;
mod composer;
mod enumerator;
mod scene_extractor;
mod array_output;
mod report;
#[cfg(test)]
mod tests;

// Public exports
pub use region::{resolve_region, RegionSelector, SceneBounds};
pub use pixel_codec::{copy_bitmap_to_buffer, ElementType, PixelArray, PixelData};
pub use composer::{compose_region, composite_plane, COMPOSITE_CHANNEL};
pub use enumerator::{count_subblocks, enumerate_all, enumerate_all_with_progress, SubblockCollection};
pub use array_output::{save_array, save_coordinates, write_npy, ArrayFormat};
pub use report::container_report;

// Per-call pipeline used by the API and the commands
pub use scene_extractor::SceneExtractor;
