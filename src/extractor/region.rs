//! Region selection and resolution
//!
//! A region is selected either by scene index or by an explicit pixel
//! box. Scene selections are resolved to the union of the logical
//! rectangles of every subblock in the scene; a negative scene index
//! selects every subblock in the container.

use log::{debug, info};

use crate::czi::errors::{CziError, CziResult};
use crate::czi::source::ImageSource;
use crate::czi::types::{Dimension, IntRect};

/// What region of the container to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSelector {
    /// Bounding box of one scene; any negative index means all scenes
    SceneIndex(i32),
    /// Explicit rectangle, used as given
    ExplicitBox(IntRect),
}

impl RegionSelector {
    /// Build a selector from a list of integers
    ///
    /// One value selects a scene, four values are `x, y, w, h`. Any other
    /// count, or a value outside the `i32` range, is a usage error.
    pub fn from_values(values: &[i64]) -> CziResult<Self> {
        let narrow = |value: i64| {
            i32::try_from(value)
                .map_err(|_| CziError::Usage(format!("region value {} does not fit in 32 bits", value)))
        };

        match values {
            [scene] => Ok(RegionSelector::SceneIndex(narrow(*scene)?)),
            [x, y, w, h] => Ok(RegionSelector::ExplicitBox(
                IntRect::new(narrow(*x)?, narrow(*y)?, narrow(*w)?, narrow(*h)?))),
            _ => Err(CziError::Usage(format!(
                "region must have 1 value (scene) or 4 values (box), got {}", values.len()))),
        }
    }

    /// Parse a comma separated selector such as `"2"` or `"0,0,512,512"`
    pub fn parse(text: &str) -> CziResult<Self> {
        let values = text.split(',')
            .map(|part| part.trim().parse::<i64>()
                .map_err(|_| CziError::Usage(format!("invalid region value '{}'", part.trim()))))
            .collect::<CziResult<Vec<i64>>>()?;
        Self::from_values(&values)
    }

    /// Whether this selector asks for every scene
    pub fn is_all_scenes(&self) -> bool {
        matches!(self, RegionSelector::SceneIndex(scene) if *scene < 0)
    }
}

/// Running union of subblock rectangles
///
/// Starts empty: minimum at `i32::MAX`, maximum at -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneBounds {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
    count: usize,
}

impl Default for SceneBounds {
    fn default() -> Self {
        SceneBounds {
            min_x: i32::MAX as i64,
            min_y: i32::MAX as i64,
            max_x: -1,
            max_y: -1,
            count: 0,
        }
    }
}

impl SceneBounds {
    pub fn new() -> Self {
        SceneBounds::default()
    }

    /// Grow the bounds to include `rect`
    pub fn expand(&mut self, rect: &IntRect) {
        self.min_x = self.min_x.min(rect.x as i64);
        self.min_y = self.min_y.min(rect.y as i64);
        self.max_x = self.max_x.max(rect.end_x());
        self.max_y = self.max_y.max(rect.end_y());
        self.count += 1;
    }

    /// Number of rectangles merged so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Bounding rectangle; non-positive extent when nothing was merged
    pub fn to_rect(&self) -> IntRect {
        IntRect::new(
            saturate(self.min_x),
            saturate(self.min_y),
            saturate(self.max_x - self.min_x),
            saturate(self.max_y - self.min_y),
        )
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Resolve a selector to a rectangle in the container's pixel space
///
/// Explicit boxes are returned unchanged without touching the source. A
/// scene index scans every subblock; subblocks without a scene coordinate
/// only count towards the all-scenes selection. A scene nothing belongs to
/// resolves to a rectangle with non-positive extent rather than an error.
///
/// # Arguments
/// * `source` - Opened image source
/// * `selector` - Scene index or explicit box
///
/// # Returns
/// The resolved rectangle, or an error from the source
pub fn resolve_region(source: &dyn ImageSource, selector: &RegionSelector) -> CziResult<IntRect> {
    let scene = match selector {
        RegionSelector::ExplicitBox(rect) => {
            debug!("Using explicit box {}", rect);
            return Ok(*rect);
        },
        RegionSelector::SceneIndex(scene) => *scene,
    };

    let all_scenes = selector.is_all_scenes();
    let mut bounds = SceneBounds::new();
    source.enumerate_subblocks(&mut |_, info| {
        let matches = all_scenes || info.coordinate.try_get(Dimension::S) == Some(scene);
        if matches {
            bounds.expand(&info.logical_rect);
        }
        true
    })?;

    let rect = bounds.to_rect();
    if all_scenes {
        info!("All scenes span {} over {} subblocks", rect, bounds.count());
    } else {
        info!("Scene {} spans {} over {} subblocks", scene, rect, bounds.count());
    }
    Ok(rect)
}
