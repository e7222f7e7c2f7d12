//! # Measure Module
//!
//! Turns photographs into pixel sizes and pixel sizes into millimeters.
//!
//! ## How It Works
//! 1. Convert the view to grayscale (0.2989 R + 0.5870 G + 0.1140 B)
//! 2. Segment with a single global threshold (maximum between-class variance)
//! 3. Keep the largest 8-connected foreground region
//! 4. Take its axis-aligned extents as (width, height), smaller first
//! 5. Reject boxes that are implausibly small or large for the frame
//! 6. Map each view's two extents onto the physical axes and scale to mm
//!
//! ## View To Axis Mapping
//! | Views | width_px feeds | height_px feeds |
//! |-------|----------------|-----------------|
//! | front, back | length | height |
//! | left, right | width | height |
//! | top, down | length | width |
//!
//! Every step reports "no result" as a zero-sized [`MeasuredView`]; the
//! aggregation step drops those samples.

mod bbox;
mod contour;
pub mod debug;
mod scale;
mod segmenter;
mod six_view;
mod validator;
mod view;

pub use bbox::BoundingBoxEstimator;
pub use contour::{ContourExtractor, Region};
pub use debug::{DebugArtifacts, DebugStep};
pub use scale::{CameraSetup, ScaleEstimator};
pub use segmenter::{Segmenter, BACKGROUND, FOREGROUND};
pub use six_view::SixViewEstimator;
pub use validator::PixelSizeValidator;
pub use view::{to_grayscale, ViewMeasurer};

use serde::{Deserialize, Serialize};

/// Pixel-space size of the object in one view.
///
/// `(0, 0)` means the view produced no reliable measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasuredView {
    /// Shorter extent in pixels
    pub width_px: f64,
    /// Longer extent in pixels
    pub height_px: f64,
}

impl MeasuredView {
    /// The failure sentinel
    pub const NONE: MeasuredView = MeasuredView {
        width_px: 0.0,
        height_px: 0.0,
    };

    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self { width_px, height_px }
    }

    /// True when both extents are positive
    pub fn is_measured(&self) -> bool {
        self.width_px > 0.0 && self.height_px > 0.0
    }

    /// The measurement, or `None` for the failure sentinel
    pub fn as_option(&self) -> Option<(f64, f64)> {
        self.is_measured().then_some((self.width_px, self.height_px))
    }
}

/// Tuning for single-view measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Background is the brighter class (dark walnut on a light sheet)
    pub background_is_bright: bool,
    /// Smallest bounding-box area (px²) accepted as the walnut
    pub min_contour_size: u64,
    /// Lower bound for bbox/image ratios
    pub min_bbox_ratio: f64,
    /// Upper bound for bbox/image ratios
    pub max_bbox_ratio: f64,
    /// Views that must agree before an axis gets a value
    pub min_valid_views: usize,
    /// Write grayscale/mask/contour/bbox images next to each view
    pub save_intermediate: bool,
}

impl MeasureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_is_bright(mut self, bright: bool) -> Self {
        self.background_is_bright = bright;
        self
    }

    pub fn min_contour_size(mut self, size: u64) -> Self {
        self.min_contour_size = size;
        self
    }

    pub fn bbox_ratio(mut self, min: f64, max: f64) -> Self {
        self.min_bbox_ratio = min;
        self.max_bbox_ratio = max;
        self
    }

    pub fn min_valid_views(mut self, views: usize) -> Self {
        self.min_valid_views = views;
        self
    }

    pub fn save_intermediate(mut self, save: bool) -> Self {
        self.save_intermediate = save;
        self
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            background_is_bright: true,
            min_contour_size: 100,
            min_bbox_ratio: PixelSizeValidator::DEFAULT_MIN_RATIO,
            max_bbox_ratio: PixelSizeValidator::DEFAULT_MAX_RATIO,
            min_valid_views: 2,
            save_intermediate: false,
        }
    }
}
