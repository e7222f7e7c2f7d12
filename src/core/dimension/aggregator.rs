//! Collapses repeated per-axis pixel samples into one millimeter value.
//!
//! Each axis is seen by up to four views. Failed views report zero and are
//! dropped before aggregation; the median of what remains is scaled to mm.

use super::{Axis, AxisDimensions};

/// Pixel samples collected for each physical axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelSamples {
    length: Vec<f64>,
    width: Vec<f64>,
    height: Vec<f64>,
}

impl PixelSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pixel sample for `axis`
    pub fn push(&mut self, axis: Axis, pixels: f64) {
        self.get_mut(axis).push(pixels);
    }

    pub fn get(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Length => &self.length,
            Axis::Width => &self.width,
            Axis::Height => &self.height,
        }
    }

    fn get_mut(&mut self, axis: Axis) -> &mut Vec<f64> {
        match axis {
            Axis::Length => &mut self.length,
            Axis::Width => &mut self.width,
            Axis::Height => &mut self.height,
        }
    }
}

/// Median-based aggregation of per-axis pixel samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionAggregator {
    /// Minimum number of positive samples an axis needs
    min_valid_views: usize,
}

impl DimensionAggregator {
    /// Default number of views that must agree on an axis
    pub const DEFAULT_MIN_VALID_VIEWS: usize = 2;

    pub fn new(min_valid_views: usize) -> Self {
        Self { min_valid_views }
    }

    /// Aggregate all three axes at the given scale
    pub fn aggregate(&self, samples: &PixelSamples, mm_per_px: f64) -> AxisDimensions {
        AxisDimensions::new(
            self.aggregate_axis(samples.get(Axis::Length), mm_per_px),
            self.aggregate_axis(samples.get(Axis::Width), mm_per_px),
            self.aggregate_axis(samples.get(Axis::Height), mm_per_px),
        )
    }

    /// Median of the positive samples times `mm_per_px`, or 0.0 when fewer
    /// than `min_valid_views` samples are positive
    pub fn aggregate_axis(&self, samples: &[f64], mm_per_px: f64) -> f64 {
        let mut valid: Vec<f64> = samples.iter().copied().filter(|v| *v > 0.0).collect();

        if valid.is_empty() || valid.len() < self.min_valid_views {
            return 0.0;
        }

        median(&mut valid) * mm_per_px
    }
}

impl Default for DimensionAggregator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_VALID_VIEWS)
    }
}

/// Median of a non-empty slice; averages the two middle values for even lengths
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
