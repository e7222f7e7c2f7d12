//! Six-view dimension estimation.

use super::scale::{CameraSetup, ScaleEstimator};
use super::view::ViewMeasurer;
use super::{MeasureConfig, MeasuredView};
use crate::core::dimension::{Axis, AxisDimensions, DimensionAggregator, PixelSamples};
use crate::core::object::SourceImage;
use crate::core::side::{Side, SideMap};
use crate::error::MeasureError;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Combines six per-view measurements into one set of axis dimensions
#[derive(Debug, Clone)]
pub struct SixViewEstimator {
    measurer: ViewMeasurer,
    aggregator: DimensionAggregator,
    camera: CameraSetup,
}

impl SixViewEstimator {
    pub fn new(config: &MeasureConfig, camera: CameraSetup) -> Self {
        Self {
            measurer: ViewMeasurer::new(config),
            aggregator: DimensionAggregator::new(config.min_valid_views),
            camera,
        }
    }

    /// Physical axes fed by a view's `(width_px, height_px)`
    pub fn view_axes(side: Side) -> (Axis, Axis) {
        match side {
            Side::Front | Side::Back => (Axis::Length, Axis::Height),
            Side::Left | Side::Right => (Axis::Width, Axis::Height),
            Side::Top | Side::Down => (Axis::Length, Axis::Width),
        }
    }

    /// Decode and measure all six views, then aggregate.
    ///
    /// Any view that cannot be decoded fails the whole estimate.
    pub fn estimate(&self, images: &SideMap<SourceImage>) -> Result<AxisDimensions, MeasureError> {
        let measured: Vec<(Side, MeasuredView)> = Side::ALL
            .par_iter()
            .map(|&side| {
                self.measurer
                    .measure(&images[side])
                    .map(|view| (side, view))
                    .map_err(|source| MeasureError::View { side, source })
            })
            .collect::<Result<_, _>>()?;

        let mut views = SideMap::<MeasuredView>::default();
        for (side, view) in measured {
            views[side] = view;
        }
        let cameras = SideMap::from_fn(|side| images[side].camera());

        Ok(self.combine(&views, &cameras))
    }

    /// Aggregate already measured views.
    ///
    /// Per-view camera fields that are not positive fall back to the
    /// configured defaults; the averaged distance and focal length give one
    /// shared scale.
    pub fn combine(&self, views: &SideMap<MeasuredView>, cameras: &SideMap<CameraSetup>) -> AxisDimensions {
        let mut samples = PixelSamples::new();
        for (side, view) in views.iter() {
            match view.as_option() {
                Some((width_px, height_px)) => {
                    let (width_axis, height_axis) = Self::view_axes(side);
                    samples.push(width_axis, width_px);
                    samples.push(height_axis, height_px);
                }
                None => warn!(%side, "view produced no measurement"),
            }
        }

        let resolved: Vec<CameraSetup> = cameras.iter().map(|(_, c)| c.or(self.camera)).collect();
        let count = resolved.len() as f64;
        let distance = resolved.iter().map(|c| c.distance_mm).sum::<f64>() / count;
        let focal = resolved.iter().map(|c| c.focal_length_px).sum::<f64>() / count;

        let mm_per_px = ScaleEstimator::mm_per_pixel(distance, focal);
        if mm_per_px <= 0.0 {
            warn!(distance, focal, "no usable camera scale");
            return AxisDimensions::FAILED;
        }

        let dimensions = self.aggregator.aggregate(&samples, mm_per_px);
        debug!(
            mm_per_px,
            length_mm = dimensions.length_mm,
            width_mm = dimensions.width_mm,
            height_mm = dimensions.height_mm,
            "aggregated six views"
        );
        dimensions
    }
}

impl Default for SixViewEstimator {
    fn default() -> Self {
        Self::new(&MeasureConfig::default(), CameraSetup::default())
    }
}
