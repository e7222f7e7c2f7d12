//! Pinhole-camera scale conversion.

use serde::{Deserialize, Serialize};

/// Camera geometry for one shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSetup {
    /// Lens-to-walnut distance in millimeters
    pub distance_mm: f64,
    /// Focal length expressed in pixels
    pub focal_length_px: f64,
}

impl CameraSetup {
    pub const DEFAULT_DISTANCE_MM: f64 = 300.0;
    pub const DEFAULT_FOCAL_LENGTH_PX: f64 = 1000.0;

    pub fn new(distance_mm: f64, focal_length_px: f64) -> Self {
        Self {
            distance_mm,
            focal_length_px,
        }
    }

    /// Replace non-positive fields with `fallback`'s values
    pub fn or(self, fallback: CameraSetup) -> CameraSetup {
        CameraSetup {
            distance_mm: if self.distance_mm > 0.0 {
                self.distance_mm
            } else {
                fallback.distance_mm
            },
            focal_length_px: if self.focal_length_px > 0.0 {
                self.focal_length_px
            } else {
                fallback.focal_length_px
            },
        }
    }

    pub fn mm_per_pixel(&self) -> f64 {
        ScaleEstimator::mm_per_pixel(self.distance_mm, self.focal_length_px)
    }
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DISTANCE_MM, Self::DEFAULT_FOCAL_LENGTH_PX)
    }
}

pub struct ScaleEstimator;

impl ScaleEstimator {
    /// `distance_mm / focal_length_px`, or 0.0 when either input is not
    /// positive
    pub fn mm_per_pixel(distance_mm: f64, focal_length_px: f64) -> f64 {
        if distance_mm <= 0.0 || focal_length_px <= 0.0 {
            return 0.0;
        }
        distance_mm / focal_length_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_gives_point_three() {
        assert!((CameraSetup::default().mm_per_pixel() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn non_positive_inputs_give_zero() {
        assert_eq!(ScaleEstimator::mm_per_pixel(0.0, 1000.0), 0.0);
        assert_eq!(ScaleEstimator::mm_per_pixel(300.0, -1.0), 0.0);
    }

    #[test]
    fn fallback_only_replaces_missing_fields() {
        let camera = CameraSetup::new(250.0, 0.0).or(CameraSetup::default());
        assert_eq!(camera, CameraSetup::new(250.0, 1000.0));
    }
}
