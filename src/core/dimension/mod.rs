//! # Dimension Module
//!
//! Physical walnut size in millimeters.
//!
//! Six-view measurement produces raw per-axis values ([`AxisDimensions`]) that
//! may contain zeros for axes without enough evidence. [`DimensionValue`] is
//! the validated form that comparison works with.
//!
//! ## Valid Range
//! | Rule | Constraint |
//! |------|------------|
//! | Positive | every axis > 0 |
//! | Range | every axis within [20, 50] mm |
//! | Shape | height <= length |

mod aggregator;

pub use aggregator::{DimensionAggregator, PixelSamples};

use crate::error::DimensionError;
use serde::{Deserialize, Serialize};

/// Physical axes of a walnut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Length, Axis::Width, Axis::Height];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Length => write!(f, "Length"),
            Axis::Width => write!(f, "Width"),
            Axis::Height => write!(f, "Height"),
        }
    }
}

/// Unvalidated per-axis millimeter values.
///
/// A zero on an axis means the measurement had too little evidence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisDimensions {
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl AxisDimensions {
    /// Result reported when no scale could be derived
    pub const FAILED: AxisDimensions = AxisDimensions {
        length_mm: 0.0,
        width_mm: 0.0,
        height_mm: 0.0,
    };

    pub fn new(length_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            length_mm,
            width_mm,
            height_mm,
        }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length_mm,
            Axis::Width => self.width_mm,
            Axis::Height => self.height_mm,
        }
    }

    /// Validate into a [`DimensionValue`]
    pub fn validate(&self) -> Result<DimensionValue, DimensionError> {
        DimensionValue::new(self.length_mm, self.width_mm, self.height_mm)
    }
}

/// Validated walnut dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisDimensions", into = "AxisDimensions")]
pub struct DimensionValue {
    length_mm: f64,
    width_mm: f64,
    height_mm: f64,
}

impl DimensionValue {
    /// Smallest plausible walnut axis
    pub const MIN_MM: f64 = 20.0;
    /// Largest plausible walnut axis
    pub const MAX_MM: f64 = 50.0;

    /// Validate a candidate triple.
    ///
    /// Rules are checked in order (positive, range, height <= length) and the
    /// first failure is returned. Values are never clamped.
    pub fn new(length_mm: f64, width_mm: f64, height_mm: f64) -> Result<Self, DimensionError> {
        let candidate = AxisDimensions::new(length_mm, width_mm, height_mm);

        for axis in Axis::ALL {
            let value = candidate.get(axis);
            // NaN fails this check as well
            if !(value > 0.0) {
                return Err(DimensionError::NonPositive { axis, value });
            }
        }

        for axis in Axis::ALL {
            let value = candidate.get(axis);
            if !(Self::MIN_MM..=Self::MAX_MM).contains(&value) {
                return Err(DimensionError::OutOfRange {
                    axis,
                    value,
                    min: Self::MIN_MM,
                    max: Self::MAX_MM,
                });
            }
        }

        if height_mm > length_mm {
            return Err(DimensionError::HeightExceedsLength {
                height: height_mm,
                length: length_mm,
            });
        }

        Ok(Self {
            length_mm,
            width_mm,
            height_mm,
        })
    }

    pub fn length_mm(&self) -> f64 {
        self.length_mm
    }

    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length_mm,
            Axis::Width => self.width_mm,
            Axis::Height => self.height_mm,
        }
    }
}

impl TryFrom<AxisDimensions> for DimensionValue {
    type Error = DimensionError;

    fn try_from(raw: AxisDimensions) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

impl From<DimensionValue> for AxisDimensions {
    fn from(value: DimensionValue) -> Self {
        AxisDimensions::new(value.length_mm, value.width_mm, value.height_mm)
    }
}

impl std::fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "L {:.1} x W {:.1} x H {:.1} mm",
            self.length_mm, self.width_mm, self.height_mm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_walnut() {
        let value = DimensionValue::new(30.0, 28.0, 25.0).unwrap();
        assert_eq!(value.length_mm(), 30.0);
        assert_eq!(value.width_mm(), 28.0);
        assert_eq!(value.height_mm(), 25.0);
    }

    #[test]
    fn height_exceeding_length_is_rejected() {
        let result = DimensionValue::new(30.0, 30.0, 35.0);
        assert_eq!(
            result,
            Err(DimensionError::HeightExceedsLength {
                height: 35.0,
                length: 30.0
            })
        );
    }

    #[test]
    fn too_small_axis_is_out_of_range() {
        let result = DimensionValue::new(10.0, 30.0, 25.0);
        assert!(matches!(
            result,
            Err(DimensionError::OutOfRange {
                axis: Axis::Length,
                ..
            })
        ));
    }

    #[test]
    fn height_is_checked_against_length_not_width() {
        // 25/30/28 only validates with 30 on the length axis
        assert!(DimensionValue::new(25.0, 30.0, 28.0).is_err());
        assert!(DimensionValue::new(30.0, 25.0, 28.0).is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(DimensionValue::new(50.0, 20.0, 20.0).is_ok());
        assert!(DimensionValue::new(50.1, 30.0, 30.0).is_err());
    }

    #[test]
    fn zero_and_nan_are_non_positive() {
        assert!(matches!(
            DimensionValue::new(30.0, 0.0, 25.0),
            Err(DimensionError::NonPositive {
                axis: Axis::Width,
                ..
            })
        ));
        assert!(matches!(
            DimensionValue::new(f64::NAN, 30.0, 25.0),
            Err(DimensionError::NonPositive { .. })
        ));
    }

    #[test]
    fn failed_measurement_does_not_validate() {
        assert!(AxisDimensions::FAILED.validate().is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: DimensionValue =
            serde_json::from_str(r#"{"length_mm":34.0,"width_mm":32.0,"height_mm":30.0}"#)
                .unwrap();
        assert_eq!(ok.height_mm(), 30.0);

        let bad = serde_json::from_str::<DimensionValue>(
            r#"{"length_mm":30.0,"width_mm":32.0,"height_mm":34.0}"#,
        );
        assert!(bad.is_err());
    }
}
