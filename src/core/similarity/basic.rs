//! Dimension-based similarity.

use crate::core::dimension::{Axis, DimensionValue};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Relative importance of each axis; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicWeights {
    #[serde(rename = "width_weight")]
    pub width: f64,
    #[serde(rename = "height_weight")]
    pub height: f64,
    #[serde(rename = "length_weight")]
    pub length: f64,
}

impl BasicWeights {
    pub fn new(width: f64, height: f64, length: f64) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    /// Equal weight on every axis
    pub fn equal() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length,
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    pub fn sum(&self) -> f64 {
        self.width + self.height + self.length
    }

    /// Named weights in serialized order, for validation messages
    pub fn fields(&self) -> [(&'static str, f64); 3] {
        [
            ("width_weight", self.width),
            ("height_weight", self.height),
            ("length_weight", self.length),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.fields() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightOutOfRange { field, value });
            }
        }
        if (self.sum() - 1.0).abs() > super::WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                group: "Basic",
                sum: self.sum(),
            });
        }
        Ok(())
    }
}

impl Default for BasicWeights {
    fn default() -> Self {
        Self::new(0.40, 0.35, 0.25)
    }
}

/// Outcome of a dimension comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicSimilarity {
    pub width_diff_mm: f64,
    pub height_diff_mm: f64,
    pub length_diff_mm: f64,
    pub score: f64,
}

/// Scores two walnuts by their relative size differences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicSimilarityScorer {
    weights: BasicWeights,
}

impl BasicSimilarityScorer {
    pub fn new(weights: BasicWeights) -> Self {
        Self { weights }
    }

    /// `1 - Σ weight·|a-b|/mean(a,b)`, clamped to [0, 1]
    pub fn score(&self, a: &DimensionValue, b: &DimensionValue) -> BasicSimilarity {
        let penalty: f64 = Axis::ALL
            .iter()
            .map(|&axis| self.weights.get(axis) * normalized_difference(a.get(axis), b.get(axis)))
            .sum();

        BasicSimilarity {
            width_diff_mm: (a.width_mm() - b.width_mm()).abs(),
            height_diff_mm: (a.height_mm() - b.height_mm()).abs(),
            length_diff_mm: (a.length_mm() - b.length_mm()).abs(),
            score: (1.0 - penalty).clamp(0.0, 1.0),
        }
    }
}

impl Default for BasicSimilarityScorer {
    fn default() -> Self {
        Self::new(BasicWeights::default())
    }
}

fn normalized_difference(a: f64, b: f64) -> f64 {
    let mean = (a + b) / 2.0;
    if mean == 0.0 {
        0.0
    } else {
        (a - b).abs() / mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(length: f64, width: f64, height: f64) -> DimensionValue {
        DimensionValue::new(length, width, height).unwrap()
    }

    #[test]
    fn identical_walnuts_score_one() {
        let a = dims(34.0, 32.0, 30.0);
        let result = BasicSimilarityScorer::new(BasicWeights::equal()).score(&a, &a);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.width_diff_mm, 0.0);
    }

    #[test]
    fn differences_are_absolute() {
        let a = dims(30.0, 28.0, 25.0);
        let b = dims(34.0, 30.0, 26.0);
        let ab = BasicSimilarityScorer::default().score(&a, &b);
        let ba = BasicSimilarityScorer::default().score(&b, &a);

        assert!((ab.length_diff_mm - 4.0).abs() < 1e-9);
        assert!((ab.width_diff_mm - 2.0).abs() < 1e-9);
        assert!((ab.height_diff_mm - 1.0).abs() < 1e-9);
        assert_eq!(ab, ba);
    }

    #[test]
    fn score_uses_weighted_relative_difference() {
        let a = dims(30.0, 30.0, 30.0);
        let b = dims(40.0, 30.0, 30.0);
        // Only length differs: 10 / 35 relative, length weight 0.25
        let expected = 1.0 - 0.25 * (10.0 / 35.0);
        let result = BasicSimilarityScorer::default().score(&a, &b);
        assert!((result.score - expected).abs() < 1e-9);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let a = dims(20.0, 20.0, 20.0);
        let b = dims(50.0, 50.0, 50.0);
        let weights = BasicWeights::new(1.0, 1.0, 1.0);
        assert_eq!(BasicSimilarityScorer::new(weights).score(&a, &b).score, 0.0);
    }

    #[test]
    fn default_weights_validate() {
        assert!(BasicWeights::default().validate().is_ok());
        assert!(BasicWeights::equal().validate().is_ok());
    }

    #[test]
    fn weights_must_sum_to_one() {
        let result = BasicWeights::new(0.3, 0.3, 0.3).validate();
        assert!(matches!(result, Err(ConfigError::WeightSum { group: "Basic", .. })));
    }

    #[test]
    fn weights_must_be_in_unit_range() {
        let result = BasicWeights::new(1.2, -0.1, -0.1).validate();
        assert_eq!(
            result,
            Err(ConfigError::WeightOutOfRange {
                field: "width_weight",
                value: 1.2
            })
        );
    }
}
