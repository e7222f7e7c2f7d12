//! # Similarity Module
//!
//! Scores how alike two walnuts are.
//!
//! ## Scorers
//! | Scorer | Input | Output |
//! |--------|-------|--------|
//! | [`BasicSimilarityScorer`] | two [`DimensionValue`]s | axis differences + score |
//! | [`AdvancedSimilarityScorer`] | per-side embeddings | six side scores + score |
//! | [`combine_final`] | optional basic + optional advanced | final score |
//!
//! All scores live in [0, 1] where 1 means indistinguishable.
//!
//! [`DimensionValue`]: crate::core::dimension::DimensionValue

mod advanced;
mod basic;

pub use advanced::{
    cosine_similarity, uniform_side_weights, AdvancedSimilarity, AdvancedSimilarityScorer,
    CosineRemap, SideWeights,
};
pub use basic::{BasicSimilarity, BasicSimilarityScorer, BasicWeights};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Allowed drift when checking that a weight group sums to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Blend between basic and advanced similarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalWeights {
    pub basic_weight: f64,
    pub advanced_weight: f64,
}

impl FinalWeights {
    pub fn new(basic_weight: f64, advanced_weight: f64) -> Self {
        Self {
            basic_weight,
            advanced_weight,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("basic_weight", self.basic_weight),
            ("advanced_weight", self.advanced_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightOutOfRange { field, value });
            }
        }

        let sum = self.basic_weight + self.advanced_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { group: "Final", sum });
        }
        Ok(())
    }
}

impl Default for FinalWeights {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

/// Blend whichever similarities are present.
///
/// With both present the weighted sum is clamped to [0, 1]; a single score
/// passes through unchanged; with neither the result is 0.0.
pub fn combine_final(basic: Option<f64>, advanced: Option<f64>, weights: FinalWeights) -> f64 {
    match (basic, advanced) {
        (Some(basic), Some(advanced)) => {
            (weights.basic_weight * basic + weights.advanced_weight * advanced).clamp(0.0, 1.0)
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => 0.0,
    }
}
