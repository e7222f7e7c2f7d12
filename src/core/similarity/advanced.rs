//! Embedding-based similarity.
//!
//! Each side is compared on its own: the two objects' embeddings for that
//! side are scored by cosine similarity, remapped to [0, 1], then the six
//! side scores are combined with per-side weights.

use crate::core::side::{Side, SideMap};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Per-side weights for the advanced score
pub type SideWeights = SideMap<f64>;

/// Equal weight on every side
pub fn uniform_side_weights() -> SideWeights {
    SideMap::uniform(1.0 / 6.0)
}

/// How a raw cosine in [-1, 1] becomes a score in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CosineRemap {
    /// `(cos + 1) / 2`
    #[default]
    Linear,
    /// Map `[min_expected, max_expected]` onto [0, 1], clip, raise to `power`.
    ///
    /// Spreads out scores for embeddings that rarely leave a narrow band.
    Discriminative {
        power: f64,
        min_expected: f64,
        max_expected: f64,
    },
}

impl CosineRemap {
    /// Discriminative remap with the usual band for CNN embeddings
    pub fn discriminative() -> Self {
        CosineRemap::Discriminative {
            power: 2.0,
            min_expected: 0.3,
            max_expected: 0.9,
        }
    }

    pub fn apply(&self, cosine: f64) -> f64 {
        match *self {
            CosineRemap::Linear => ((cosine + 1.0) / 2.0).clamp(0.0, 1.0),
            CosineRemap::Discriminative {
                power,
                min_expected,
                max_expected,
            } => {
                let normalized = (cosine - min_expected) / (max_expected - min_expected);
                normalized.clamp(0.0, 1.0).powf(power)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let CosineRemap::Discriminative {
            power,
            min_expected,
            max_expected,
        } = *self
        {
            if !(power > 0.0) {
                return Err(ConfigError::CosineRemap(format!(
                    "power must be positive, got {}",
                    power
                )));
            }
            if !(min_expected < max_expected) {
                return Err(ConfigError::CosineRemap(format!(
                    "min_expected {} must be below max_expected {}",
                    min_expected, max_expected
                )));
            }
        }
        Ok(())
    }
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns `None` when either is empty or the lengths differ, and `Some(0.0)`
/// when either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Outcome of an embedding comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSimilarity {
    pub side_scores: SideMap<f64>,
    pub score: f64,
}

/// Scores two walnuts by the similarity of their per-side embeddings
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedSimilarityScorer {
    weights: SideWeights,
    remap: CosineRemap,
}

impl AdvancedSimilarityScorer {
    pub fn new(weights: SideWeights, remap: CosineRemap) -> Self {
        Self { weights, remap }
    }

    /// Score for one side.
    ///
    /// Absent, empty or mismatched embeddings score 0.0. A zero-norm vector
    /// has cosine 0 and is remapped like any other cosine.
    pub fn side_score(&self, a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
        let (Some(a), Some(b)) = (a, b) else {
            return 0.0;
        };
        cosine_similarity(a, b).map_or(0.0, |cosine| self.remap.apply(cosine))
    }

    pub fn score(&self, a: &SideMap<Option<&[f32]>>, b: &SideMap<Option<&[f32]>>) -> AdvancedSimilarity {
        let side_scores = SideMap::from_fn(|side: Side| self.side_score(a[side], b[side]));
        let weighted: f64 = side_scores
            .iter()
            .map(|(side, score)| self.weights[side] * score)
            .sum();

        AdvancedSimilarity {
            side_scores,
            score: weighted.clamp(0.0, 1.0),
        }
    }
}

impl Default for AdvancedSimilarityScorer {
    fn default() -> Self {
        Self::new(uniform_side_weights(), CosineRemap::Linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_remap_spans_unit_interval() {
        let remap = CosineRemap::Linear;
        let identical = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        let orthogonal = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();

        assert!((remap.apply(identical) - 1.0).abs() < 1e-9);
        assert!((remap.apply(orthogonal) - 0.5).abs() < 1e-9);
        assert!(remap.apply(opposite).abs() < 1e-9);
    }

    #[test]
    fn mismatched_or_empty_vectors_have_no_cosine() {
        assert_eq!(cosine_similarity(&[], &[]), None);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), Some(0.0));
    }

    #[test]
    fn discriminative_remap_clips_and_sharpens() {
        let remap = CosineRemap::discriminative();
        assert_eq!(remap.apply(0.2), 0.0);
        assert_eq!(remap.apply(0.95), 1.0);
        // (0.6 - 0.3) / 0.6 = 0.5, squared
        assert!((remap.apply(0.6) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn discriminative_remap_validates_band() {
        let bad = CosineRemap::Discriminative {
            power: 2.0,
            min_expected: 0.9,
            max_expected: 0.3,
        };
        assert!(matches!(bad.validate(), Err(ConfigError::CosineRemap(_))));
        assert!(CosineRemap::discriminative().validate().is_ok());
    }

    #[test]
    fn missing_sides_score_zero() {
        let scorer = AdvancedSimilarityScorer::default();
        let v: &[f32] = &[1.0, 0.5];
        let empty: &[f32] = &[];
        let short: &[f32] = &[1.0];

        assert_eq!(scorer.side_score(None, Some(v)), 0.0);
        assert_eq!(scorer.side_score(Some(v), None), 0.0);
        assert_eq!(scorer.side_score(Some(empty), Some(empty)), 0.0);
        assert_eq!(scorer.side_score(Some(short), Some(v)), 0.0);
        assert!((scorer.side_score(Some(v), Some(v)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_norm_embedding_scores_as_orthogonal() {
        let scorer = AdvancedSimilarityScorer::default();
        let zero: &[f32] = &[0.0, 0.0, 0.0];
        let v: &[f32] = &[1.0, 2.0, 3.0];

        assert!((scorer.side_score(Some(zero), Some(v)) - 0.5).abs() < 1e-9);
        assert!((scorer.side_score(Some(zero), Some(zero)) - 0.5).abs() < 1e-9);

        let discriminative = AdvancedSimilarityScorer::new(uniform_side_weights(), CosineRemap::discriminative());
        assert_eq!(discriminative.side_score(Some(zero), Some(v)), 0.0);
    }

    #[test]
    fn identical_embeddings_score_one() {
        let v = vec![0.2f32, 0.4, 0.1];
        let a = SideMap::uniform(Some(v.as_slice()));
        let result = AdvancedSimilarityScorer::default().score(&a, &a);

        assert!((result.score - 1.0).abs() < 1e-9);
        assert!(result.side_scores.iter().all(|(_, s)| (*s - 1.0).abs() < 1e-9));
    }

    #[test]
    fn side_weights_shape_the_final_score() {
        let v = [1.0f32, 0.0];
        let w = [0.0f32, 1.0];
        let a = SideMap::uniform(Some(&v[..]));
        let mut b = SideMap::uniform(Some(&v[..]));
        b.top = Some(&w[..]);

        let mut weights = SideMap::uniform(0.0);
        weights.top = 1.0;
        let result = AdvancedSimilarityScorer::new(weights, CosineRemap::Linear).score(&a, &b);

        assert!((result.score - 0.5).abs() < 1e-9);
        assert!((result.side_scores.front - 1.0).abs() < 1e-9);
    }

    #[test]
    fn remap_serializes_with_kind_tag() {
        let json = serde_json::to_string(&CosineRemap::Linear).unwrap();
        assert_eq!(json, r#"{"kind":"linear"}"#);

        let parsed: CosineRemap = serde_json::from_str(
            r#"{"kind":"discriminative","power":3.0,"min_expected":0.2,"max_expected":0.8}"#,
        )
        .unwrap();
        assert!(matches!(parsed, CosineRemap::Discriminative { power, .. } if power == 3.0));
    }
}
