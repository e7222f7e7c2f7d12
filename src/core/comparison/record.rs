//! Immutable, validated result of comparing two walnuts.

use crate::core::side::{Side, SideMap};
use crate::core::similarity::{BasicWeights, WEIGHT_SUM_TOLERANCE};
use crate::error::ComparisonError;
use serde::{Deserialize, Serialize};

/// One scored pair.
///
/// Only obtainable through [`ComparisonRecord::builder`] or deserialization,
/// both of which validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct ComparisonRecord {
    object_a_id: String,
    object_b_id: String,
    width_diff_mm: f64,
    height_diff_mm: f64,
    length_diff_mm: f64,
    basic_similarity: Option<f64>,
    side_similarities: SideMap<Option<f64>>,
    advanced_similarity: Option<f64>,
    final_similarity: f64,
    basic_weights: BasicWeights,
}

/// Unvalidated mirror of [`ComparisonRecord`]
#[derive(Debug, Clone, Deserialize)]
struct RecordFields {
    object_a_id: String,
    object_b_id: String,
    width_diff_mm: f64,
    height_diff_mm: f64,
    length_diff_mm: f64,
    basic_similarity: Option<f64>,
    side_similarities: SideMap<Option<f64>>,
    advanced_similarity: Option<f64>,
    final_similarity: f64,
    basic_weights: BasicWeights,
}

impl TryFrom<RecordFields> for ComparisonRecord {
    type Error = ComparisonError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        if fields.object_a_id.trim().is_empty() || fields.object_b_id.trim().is_empty() {
            return Err(ComparisonError::EmptyIdentifier);
        }
        if fields.object_a_id == fields.object_b_id {
            return Err(ComparisonError::SelfComparison {
                id: fields.object_a_id,
            });
        }

        for (field, value) in [
            ("width_diff_mm", fields.width_diff_mm),
            ("height_diff_mm", fields.height_diff_mm),
            ("length_diff_mm", fields.length_diff_mm),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ComparisonError::InvalidDifference { field, value });
            }
        }

        check_score("basic_similarity", fields.basic_similarity)?;
        for (side, score) in fields.side_similarities.iter() {
            check_score(side_field(side), *score)?;
        }
        check_score("advanced_similarity", fields.advanced_similarity)?;

        if fields.basic_similarity.is_none() && fields.advanced_similarity.is_none() {
            return Err(ComparisonError::NoSimilarity);
        }
        check_score("final_similarity", Some(fields.final_similarity))?;

        for (field, value) in fields.basic_weights.fields() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ComparisonError::WeightOutOfRange { field, value });
            }
        }
        let sum = fields.basic_weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ComparisonError::WeightSum { sum });
        }

        Ok(Self {
            object_a_id: fields.object_a_id,
            object_b_id: fields.object_b_id,
            width_diff_mm: fields.width_diff_mm,
            height_diff_mm: fields.height_diff_mm,
            length_diff_mm: fields.length_diff_mm,
            basic_similarity: fields.basic_similarity,
            side_similarities: fields.side_similarities,
            advanced_similarity: fields.advanced_similarity,
            final_similarity: fields.final_similarity,
            basic_weights: fields.basic_weights,
        })
    }
}

fn check_score(field: &'static str, score: Option<f64>) -> Result<(), ComparisonError> {
    match score {
        Some(value) if !(0.0..=1.0).contains(&value) => {
            Err(ComparisonError::ScoreOutOfRange { field, value })
        }
        _ => Ok(()),
    }
}

fn side_field(side: Side) -> &'static str {
    match side {
        Side::Front => "front_similarity",
        Side::Back => "back_similarity",
        Side::Left => "left_similarity",
        Side::Right => "right_similarity",
        Side::Top => "top_similarity",
        Side::Down => "down_similarity",
    }
}

impl ComparisonRecord {
    /// Start a record for the ordered pair `(a, b)`
    pub fn builder(object_a_id: impl Into<String>, object_b_id: impl Into<String>) -> ComparisonRecordBuilder {
        ComparisonRecordBuilder {
            fields: RecordFields {
                object_a_id: object_a_id.into(),
                object_b_id: object_b_id.into(),
                width_diff_mm: 0.0,
                height_diff_mm: 0.0,
                length_diff_mm: 0.0,
                basic_similarity: None,
                side_similarities: SideMap::default(),
                advanced_similarity: None,
                final_similarity: 0.0,
                basic_weights: BasicWeights::default(),
            },
        }
    }

    pub fn object_a_id(&self) -> &str {
        &self.object_a_id
    }

    pub fn object_b_id(&self) -> &str {
        &self.object_b_id
    }

    pub fn width_diff_mm(&self) -> f64 {
        self.width_diff_mm
    }

    pub fn height_diff_mm(&self) -> f64 {
        self.height_diff_mm
    }

    pub fn length_diff_mm(&self) -> f64 {
        self.length_diff_mm
    }

    pub fn basic_similarity(&self) -> Option<f64> {
        self.basic_similarity
    }

    pub fn side_similarities(&self) -> &SideMap<Option<f64>> {
        &self.side_similarities
    }

    pub fn advanced_similarity(&self) -> Option<f64> {
        self.advanced_similarity
    }

    pub fn final_similarity(&self) -> f64 {
        self.final_similarity
    }

    pub fn basic_weights(&self) -> BasicWeights {
        self.basic_weights
    }
}

/// Collects a record's fields; [`build`](Self::build) validates them
#[derive(Debug, Clone)]
pub struct ComparisonRecordBuilder {
    fields: RecordFields,
}

impl ComparisonRecordBuilder {
    /// Absolute per-axis differences in mm
    pub fn differences(mut self, width_mm: f64, height_mm: f64, length_mm: f64) -> Self {
        self.fields.width_diff_mm = width_mm;
        self.fields.height_diff_mm = height_mm;
        self.fields.length_diff_mm = length_mm;
        self
    }

    pub fn basic_similarity(mut self, score: f64) -> Self {
        self.fields.basic_similarity = Some(score);
        self
    }

    pub fn advanced_similarity(mut self, side_scores: &SideMap<f64>, score: f64) -> Self {
        self.fields.side_similarities = SideMap::from_fn(|side| Some(side_scores[side]));
        self.fields.advanced_similarity = Some(score);
        self
    }

    pub fn final_similarity(mut self, score: f64) -> Self {
        self.fields.final_similarity = score;
        self
    }

    pub fn basic_weights(mut self, weights: BasicWeights) -> Self {
        self.fields.basic_weights = weights;
        self
    }

    pub fn build(self) -> Result<ComparisonRecord, ComparisonError> {
        ComparisonRecord::try_from(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ComparisonRecordBuilder {
        ComparisonRecord::builder("W1", "W2")
            .differences(0.5, 1.0, 0.0)
            .basic_similarity(0.9)
            .final_similarity(0.9)
            .basic_weights(BasicWeights::new(0.4, 0.35, 0.25))
    }

    #[test]
    fn valid_record_builds() {
        let record = valid().build().unwrap();
        assert_eq!(record.object_a_id(), "W1");
        assert_eq!(record.basic_similarity(), Some(0.9));
        assert_eq!(record.advanced_similarity(), None);
        assert_eq!(record.side_similarities().front, None);
    }

    #[test]
    fn identifiers_must_differ_and_be_present() {
        let same = ComparisonRecord::builder("W1", "W1")
            .basic_similarity(1.0)
            .final_similarity(1.0)
            .build();
        assert_eq!(same, Err(ComparisonError::SelfComparison { id: "W1".to_string() }));

        let empty = ComparisonRecord::builder("", "W2")
            .basic_similarity(1.0)
            .final_similarity(1.0)
            .build();
        assert_eq!(empty, Err(ComparisonError::EmptyIdentifier));
    }

    #[test]
    fn differences_must_be_finite_and_non_negative() {
        let negative = valid().differences(-1.0, 0.0, 0.0).build();
        assert_eq!(
            negative,
            Err(ComparisonError::InvalidDifference {
                field: "width_diff_mm",
                value: -1.0
            })
        );

        let nan = valid().differences(0.0, 0.0, f64::NAN).build();
        assert!(matches!(
            nan,
            Err(ComparisonError::InvalidDifference { field: "length_diff_mm", .. })
        ));

        let infinite = valid().differences(0.0, f64::INFINITY, 0.0).build();
        assert!(matches!(
            infinite,
            Err(ComparisonError::InvalidDifference { field: "height_diff_mm", .. })
        ));
    }

    #[test]
    fn scores_must_be_in_unit_range() {
        let result = valid().basic_similarity(1.2).build();
        assert_eq!(
            result,
            Err(ComparisonError::ScoreOutOfRange {
                field: "basic_similarity",
                value: 1.2
            })
        );

        let result = valid().final_similarity(f64::NAN).build();
        assert!(matches!(
            result,
            Err(ComparisonError::ScoreOutOfRange { field: "final_similarity", .. })
        ));
    }

    #[test]
    fn side_scores_are_checked() {
        let mut sides = SideMap::uniform(0.5);
        sides.top = -0.1;
        let result = valid().advanced_similarity(&sides, 0.5).build();
        assert!(matches!(
            result,
            Err(ComparisonError::ScoreOutOfRange { field: "top_similarity", .. })
        ));
    }

    #[test]
    fn some_similarity_is_required() {
        let result = ComparisonRecord::builder("W1", "W2").final_similarity(0.0).build();
        assert_eq!(result, Err(ComparisonError::NoSimilarity));
    }

    #[test]
    fn weights_are_not_normalized() {
        let result = valid().basic_weights(BasicWeights::new(0.3, 0.3, 0.3)).build();
        assert!(matches!(result, Err(ComparisonError::WeightSum { .. })));
    }

    #[test]
    fn deserialization_revalidates() {
        let record = valid().build().unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ComparisonRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);

        let tampered = json.replace("\"object_b_id\":\"W2\"", "\"object_b_id\":\"W1\"");
        assert!(serde_json::from_str::<ComparisonRecord>(&tampered).is_err());
    }
}
