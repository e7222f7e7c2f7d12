//! All-pairs comparison over a validated set of objects.

use super::record::ComparisonRecord;
use crate::core::config::AlgorithmConfig;
use crate::core::object::MeasurableObject;
use crate::core::similarity::{combine_final, AdvancedSimilarityScorer, BasicSimilarityScorer};
use crate::error::ComparisonError;
use crate::events::{null_sender, CompareEvent, CompareProgress, Event, EventSender};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// A pair whose record failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairError {
    pub object_a_id: String,
    pub object_b_id: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: ComparisonError,
}

fn serialize_error<S: serde::Serializer>(error: &ComparisonError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Records in pair order plus any rejected pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub records: Vec<ComparisonRecord>,
    pub errors: Vec<PairError>,
}

impl BatchResult {
    /// Records sorted by descending final similarity
    pub fn ranked(&self) -> Vec<&ComparisonRecord> {
        let mut ranked: Vec<&ComparisonRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.final_similarity().total_cmp(&a.final_similarity()));
        ranked
    }
}

/// Two or more measured objects and the settings to compare them with
#[derive(Debug, Clone)]
pub struct ComparisonBatch {
    objects: Vec<MeasurableObject>,
    config: AlgorithmConfig,
    basic: BasicSimilarityScorer,
    advanced: AdvancedSimilarityScorer,
}

impl ComparisonBatch {
    /// Validate the inputs.
    ///
    /// Every object must have dimensions; embeddings are optional.
    pub fn new(objects: Vec<MeasurableObject>, config: AlgorithmConfig) -> Result<Self, ComparisonError> {
        if objects.len() < 2 {
            return Err(ComparisonError::TooFewObjects {
                count: objects.len(),
            });
        }
        if let Some(object) = objects.iter().find(|o| o.dimensions().is_none()) {
            return Err(ComparisonError::MissingDimensions {
                id: object.id().to_string(),
            });
        }
        config.validate()?;

        let basic = BasicSimilarityScorer::new(config.basic.weights);
        let advanced = AdvancedSimilarityScorer::new(
            config.advanced.side_weights.clone(),
            config.advanced.cosine_remap,
        );

        Ok(Self {
            objects,
            config,
            basic,
            advanced,
        })
    }

    /// Index pairs `(i, j)` with `i < j`, row by row
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let n = self.objects.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect()
    }

    pub fn compare_all(&self) -> BatchResult {
        self.compare_all_with_events(&null_sender())
    }

    /// Score every pair in parallel; output keeps pair order
    pub fn compare_all_with_events(&self, events: &EventSender) -> BatchResult {
        let pairs = self.pairs();
        let total = pairs.len();
        events.send(Event::Compare(CompareEvent::Started { total_pairs: total }));
        info!(pairs = total, mode = %self.config.comparison_mode, "comparing objects");

        let completed = AtomicUsize::new(0);
        let outcomes: Vec<Result<ComparisonRecord, PairError>> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let (a, b) = (&self.objects[i], &self.objects[j]);
                let outcome = self.compare_pair(a, b).map_err(|error| PairError {
                    object_a_id: a.id().to_string(),
                    object_b_id: b.id().to_string(),
                    error,
                });

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Compare(CompareEvent::Progress(CompareProgress {
                    completed: done,
                    total,
                })));
                outcome
            })
            .collect();

        let mut result = BatchResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(record) => result.records.push(record),
                Err(error) => result.errors.push(error),
            }
        }

        events.send(Event::Compare(CompareEvent::Completed {
            total_records: result.records.len(),
            rejected: result.errors.len(),
        }));
        result
    }

    /// Score one ordered pair
    pub fn compare_pair(
        &self,
        a: &MeasurableObject,
        b: &MeasurableObject,
    ) -> Result<ComparisonRecord, ComparisonError> {
        let missing = |o: &MeasurableObject| ComparisonError::MissingDimensions {
            id: o.id().to_string(),
        };
        let dims_a = a.dimensions().ok_or_else(|| missing(a))?;
        let dims_b = b.dimensions().ok_or_else(|| missing(b))?;

        let mode = self.config.comparison_mode;
        let basic = self.basic.score(&dims_a, &dims_b);
        let basic_score = mode.uses_basic().then_some(basic.score);

        let skip_advanced = basic_score
            .map(|score| score < self.config.basic.skip_advanced_threshold)
            .unwrap_or(false);
        let advanced = (mode.uses_advanced() && !skip_advanced)
            .then(|| self.advanced.score(&a.embeddings(), &b.embeddings()));

        let final_score = combine_final(
            basic_score,
            advanced.as_ref().map(|adv| adv.score),
            self.config.final_weights,
        );

        let mut builder = ComparisonRecord::builder(a.id(), b.id())
            .differences(basic.width_diff_mm, basic.height_diff_mm, basic.length_diff_mm)
            .final_similarity(final_score)
            .basic_weights(self.config.basic.weights);
        if let Some(score) = basic_score {
            builder = builder.basic_similarity(score);
        }
        if let Some(advanced) = &advanced {
            builder = builder.advanced_similarity(&advanced.side_scores, advanced.score);
        }

        debug!(
            a = a.id(),
            b = b.id(),
            basic = ?basic_score,
            advanced = ?advanced.as_ref().map(|adv| adv.score),
            final_score,
            "compared pair"
        );
        builder.build()
    }
}
