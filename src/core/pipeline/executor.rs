//! Pipeline execution implementation.

use crate::core::comparison::{ComparisonBatch, ComparisonRecord};
use crate::core::config::AlgorithmConfig;
use crate::core::embedding::{embed_object, EmbeddingProvider};
use crate::core::measure::SixViewEstimator;
use crate::core::object::MeasurableObject;
use crate::core::scanner::{ObjectScanner, ScanConfig, WalkDirScanner};
use crate::error::WalnutPairError;
use crate::events::{
    null_sender, Event, EventSender, MeasureEvent, MeasureProgress, PipelineEvent, PipelinePhase,
    PipelineSummary,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of pipeline execution
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    /// Identifies this run in logs and exported reports
    pub run_id: Uuid,
    /// Every object that was loaded, measured or not
    pub objects: Vec<MeasurableObject>,
    /// One record per compared pair, in pair order
    pub records: Vec<ComparisonRecord>,
    /// Errors encountered (non-fatal)
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Objects that ended up with validated dimensions
    pub fn measured(&self) -> impl Iterator<Item = &MeasurableObject> {
        self.objects.iter().filter(|o| o.dimensions().is_some())
    }

    /// Records sorted by descending final similarity
    pub fn ranked(&self) -> Vec<&ComparisonRecord> {
        let mut ranked: Vec<&ComparisonRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.final_similarity().total_cmp(&a.final_similarity()));
        ranked
    }

    fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_objects: self.objects.len(),
            measured_objects: self.measured().count(),
            total_records: self.records.len(),
            best_similarity: self.ranked().first().map(|r| r.final_similarity()),
            error_count: self.errors.len(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Root directories holding one folder per object
    pub paths: Vec<PathBuf>,
    /// Measurement and comparison settings
    pub algorithm: AlgorithmConfig,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add root directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    /// Set the algorithm configuration
    pub fn config(mut self, config: AlgorithmConfig) -> Self {
        self.config.algorithm = config;
        self
    }

    /// Write the per-view debug images next to the originals
    pub fn save_intermediate(mut self, save: bool) -> Self {
        self.config.algorithm.measure.save_intermediate = save;
        self
    }

    /// Set the embedding provider used for advanced scoring
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Include hidden folders and files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            embedder: self.embedder,
        }
    }
}

/// Scan, measure and compare a collection of walnuts
pub struct Pipeline {
    config: PipelineConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, WalnutPairError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Only an invalid configuration is fatal. Unreadable folders, failed
    /// embeddings and rejected measurements end up in `errors`.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, WalnutPairError> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let algorithm = &self.config.algorithm;

        if let Err(error) = algorithm.validate() {
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: error.to_string(),
            }));
            return Err(error.into());
        }

        events.send(Event::Pipeline(PipelineEvent::Started));
        info!(%run_id, roots = self.config.paths.len(), "pipeline started");

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&self.config.paths, events);
        let mut errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();

        let loaded: Vec<Result<MeasurableObject, String>> = scan_result
            .objects
            .par_iter()
            .map(|folder| {
                folder
                    .load(algorithm.camera)
                    .map_err(|e| format!("{}: {}", folder.id, e))
            })
            .collect();
        let mut objects = Vec::with_capacity(loaded.len());
        for outcome in loaded {
            match outcome {
                Ok(object) => objects.push(object),
                Err(message) => {
                    warn!("{}", message);
                    errors.push(message);
                }
            }
        }

        // Phase 2: Embedding (optional)
        if let Some(embedder) = &self.embedder {
            if algorithm.comparison_mode.uses_advanced() {
                events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                    phase: PipelinePhase::Embedding,
                }));
                info!(model = embedder.model_name(), objects = objects.len(), "embedding views");

                for object in &mut objects {
                    if let Err(e) = embed_object(embedder.as_ref(), object) {
                        let message = format!("{}: {}", object.id(), e);
                        warn!("{}", message);
                        errors.push(message);
                    }
                }
            }
        }

        // Phase 3: Measuring
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Measuring,
        }));
        errors.extend(self.measure_all(&mut objects, events));

        // Phase 4: Comparing
        let measured: Vec<MeasurableObject> = objects
            .iter()
            .filter(|o| o.dimensions().is_some())
            .cloned()
            .collect();

        let mut records = Vec::new();
        if measured.len() >= 2 {
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Comparing,
            }));

            let batch = ComparisonBatch::new(measured, algorithm.clone())?;
            let batch_result = batch.compare_all_with_events(events);
            errors.extend(batch_result.errors.iter().map(|e| {
                format!("{} vs {}: {}", e.object_a_id, e.object_b_id, e.error)
            }));
            records = batch_result.records;
        } else {
            info!(measured = measured.len(), "fewer than two measured objects, nothing to compare");
        }

        let result = PipelineResult {
            run_id,
            objects,
            records,
            errors,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        let summary = result.summary();
        info!(
            %run_id,
            objects = summary.total_objects,
            measured = summary.measured_objects,
            records = summary.total_records,
            errors = summary.error_count,
            "pipeline finished"
        );
        events.send(Event::Pipeline(PipelineEvent::Completed { summary }));

        Ok(result)
    }

    /// Estimate every object's dimensions in parallel; returns the rejections
    fn measure_all(&self, objects: &mut [MeasurableObject], events: &EventSender) -> Vec<String> {
        let algorithm = &self.config.algorithm;
        let estimator = SixViewEstimator::new(&algorithm.measure, algorithm.camera);
        let total = objects.len();
        events.send(Event::Measure(MeasureEvent::Started {
            total_objects: total,
        }));

        let completed = AtomicUsize::new(0);
        let rejections: Vec<String> = objects
            .par_iter_mut()
            .filter_map(|object| {
                let outcome = object.estimate_dimensions(&estimator);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Measure(MeasureEvent::Progress(MeasureProgress {
                    completed: done,
                    total,
                    current_id: object.id().to_string(),
                })));

                match outcome {
                    Ok(_) => None,
                    Err(e) => {
                        warn!(id = object.id(), error = %e, "measurement rejected");
                        events.send(Event::Measure(MeasureEvent::Rejected {
                            id: object.id().to_string(),
                            message: e.to_string(),
                        }));
                        Some(format!("{}: {}", object.id(), e))
                    }
                }
            })
            .collect();

        events.send(Event::Measure(MeasureEvent::Completed {
            measured: total - rejections.len(),
            rejected: rejections.len(),
        }));
        rejections
    }
}
