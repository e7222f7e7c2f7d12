//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while measuring and comparing walnuts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Object folder discovery
    Scan(ScanEvent),
    /// Six-view dimension estimation
    Measure(MeasureEvent),
    /// Pairwise comparison
    Compare(CompareEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during object discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// A complete object folder was found
    ObjectFound { id: String, path: PathBuf },
    /// A folder was skipped but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_objects: usize },
}

/// Events during dimension estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MeasureEvent {
    /// Measuring has started
    Started { total_objects: usize },
    /// Progress update after each object
    Progress(MeasureProgress),
    /// An object's dimensions failed measurement or validation
    Rejected { id: String, message: String },
    /// Measuring completed
    Completed { measured: usize, rejected: usize },
}

/// Progress information during measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureProgress {
    /// Objects finished so far
    pub completed: usize,
    /// Objects to measure
    pub total: usize,
    /// Object that just finished
    pub current_id: String,
}

/// Events during the comparison phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    /// Comparison has started
    Started { total_pairs: usize },
    /// Progress update during comparison
    Progress(CompareProgress),
    /// Comparison completed
    Completed { total_records: usize, rejected: usize },
}

/// Progress information during comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareProgress {
    /// Pairs scored so far
    pub completed: usize,
    /// Pairs to score
    pub total: usize,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Embedding,
    Measuring,
    Comparing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Complete object folders found
    pub total_objects: usize,
    /// Objects with validated dimensions
    pub measured_objects: usize,
    /// Comparison records produced
    pub total_records: usize,
    /// Highest final similarity among the records
    pub best_similarity: Option<f64>,
    /// Non-fatal errors collected along the way
    pub error_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Embedding => write!(f, "Embedding"),
            PipelinePhase::Measuring => write!(f, "Measuring"),
            PipelinePhase::Comparing => write!(f, "Comparing"),
        }
    }
}
