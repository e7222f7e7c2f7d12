//! # Error Module
//!
//! Typed error values for the walnut measurement and comparison engine.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, sides, offending values
//! - **One variant per rule** - validation failures name the rule that failed
//!
//! Per-view numeric steps (segmentation, bounding box, scale, aggregation)
//! do not use these types: they report "no result" as a zero measurement.

use crate::core::dimension::Axis;
use crate::core::side::Side;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum WalnutPairError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Measurement error: {0}")]
    Measure(#[from] MeasureError),

    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    #[error("Dimension error: {0}")]
    Dimension(#[from] DimensionError),

    #[error("Comparison error: {0}")]
    Compare(#[from] ComparisonError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not write JSON output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors that occur while discovering object folders
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Object folder {path} is incomplete: {source}")]
    IncompleteObject {
        path: PathBuf,
        #[source]
        source: ObjectError,
    },
}

/// Errors that occur while loading an image from disk
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Errors that stop a six-view measurement before any pixels are examined
#[derive(Error, Debug)]
pub enum MeasureError {
    #[error("Could not load the {side} view: {source}")]
    View {
        side: Side,
        #[source]
        source: DecodeError,
    },
}

/// Errors raised while assembling a measurable object
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectError {
    #[error("Object identifier must not be empty")]
    EmptyId,

    #[error("Object must have all 6 sides. Missing: {}", join_sides(.missing))]
    MissingSides { missing: Vec<Side> },

    #[error("More than one image supplied for side {side}")]
    DuplicateSide { side: Side },

    #[error("Invalid image for side {side}: {reason}")]
    InvalidImage { side: Side, reason: String },
}

/// Rules a dimension triple can break
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DimensionError {
    #[error("{axis} must be positive, got {value}mm")]
    NonPositive { axis: Axis, value: f64 },

    #[error("{axis} {value}mm is outside valid range [{min}, {max}]mm")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Height {height}mm exceeds length {length}mm")]
    HeightExceedsLength { height: f64, length: f64 },
}

/// Rules a comparison record or batch can break
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Both object identifiers must be non-empty")]
    EmptyIdentifier,

    #[error("Cannot compare object {id} with itself")]
    SelfComparison { id: String },

    #[error("{field} must be a non-negative finite difference, got {value}")]
    InvalidDifference { field: &'static str, value: f64 },

    #[error("{field} must be between 0 and 1, got {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },

    #[error("At least one of basic or advanced similarity must be present")]
    NoSimilarity,

    #[error("{field} must be between 0 and 1, got {value}")]
    WeightOutOfRange { field: &'static str, value: f64 },

    #[error("Basic weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    #[error("Need at least 2 objects to perform comparison, got {count}")]
    TooFewObjects { count: usize },

    #[error("Object {id} does not have dimensions")]
    MissingDimensions { id: String },

    #[error("Invalid comparison configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Errors reported by an embedding provider
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding model failed: {0}")]
    Model(String),

    #[error("Embedding model failed on the {side} view: {reason}")]
    Provider { side: Side, reason: String },

    #[error("Could not load the {side} view for embedding: {source}")]
    View {
        side: Side,
        #[source]
        source: DecodeError,
    },
}

/// Errors loading or validating the algorithm configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{field} must be between 0 and 1, got {value}")]
    WeightOutOfRange { field: &'static str, value: f64 },

    #[error("{group} weights must sum to 1.0, got {sum}")]
    WeightSum { group: &'static str, sum: f64 },

    #[error("Weight for side {side} must be non-negative, got {value}")]
    NegativeSideWeight { side: Side, value: f64 },

    #[error("Bounding box ratio bounds must satisfy 0 <= min <= max, got [{min}, {max}]")]
    RatioBounds { min: f64, max: f64 },

    #[error("Invalid cosine remap: {0}")]
    CosineRemap(String),
}

fn join_sides(sides: &[Side]) -> String {
    sides
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, WalnutPairError>;
