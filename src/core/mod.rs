//! # Core Module
//!
//! The UI-agnostic measurement and comparison engine.
//!
//! ## Modules
//! - `side` - The six views and side-indexed collections
//! - `decode` - Image decoding and pixel checksums
//! - `object` - Source images and measurable objects
//! - `measure` - Per-view segmentation and six-view estimation
//! - `dimension` - Median aggregation and validated dimensions
//! - `embedding` - Seam for externally computed view embeddings
//! - `similarity` - Basic, advanced and final scoring
//! - `comparison` - Comparison records and all-pairs batches
//! - `config` - Tunable algorithm settings
//! - `scanner` - Discovers object folders in directories
//! - `pipeline` - Orchestrates the full workflow

pub mod comparison;
pub mod config;
pub mod decode;
pub mod dimension;
pub mod embedding;
pub mod measure;
pub mod object;
pub mod pipeline;
pub mod scanner;
pub mod side;
pub mod similarity;

// Re-export commonly used types
pub use comparison::{ComparisonBatch, ComparisonMode, ComparisonRecord};
pub use config::AlgorithmConfig;
pub use dimension::DimensionValue;
pub use embedding::EmbeddingProvider;
pub use object::{MeasurableObject, SourceImage};
pub use side::{Side, SideMap};
