//! # Pipeline Module
//!
//! Orchestrates the full measure-and-compare workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover object folders under the given roots
//! 2. **Embed** - Attach view embeddings (only with a provider and an advanced mode)
//! 3. **Measure** - Estimate and validate each object's dimensions
//! 4. **Compare** - Score every pair of measured objects
//!
//! ## Parallelism
//! Uses rayon for loading, measuring and comparing across CPU cores.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
