//! # Comparison Module
//!
//! Pairwise scoring of a batch of measured walnuts.
//!
//! ## Modes
//! | Mode | Basic (dimensions) | Advanced (embeddings) |
//! |------|--------------------|-----------------------|
//! | `basic_only` | yes | no |
//! | `advanced_only` | no | yes |
//! | `both` | yes | yes, unless basic < skip threshold |
//!
//! Every unordered pair is compared once, as `(earlier, later)` in input
//! order.

mod batch;
mod record;

pub use batch::{BatchResult, ComparisonBatch, PairError};
pub use record::{ComparisonRecord, ComparisonRecordBuilder};

use serde::{Deserialize, Serialize};

/// Which scorers a comparison runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    BasicOnly,
    AdvancedOnly,
    #[default]
    Both,
}

impl ComparisonMode {
    pub fn uses_basic(&self) -> bool {
        matches!(self, ComparisonMode::BasicOnly | ComparisonMode::Both)
    }

    pub fn uses_advanced(&self) -> bool {
        matches!(self, ComparisonMode::AdvancedOnly | ComparisonMode::Both)
    }
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMode::BasicOnly => write!(f, "basic_only"),
            ComparisonMode::AdvancedOnly => write!(f, "advanced_only"),
            ComparisonMode::Both => write!(f, "both"),
        }
    }
}
