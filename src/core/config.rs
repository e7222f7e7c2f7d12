//! # Config Module
//!
//! Every tunable of measurement and comparison in one serde structure.
//!
//! ## Lookup Order
//! 1. An explicit file (`--config`)
//! 2. `<config_dir>/walnut-pair/config.json`
//! 3. Built-in defaults
//!
//! Missing fields in a file fall back to their defaults, so a file only has
//! to name what it changes:
//!
//! ```json
//! { "comparison_mode": "basic_only", "basic": { "width_weight": 0.5, "height_weight": 0.25, "length_weight": 0.25 } }
//! ```

use crate::core::comparison::ComparisonMode;
use crate::core::measure::{CameraSetup, MeasureConfig};
use crate::core::similarity::{uniform_side_weights, BasicWeights, CosineRemap, FinalWeights, SideWeights};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dimension comparison settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    #[serde(flatten)]
    pub weights: BasicWeights,
    /// In `both` mode, pairs whose basic score falls below this skip the
    /// embedding comparison
    pub skip_advanced_threshold: f64,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            weights: BasicWeights::default(),
            skip_advanced_threshold: 0.0,
        }
    }
}

/// Embedding comparison settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    pub side_weights: SideWeights,
    pub cosine_remap: CosineRemap,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            side_weights: uniform_side_weights(),
            cosine_remap: CosineRemap::Linear,
        }
    }
}

/// Complete algorithm configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    pub comparison_mode: ComparisonMode,
    pub basic: BasicConfig,
    pub advanced: AdvancedConfig,
    pub final_weights: FinalWeights,
    /// Fallbacks for images without their own camera geometry
    pub camera: CameraSetup,
    pub measure: MeasureConfig,
}

impl AlgorithmConfig {
    /// Per-user config file location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("walnut-pair").join("config.json"))
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: AlgorithmConfig = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Explicit file, else the per-user file when it exists, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.basic.weights.validate()?;

        let threshold = self.basic.skip_advanced_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::WeightOutOfRange {
                field: "skip_advanced_threshold",
                value: threshold,
            });
        }

        self.final_weights.validate()?;

        for (side, &value) in self.advanced.side_weights.iter() {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeSideWeight { side, value });
            }
        }
        self.advanced.cosine_remap.validate()?;

        let (min, max) = (self.measure.min_bbox_ratio, self.measure.max_bbox_ratio);
        if !(0.0 <= min && min <= max) {
            return Err(ConfigError::RatioBounds { min, max });
        }

        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
