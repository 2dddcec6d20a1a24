//! Engine configuration
//!
//! The tunable constants of the projection model. Every field has a default,
//! so a TOML file only needs to list what it overrides:
//!
//! ```toml
//! edge_threshold = 1.5
//! absence_penalty_per_category = 1.5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{validate_non_negative, validate_threshold, ProjectionError};

pub const DEFAULT_ABSENCE_PENALTY_PER_CATEGORY: f64 = 1.6;
pub const DEFAULT_EDGE_THRESHOLD: f64 = 2.0;
pub const DEFAULT_REST_MULTIPLIER: f64 = 0.94;
pub const DEFAULT_FALLBACK_ALLOWED_RATE: f64 = 11.5;
pub const DEFAULT_FALLBACK_PACE: f64 = 99.0;

/// Model constants shared by resolution, projection and edge evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Threes removed per absent player category
    pub absence_penalty_per_category: f64,
    /// Minimum |edge| for an OVER/UNDER signal
    pub edge_threshold: f64,
    /// Multiplier applied to a side on a back-to-back
    pub rest_multiplier: f64,
    /// Used when a partial source carries no allowed-rate column
    pub fallback_allowed_rate: f64,
    /// Used when a partial source carries no pace column
    pub fallback_pace: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            absence_penalty_per_category: DEFAULT_ABSENCE_PENALTY_PER_CATEGORY,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            rest_multiplier: DEFAULT_REST_MULTIPLIER,
            fallback_allowed_rate: DEFAULT_FALLBACK_ALLOWED_RATE,
            fallback_pace: DEFAULT_FALLBACK_PACE,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ProjectionError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ProjectionError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ProjectionError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ProjectionError::Io(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        validate_threshold(self.edge_threshold)?;
        validate_non_negative("absence_penalty_per_category", self.absence_penalty_per_category)?;
        validate_non_negative("fallback_allowed_rate", self.fallback_allowed_rate)?;
        validate_non_negative("fallback_pace", self.fallback_pace)?;

        if !(self.rest_multiplier > 0.0 && self.rest_multiplier <= 1.0) {
            return Err(ProjectionError::InvalidInput(format!(
                "rest_multiplier must be in (0, 1], got {}",
                self.rest_multiplier
            )));
        }
        Ok(())
    }
}
