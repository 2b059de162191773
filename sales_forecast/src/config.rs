//! Pipeline configuration

use crate::error::{ForecastError, Result};
use crate::forecast::DEFAULT_CONFIDENCE_LEVEL;
use crate::models::ModelKind;
use forecast_math::optimize::NelderMeadOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one pipeline run
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model token, parsed into a [`ModelKind`]
    pub model: String,
    /// Optimiser iteration budget
    pub max_iterations: usize,
    /// Optimiser convergence tolerance
    pub tolerance: f64,
    /// Coverage of prediction intervals
    pub confidence_level: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let optimizer = NelderMeadOptions::default();
        Self {
            model: "sarima".to_string(),
            max_iterations: optimizer.max_iterations,
            tolerance: optimizer.tolerance,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and the model token
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(ForecastError::ConfigError(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ForecastError::ConfigError(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        self.model_kind()?;
        Ok(())
    }

    pub fn model_kind(&self) -> Result<ModelKind> {
        self.model.parse()
    }

    pub fn optimizer_options(&self) -> NelderMeadOptions {
        NelderMeadOptions {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            ..NelderMeadOptions::default()
        }
    }
}
