//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
///
/// Model-fit failures are deliberately absent: they are reported through
/// [`crate::forecast::ForecastStatus`] and never abort a pipeline run.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Empty series, bad timestamps or values, unknown category
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Granularity token that does not name a supported bucket width
    #[error("Unsupported granularity: {0}")]
    UnsupportedGranularity(String),

    /// Model token that does not name a supported model kind
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from numerical kernels
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from JSON encoding or decoding
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from CSV export
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ForecastError {
    /// Whether the error belongs to the invalid-input class
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidInput(_) | ForecastError::UnsupportedGranularity(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
