//! # Forecast Math
//!
//! Numerical building blocks for seasonal ARIMA models.
//! This crate provides differencing, lag-polynomial algebra, a derivative-free
//! minimiser and the small set of descriptive statistics the forecasting
//! pipeline needs.

use thiserror::Error;

pub mod differencing;
pub mod optimize;
pub mod polynomial;
pub mod stats;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
