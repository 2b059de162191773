//! Descriptive statistics

use crate::{MathError, Result};

/// Sum of all values
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean of an empty slice is undefined".to_string(),
        ));
    }
    Ok(sum(values) / values.len() as f64)
}

/// Sum of squared values
pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Round to a number of decimal places, halves to even
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}
