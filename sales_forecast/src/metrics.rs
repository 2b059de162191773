//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Forecast accuracy metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics for predicted vs actual values
pub fn forecast_accuracy(predicted: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(ForecastError::InvalidInput(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = predicted.len() as f64;

    let errors: Vec<f64> = predicted
        .iter()
        .zip(actual.iter())
        .map(|(&p, &a)| a - p)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // zero-over-zero pairs count as perfect
    let smape = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| {
            let scale = a.abs() + p.abs();
            if scale == 0.0 {
                0.0
            } else {
                200.0 * (a - p).abs() / scale
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        smape,
    })
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE {:.4}, RMSE {:.4}, SMAPE {:.2}%",
            self.mae, self.rmse, self.smape
        )
    }
}
