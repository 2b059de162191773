//! Forecasting models for aggregated sales series
//!
//! The set of supported models is closed: [`ModelKind`] names every variant
//! and is matched exhaustively by the forecast engine. Model tokens coming
//! from configuration are parsed into a `ModelKind` up front, so an unknown
//! token fails before any fitting is attempted.

use crate::error::{ForecastError, Result};
use crate::metrics::ForecastAccuracy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod sarima;

/// Orders of a multiplicative seasonal ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SarimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// Seasonal AR order (P)
    pub seasonal_p: usize,
    /// Seasonal differencing order (D)
    pub seasonal_d: usize,
    /// Seasonal MA order (Q)
    pub seasonal_q: usize,
    /// Season length in periods (s)
    pub period: usize,
}

impl SarimaOrder {
    pub const fn new(
        (p, d, q): (usize, usize, usize),
        (seasonal_p, seasonal_d, seasonal_q, period): (usize, usize, usize, usize),
    ) -> Self {
        Self {
            p,
            d,
            q,
            seasonal_p,
            seasonal_d,
            seasonal_q,
            period,
        }
    }

    /// Number of estimated coefficients
    pub const fn parameter_count(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Observations consumed by differencing
    pub const fn differencing_loss(&self) -> usize {
        self.d + self.seasonal_d * self.period
    }

    /// Smallest series that leaves at least one conditional residual
    pub const fn min_observations(&self) -> usize {
        self.differencing_loss() + self.p + self.seasonal_p * self.period + 1
    }
}

impl Default for SarimaOrder {
    /// (1,1,1)(1,1,1)[12]
    fn default() -> Self {
        Self::new((1, 1, 1), (1, 1, 1, 12))
    }
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
        )
    }
}

/// Supported forecasting models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Seasonal ARIMA
    Sarima(SarimaOrder),
}

impl ModelKind {
    pub fn name(&self) -> String {
        match self {
            ModelKind::Sarima(order) => order.to_string(),
        }
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::Sarima(SarimaOrder::default())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "sarima" | "sarimax" => Ok(ModelKind::Sarima(SarimaOrder::default())),
            _ => Err(ForecastError::UnsupportedModel(format!(
                "Model type '{}' not supported",
                token
            ))),
        }
    }
}

/// Why a model could not produce a usable forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FitFailure {
    /// Series too short for the model's differencing and lags
    InsufficientData { required: usize, actual: usize },
    /// The optimiser exhausted its iteration budget
    NonConvergence { iterations: usize },
    /// Non-finite values in the objective, estimates or forecast
    NumericalInstability { detail: String },
}

impl fmt::Display for FitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitFailure::InsufficientData { required, actual } => write!(
                f,
                "insufficient data: need at least {} observations, have {}",
                required, actual
            ),
            FitFailure::NonConvergence { iterations } => {
                write!(f, "optimiser did not converge in {} iterations", iterations)
            }
            FitFailure::NumericalInstability { detail } => {
                write!(f, "numerical instability: {}", detail)
            }
        }
    }
}

impl std::error::Error for FitFailure {}

/// Point forecast with per-step standard errors
#[derive(Debug, Clone, PartialEq)]
pub struct PointForecast {
    pub values: Vec<f64>,
    pub std_errors: Vec<f64>,
}

/// Estimation summary of a trained model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitDiagnostics {
    /// Model description
    pub model: String,
    /// Estimated coefficients, grouped by polynomial
    pub coefficients: sarima::SarimaCoefficients,
    /// Innovation variance
    pub sigma2: f64,
    /// Conditional sum of squares at the optimum
    pub css: f64,
    /// Optimiser iterations
    pub iterations: usize,
    /// One-step in-sample accuracy, when any fitted values exist
    pub in_sample: Option<ForecastAccuracy>,
}

/// Trained forecast model
pub trait TrainedForecastModel: fmt::Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> std::result::Result<PointForecast, FitFailure>;

    /// Estimation summary
    fn diagnostics(&self) -> FitDiagnostics;
}

/// Forecast model that can be trained on a series of values
pub trait ForecastModel: fmt::Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on chronologically ordered values
    fn train(&self, values: &[f64]) -> std::result::Result<Self::Trained, FitFailure>;

    /// Get the name of the model
    fn name(&self) -> String;
}
