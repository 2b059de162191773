//! Forecast engine
//!
//! Fits the configured model to an aggregated series and continues its date
//! index. A model that cannot be fitted never aborts the run: the engine falls
//! back to a zero forecast over the same future index and marks the result as
//! degraded.

use crate::aggregate::Aggregation;
use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::models::sarima::Sarima;
use crate::models::{
    FitDiagnostics, FitFailure, ForecastModel, ModelKind, PointForecast, TrainedForecastModel,
};
use crate::utils::future_timestamps;
use chrono::NaiveDate;
use forecast_math::optimize::NelderMeadOptions;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Default coverage of prediction intervals
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Whether the forecast came from a fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ForecastStatus {
    /// The model was fitted and produced the values
    Fitted,
    /// Fitting failed and the values are the zero fallback
    Degraded { reason: FitFailure },
}

impl ForecastStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ForecastStatus::Degraded { .. })
    }
}

/// Lower and upper prediction bound for one forecast step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// Result of a forecast operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecasted values on the continued index
    points: Vec<Observation>,
    /// Prediction intervals, one per point, only when fitted
    intervals: Option<Vec<Interval>>,
    status: ForecastStatus,
    model: ModelKind,
    diagnostics: Option<FitDiagnostics>,
}

impl ForecastResult {
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Number of forecast periods
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    pub fn intervals(&self) -> Option<&[Interval]> {
        self.intervals.as_deref()
    }

    pub fn status(&self) -> &ForecastStatus {
        &self.status
    }

    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn diagnostics(&self) -> Option<&FitDiagnostics> {
        self.diagnostics.as_ref()
    }
}

/// Fits a model to aggregated series and forecasts ahead
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    model: ModelKind,
    optimizer: NelderMeadOptions,
    confidence_level: f64,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(ModelKind::default())
    }
}

impl ForecastEngine {
    pub fn new(model: ModelKind) -> Self {
        Self {
            model,
            optimizer: NelderMeadOptions::default(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }

    /// Engine for a model token such as `"sarima"`
    pub fn from_token(token: &str) -> Result<Self> {
        Ok(Self::new(token.parse()?))
    }

    pub fn with_optimizer(mut self, optimizer: NelderMeadOptions) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set the interval coverage, which must lie strictly between 0 and 1
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "Confidence level must be between 0 and 1, got {}",
                level
            )));
        }
        self.confidence_level = level;
        Ok(self)
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Forecast `horizon` periods past the end of `aggregation`
    ///
    /// Only invalid input is an error. A failed fit yields zeros with a
    /// [`ForecastStatus::Degraded`] status on the same future index.
    pub fn forecast(&self, aggregation: &Aggregation, horizon: usize) -> Result<ForecastResult> {
        let series = aggregation.series();
        let last = series.last().ok_or_else(|| {
            ForecastError::InvalidInput("Cannot forecast an empty series".to_string())
        })?;
        if horizon == 0 {
            return Err(ForecastError::InvalidInput(
                "Forecast horizon must be at least one period".to_string(),
            ));
        }

        let dates = future_timestamps(last.date, horizon, aggregation.frequency())?;

        let (values, intervals, status, diagnostics) = match self.fit(&series.values(), horizon) {
            Ok((forecast, diagnostics)) => {
                let intervals = self.intervals(&forecast);
                (
                    forecast.values,
                    Some(intervals),
                    ForecastStatus::Fitted,
                    Some(diagnostics),
                )
            }
            Err(reason) => {
                tracing::warn!(
                    model = %self.model.name(),
                    granularity = %aggregation.granularity(),
                    %reason,
                    "model fit failed, falling back to a zero forecast"
                );
                (
                    vec![0.0; horizon],
                    None,
                    ForecastStatus::Degraded { reason },
                    None,
                )
            }
        };

        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| Observation::new(date, value))
            .collect();

        Ok(ForecastResult {
            points,
            intervals,
            status,
            model: self.model,
            diagnostics,
        })
    }

    fn fit(
        &self,
        values: &[f64],
        horizon: usize,
    ) -> std::result::Result<(PointForecast, FitDiagnostics), FitFailure> {
        match self.model {
            ModelKind::Sarima(order) => {
                let trained = Sarima::new(order)
                    .with_options(self.optimizer)
                    .train(values)?;
                let forecast = trained.forecast(horizon)?;
                Ok((forecast, trained.diagnostics()))
            }
        }
    }

    fn intervals(&self, forecast: &PointForecast) -> Vec<Interval> {
        let z = Normal::new(0.0, 1.0)
            .map(|normal| normal.inverse_cdf((1.0 + self.confidence_level) / 2.0))
            .unwrap_or(1.96);

        forecast
            .values
            .iter()
            .zip(&forecast.std_errors)
            .map(|(value, se)| Interval {
                lower: value - z * se,
                upper: value + z * se,
            })
            .collect()
    }
}
