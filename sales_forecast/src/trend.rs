//! Trend direction and summary statistics

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastResult;
use forecast_math::stats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places kept in summary statistics
const SUMMARY_DECIMALS: u32 = 2;

/// Direction of change between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Trend from `from` to `to`
    pub fn between(from: f64, to: f64) -> Self {
        if to > from {
            Trend::Increasing
        } else if to < from {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Trend::Increasing => "Increasing",
            Trend::Decreasing => "Decreasing",
            Trend::Stable => "Stable",
        }
    }

    /// Phrase describing a forecast trend
    pub const fn outlook(self) -> &'static str {
        match self {
            Trend::Increasing => "Expected to Increase",
            Trend::Decreasing => "Expected to Decrease",
            Trend::Stable => "Expected to Stay Stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Totals and trend directions of a forecast run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of the aggregated values, two decimals
    pub total: f64,
    /// Mean of the aggregated values, two decimals
    pub average: f64,
    pub historical_trend: Trend,
    pub forecast_trend: Trend,
}

/// Direction from the first to the last value, `Stable` below two values
pub fn historical_trend(values: &[f64]) -> Trend {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() > 1 => Trend::between(first, last),
        _ => Trend::Stable,
    }
}

/// Direction from the last historical value to the last forecast value
pub fn forecast_trend(last_historical: f64, forecast: &[f64]) -> Trend {
    forecast
        .last()
        .map_or(Trend::Stable, |&last| Trend::between(last_historical, last))
}

/// Derives summary statistics and trends
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize an aggregated series and its forecast
    pub fn summarize(&self, aggregated: &TimeSeries, forecast: &ForecastResult) -> Result<Summary> {
        let values = aggregated.values();
        let last = values.last().copied().ok_or_else(|| {
            ForecastError::InvalidInput("Cannot summarize an empty series".to_string())
        })?;
        let forecast_values = forecast.values();
        if forecast_values.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Cannot summarize an empty forecast".to_string(),
            ));
        }

        Ok(Summary {
            total: stats::round_to(stats::sum(&values), SUMMARY_DECIMALS),
            average: stats::round_to(stats::mean(&values)?, SUMMARY_DECIMALS),
            historical_trend: historical_trend(&values),
            forecast_trend: forecast_trend(last, &forecast_values),
        })
    }
}
