//! # Sales Forecast
//!
//! Per-category sales aggregation, seasonal forecasting and trend summaries.
//!
//! ## Features
//!
//! - Wide CSV ingestion (one date column, one column per category)
//! - Daily, weekly and monthly aggregation with granularity-bound horizons
//! - Seasonal ARIMA (1,1,1)(1,1,1)[12] forecasting with prediction intervals
//! - Zero-forecast fallback flagged as degraded when the model cannot be fitted
//! - Trend summaries: total, average, historical and forecast direction
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::{DataLoader, Granularity, Pipeline};
//!
//! let table = DataLoader::from_csv("salesdaily.csv")?;
//! let series = table.series("M01AB")?;
//!
//! let output = Pipeline::default().run(series, Granularity::Weekly)?;
//! println!("{:?}", output.summary.forecast_trend);
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod granularity;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod trend;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::{Aggregation, Aggregator};
pub use crate::config::PipelineConfig;
pub use crate::data::{DataLoader, Observation, SalesTable, TimeSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{ForecastEngine, ForecastResult, ForecastStatus};
pub use crate::granularity::{Frequency, Granularity};
pub use crate::models::{FitFailure, ModelKind, SarimaOrder};
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::trend::{Summary, Trend, TrendAnalyzer};
