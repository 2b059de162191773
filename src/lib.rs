//! # Sales Insight
//!
//! Workspace facade over the sales forecasting crates.
//!
//! - [`sales_forecast`]: ingestion, aggregation, forecasting and trend summaries
//! - [`forecast_math`]: differencing, lag polynomials, optimisation and statistics
//!
//! ```
//! use sales_insight_workspace::sales_forecast::Granularity;
//!
//! let granularity: Granularity = "weekly".parse().unwrap();
//! assert_eq!(granularity.horizon(), 1);
//! ```

pub use forecast_math;
pub use sales_forecast;
