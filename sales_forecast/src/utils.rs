//! Utility functions for the sales_forecast crate

use crate::error::{ForecastError, Result};
use crate::granularity::Frequency;
use chrono::NaiveDate;

/// Create future timestamps for forecasting
///
/// Returns exactly `horizon` dates, each one step of `frequency` after the
/// previous, starting one step after `last`.
pub fn future_timestamps(
    last: NaiveDate,
    horizon: usize,
    frequency: Frequency,
) -> Result<Vec<NaiveDate>> {
    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last;

    for _ in 0..horizon {
        current = frequency.next(current).ok_or_else(|| {
            ForecastError::InvalidInput(format!(
                "Forecast index overflows the calendar after {}",
                current
            ))
        })?;
        timestamps.push(current);
    }

    Ok(timestamps)
}
