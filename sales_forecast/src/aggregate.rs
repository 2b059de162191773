//! Resampling of raw daily observations into granularity buckets
//!
//! Weekly buckets run Monday through Sunday and are labelled with the Sunday;
//! monthly buckets are labelled with the last day of the month. A bucket that
//! receives no observations is omitted rather than zero-filled, so sparse
//! input yields an index with gaps.

use crate::data::{Observation, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::granularity::{Frequency, Granularity};
use serde::Serialize;

/// Aggregated series together with the granularity that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    series: TimeSeries,
    granularity: Granularity,
    horizon: usize,
}

impl Aggregation {
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn into_series(self) -> TimeSeries {
        self.series
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Number of periods to forecast for this granularity
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Frequency used to extend the index into the future
    ///
    /// Weekly and monthly buckets always sit on their granularity's grid. A
    /// daily pass-through keeps whatever spacing the raw series has, so its
    /// frequency is inferred, falling back to one day when the spacing is
    /// irregular.
    pub fn frequency(&self) -> Frequency {
        match self.granularity {
            Granularity::Daily => Frequency::infer(&self.series).unwrap_or(Frequency::Daily),
            Granularity::Weekly | Granularity::Monthly => self.granularity.frequency(),
        }
    }
}

/// Buckets raw observations by granularity
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate `series` to `granularity`
    pub fn aggregate(&self, series: TimeSeries, granularity: Granularity) -> Result<Aggregation> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Cannot aggregate an empty series".to_string(),
            ));
        }

        let input_len = series.len();
        let series = match granularity {
            Granularity::Daily => series,
            Granularity::Weekly | Granularity::Monthly => {
                sum_buckets(series, granularity.frequency())?
            }
        };

        tracing::debug!(
            %granularity,
            input = input_len,
            buckets = series.len(),
            "aggregated series"
        );

        Ok(Aggregation {
            series,
            granularity,
            horizon: granularity.horizon(),
        })
    }
}

/// Aggregate with a default [`Aggregator`]
pub fn aggregate(series: TimeSeries, granularity: Granularity) -> Result<Aggregation> {
    Aggregator::new().aggregate(series, granularity)
}

fn sum_buckets(series: TimeSeries, frequency: Frequency) -> Result<TimeSeries> {
    let mut buckets: Vec<Observation> = Vec::new();

    for observation in series.into_points() {
        let label = frequency.bucket_end(observation.date).ok_or_else(|| {
            ForecastError::InvalidInput(format!(
                "No bucket for {} within the supported calendar",
                observation.date
            ))
        })?;

        match buckets.last_mut() {
            Some(bucket) if bucket.date == label => bucket.value += observation.value,
            _ => buckets.push(Observation::new(label, observation.value)),
        }
    }

    TimeSeries::new(buckets)
}
