//! Time series data handling
//!
//! [`TimeSeries`] is the typed, validated series every pipeline stage works
//! on. [`DataLoader`] and [`SalesTable`] read the wide sales layout (one date
//! column, one value column per product category) and hand out one
//! `TimeSeries` per category.

use crate::error::{ForecastError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Header of the date column in the sales export
pub const DEFAULT_DATE_COLUMN: &str = "datum";

/// Numeric calendar helper columns that are not sales categories
pub const CALENDAR_COLUMNS: [&str; 5] = ["Year", "Month", "Day", "Hour", "Weekday"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

/// A single dated value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered series of observations
///
/// Dates are strictly increasing and values are finite. An empty series can
/// be constructed; the pipeline stages reject it where it matters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct TimeSeries {
    points: Vec<Observation>,
}

impl TimeSeries {
    /// Create a validated series
    pub fn new(points: Vec<Observation>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            if !point.value.is_finite() {
                return Err(ForecastError::InvalidInput(format!(
                    "Value on {} is not a finite number",
                    point.date
                )));
            }
            if i > 0 && points[i - 1].date >= point.date {
                let reason = if points[i - 1].date == point.date {
                    "duplicate"
                } else {
                    "out-of-order"
                };
                return Err(ForecastError::InvalidInput(format!(
                    "Timestamps must be strictly increasing, found {} date {}",
                    reason, point.date
                )));
            }
        }

        Ok(Self { points })
    }

    /// Create a series from `(date, value)` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| Observation::new(date, value))
                .collect(),
        )
    }

    /// Create a series from pairs with possibly missing values
    ///
    /// Missing and NaN values are dropped before validation.
    pub fn from_optional<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        Self::new(
            pairs
                .into_iter()
                .filter_map(|(date, value)| match value {
                    Some(v) if !v.is_nan() => Some(Observation::new(date, v)),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Consecutive daily values starting at `start`
    pub fn daily(start: NaiveDate, values: &[f64]) -> Result<Self> {
        let mut points = Vec::with_capacity(values.len());
        let mut date = start;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                date = date.succ_opt().ok_or_else(|| {
                    ForecastError::InvalidInput("Date range overflows the calendar".to_string())
                })?;
            }
            points.push(Observation::new(date, *value));
        }
        Self::new(points)
    }

    /// Get the observations
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// Take ownership of the observations
    pub fn into_points(self) -> Vec<Observation> {
        self.points
    }

    /// Get the values as a vector
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Get the dates as a vector
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl TryFrom<Vec<Observation>> for TimeSeries {
    type Error = ForecastError;

    fn try_from(points: Vec<Observation>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<TimeSeries> for Vec<Observation> {
    fn from(series: TimeSeries) -> Self {
        series.points
    }
}

/// Wide sales table: one date column, one value column per category
#[derive(Debug, Clone)]
pub struct SalesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl SalesTable {
    /// Names of the category columns, in file order
    pub fn categories(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Series for one category, sorted by date, missing values dropped
    pub fn series(&self, category: &str) -> Result<TimeSeries> {
        let (_, values) = self
            .columns
            .iter()
            .find(|(name, _)| name == category)
            .ok_or_else(|| {
                ForecastError::InvalidInput(format!(
                    "Unknown category '{}', expected one of: {}",
                    category,
                    self.categories().join(", ")
                ))
            })?;

        let mut rows: Vec<(NaiveDate, Option<f64>)> =
            self.dates.iter().copied().zip(values.iter().copied()).collect();
        rows.sort_by_key(|(date, _)| *date);

        TimeSeries::from_optional(rows)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Data loader for sales exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a sales table from a CSV file with a `datum` date column
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        Self::from_csv_with_date_column(path, DEFAULT_DATE_COLUMN)
    }

    /// Load a sales table from a CSV file with a custom date column
    pub fn from_csv_with_date_column<P: AsRef<Path>>(
        path: P,
        date_column: &str,
    ) -> Result<SalesTable> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df, date_column)
    }

    /// Create a sales table from an existing DataFrame
    pub fn from_dataframe(df: DataFrame, date_column: &str) -> Result<SalesTable> {
        if !df.get_column_names().contains(&date_column) {
            return Err(ForecastError::InvalidInput(format!(
                "Date column '{}' not found in data",
                date_column
            )));
        }

        let dates = Self::parse_date_column(df.column(date_column)?)?;

        let mut columns = Vec::new();
        for series in df.get_columns() {
            if series.name() == date_column
                || !series.dtype().is_numeric()
                || is_calendar_column(series.name())
            {
                continue;
            }
            let values: Vec<Option<f64>> = series
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect();
            columns.push((series.name().to_string(), values));
        }

        if columns.is_empty() {
            return Err(ForecastError::InvalidInput(
                "No numeric category columns found in data".to_string(),
            ));
        }

        tracing::debug!(
            rows = dates.len(),
            categories = columns.len(),
            "loaded sales table"
        );

        Ok(SalesTable { dates, columns })
    }

    fn parse_date_column(column: &Series) -> Result<Vec<NaiveDate>> {
        let text = column.cast(&DataType::Utf8)?;
        text.utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let raw = value.ok_or_else(|| {
                    ForecastError::InvalidInput(format!("Row {} has no date", row + 1))
                })?;
                parse_date(raw).ok_or_else(|| {
                    ForecastError::InvalidInput(format!(
                        "Row {} has an unparseable date '{}'",
                        row + 1,
                        raw
                    ))
                })
            })
            .collect()
    }
}

fn is_calendar_column(name: &str) -> bool {
    CALENDAR_COLUMNS
        .iter()
        .any(|helper| helper.eq_ignore_ascii_case(name.trim()))
}

/// Parse a date in one of the accepted export formats
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| raw.get(..10).and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()))
}
