//! Aggregation granularity and index frequency

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket width used to aggregate raw observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Granularity {
    /// One bucket per observation
    #[default]
    Daily,
    /// Calendar weeks, Monday through Sunday
    Weekly,
    /// Calendar months
    Monthly,
}

impl Granularity {
    /// Every supported granularity
    pub const ALL: [Granularity; 3] = [Granularity::Daily, Granularity::Weekly, Granularity::Monthly];

    /// Number of future periods forecast at this granularity
    pub const fn horizon(self) -> usize {
        match self {
            Granularity::Daily => 5,
            Granularity::Weekly | Granularity::Monthly => 1,
        }
    }

    /// Index frequency of a series aggregated at this granularity
    pub const fn frequency(self) -> Frequency {
        match self {
            Granularity::Daily => Frequency::Daily,
            Granularity::Weekly => Frequency::WeeklyEndingSunday,
            Granularity::Monthly => Frequency::MonthEnd,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Granularity::Daily),
            "weekly" | "w" => Ok(Granularity::Weekly),
            "monthly" | "m" => Ok(Granularity::Monthly),
            _ => Err(ForecastError::UnsupportedGranularity(format!(
                "'{}' (expected Daily, Weekly or Monthly)",
                token
            ))),
        }
    }
}

/// Spacing rule of a series' date index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Every calendar day
    Daily,
    /// Every Sunday
    WeeklyEndingSunday,
    /// Last day of every month
    MonthEnd,
    /// A fixed number of days
    EveryDays(u32),
}

impl Frequency {
    /// Label of the bucket that contains `date`
    pub fn bucket_end(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => Some(date),
            Frequency::WeeklyEndingSunday => {
                let days_to_sunday = 6 - date.weekday().num_days_from_monday();
                date.checked_add_days(Days::new(u64::from(days_to_sunday)))
            }
            Frequency::MonthEnd => month_end(date),
            Frequency::EveryDays(_) => Some(date),
        }
    }

    /// The index position that follows `date`
    ///
    /// `date` is first snapped to its bucket label, so the result always lies
    /// on the frequency's grid and is strictly later than `date`.
    pub fn next(self, date: NaiveDate) -> Option<NaiveDate> {
        let anchor = self.bucket_end(date)?;
        match self {
            Frequency::Daily => anchor.succ_opt(),
            Frequency::WeeklyEndingSunday => anchor.checked_add_days(Days::new(7)),
            Frequency::MonthEnd => month_end(anchor.succ_opt()?),
            Frequency::EveryDays(days) => anchor.checked_add_days(Days::new(u64::from(days))),
        }
    }

    /// Infer the frequency of a series from its dates
    ///
    /// Calendar grids take precedence: consecutive days, then Sundays, then
    /// month ends. Any other constant spacing becomes [`Frequency::EveryDays`].
    /// Returns `None` for fewer than two points or irregular spacing.
    pub fn infer(series: &TimeSeries) -> Option<Frequency> {
        let dates = series.dates();
        if dates.len() < 2 {
            return None;
        }

        let gaps: Vec<i64> = dates
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days())
            .collect();

        if gaps.iter().all(|&gap| gap == 1) {
            Some(Frequency::Daily)
        } else if dates.iter().all(|d| d.weekday() == Weekday::Sun) {
            Some(Frequency::WeeklyEndingSunday)
        } else if dates.iter().all(|&d| month_end(d) == Some(d)) {
            Some(Frequency::MonthEnd)
        } else if gaps.iter().all(|&gap| gap == gaps[0]) {
            u32::try_from(gaps[0]).ok().map(Frequency::EveryDays)
        } else {
            None
        }
    }
}

/// Last day of the month containing `date`
fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
