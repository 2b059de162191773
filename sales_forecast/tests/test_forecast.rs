use chrono::{Days, NaiveDate};
use forecast_math::optimize::NelderMeadOptions;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::aggregate::aggregate;
use sales_forecast::models::FitFailure;
use sales_forecast::pipeline::run;
use sales_forecast::{
    ForecastEngine, ForecastStatus, Frequency, Granularity, ModelKind, TimeSeries,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three years of daily sales with weekly and yearly swings
fn daily_sales(days: usize) -> TimeSeries {
    let values: Vec<f64> = (0..days)
        .map(|t| {
            let t = t as f64;
            20.0 + 0.01 * t
                + 4.0 * (2.0 * std::f64::consts::PI * t / 7.0).sin()
                + 6.0 * (2.0 * std::f64::consts::PI * t / 365.0).cos()
                + 1.5 * (t * 2.3).sin()
        })
        .collect();
    TimeSeries::daily(date(2021, 1, 1), &values).unwrap()
}

#[rstest]
#[case(Granularity::Daily, 5)]
#[case(Granularity::Weekly, 1)]
#[case(Granularity::Monthly, 1)]
fn test_forecast_length_matches_horizon(#[case] granularity: Granularity, #[case] horizon: usize) {
    let aggregation = aggregate(daily_sales(3 * 365), granularity).unwrap();
    let result = ForecastEngine::default()
        .forecast(&aggregation, aggregation.horizon())
        .unwrap();

    assert_eq!(result.horizon(), horizon);
    assert_eq!(result.values().len(), horizon);
}

#[rstest]
#[case(Granularity::Daily)]
#[case(Granularity::Weekly)]
#[case(Granularity::Monthly)]
fn test_index_continues_past_history(#[case] granularity: Granularity) {
    let aggregation = aggregate(daily_sales(400), granularity).unwrap();
    let result = ForecastEngine::default().forecast(&aggregation, 4).unwrap();

    let last = aggregation.series().last().unwrap().date;
    let dates = result.dates();
    assert!(dates[0] > last);
    for pair in dates.windows(2) {
        assert!(pair[1] > pair[0]);
    }

    let frequency = aggregation.frequency();
    assert_eq!(frequency.next(last), Some(dates[0]));
    for pair in dates.windows(2) {
        assert_eq!(frequency.next(pair[0]), Some(pair[1]));
    }
}

#[rstest]
#[case::mondays(date(2024, 1, 1), 7, date(2024, 9, 30))]
#[case::every_other_day(date(2024, 1, 1), 2, date(2024, 3, 19))]
fn test_daily_index_keeps_regular_spacing(
    #[case] start: NaiveDate,
    #[case] step: u32,
    #[case] last: NaiveDate,
) {
    let pairs: Vec<(NaiveDate, f64)> = (0..40u64)
        .map(|i| {
            let day = start.checked_add_days(Days::new(i * u64::from(step))).unwrap();
            (day, 10.0 + (i % 3) as f64)
        })
        .collect();
    let series = TimeSeries::from_pairs(pairs).unwrap();

    let aggregation = aggregate(series.clone(), Granularity::Daily).unwrap();
    assert_eq!(aggregation.frequency(), Frequency::EveryDays(step));

    let output = run(series, Granularity::Daily).unwrap();
    assert_eq!(output.aggregated.last().unwrap().date, last);

    let expected: Vec<NaiveDate> = (1..=5u64)
        .map(|k| last.checked_add_days(Days::new(k * u64::from(step))).unwrap())
        .collect();
    assert_eq!(output.forecast.dates(), expected);
}

#[test]
fn test_monthly_index_uses_month_ends() {
    // Daily data through 2023-01-15 aggregates into a partial January bucket
    let series = TimeSeries::daily(date(2022, 12, 1), &[1.0; 46]).unwrap();
    let aggregation = aggregate(series, Granularity::Monthly).unwrap();
    assert_eq!(aggregation.series().dates(), vec![date(2022, 12, 31), date(2023, 1, 31)]);

    let result = ForecastEngine::default().forecast(&aggregation, 2).unwrap();
    assert_eq!(result.dates(), vec![date(2023, 2, 28), date(2023, 3, 31)]);
}

#[test]
fn test_short_zero_series_degrades() {
    let series = TimeSeries::daily(date(2024, 1, 1), &[0.0; 10]).unwrap();
    let aggregation = aggregate(series, Granularity::Daily).unwrap();
    let result = ForecastEngine::default().forecast(&aggregation, 5).unwrap();

    assert_eq!(result.values(), vec![0.0; 5]);
    assert_eq!(
        result.status(),
        &ForecastStatus::Degraded {
            reason: FitFailure::InsufficientData {
                required: 27,
                actual: 10
            }
        }
    );
    assert!(result.intervals().is_none());
    assert!(result.diagnostics().is_none());
    assert_eq!(result.dates()[0], date(2024, 1, 11));
}

#[test]
fn test_flat_series_is_fitted_not_degraded() {
    let series = TimeSeries::daily(date(2024, 1, 1), &[0.0; 40]).unwrap();
    let aggregation = aggregate(series, Granularity::Daily).unwrap();
    let result = ForecastEngine::default().forecast(&aggregation, 5).unwrap();

    assert_eq!(result.values(), vec![0.0; 5]);
    assert_eq!(result.status(), &ForecastStatus::Fitted);
    assert!(result.intervals().is_some());
}

#[test]
fn test_intervals_bracket_forecast() {
    let aggregation = aggregate(daily_sales(200), Granularity::Daily).unwrap();
    let result = ForecastEngine::default()
        .with_confidence_level(0.8)
        .unwrap()
        .forecast(&aggregation, 5)
        .unwrap();
    assert!(!result.is_degraded());

    let intervals = result.intervals().unwrap();
    assert_eq!(intervals.len(), 5);
    for (interval, value) in intervals.iter().zip(result.values()) {
        assert!(interval.lower < value);
        assert!(value < interval.upper);
    }
}

#[test]
fn test_wider_level_gives_wider_intervals() {
    let aggregation = aggregate(daily_sales(200), Granularity::Daily).unwrap();
    let narrow = ForecastEngine::default()
        .with_confidence_level(0.5)
        .unwrap()
        .forecast(&aggregation, 1)
        .unwrap();
    let wide = ForecastEngine::default()
        .with_confidence_level(0.99)
        .unwrap()
        .forecast(&aggregation, 1)
        .unwrap();

    let width = |bounds: &[sales_forecast::forecast::Interval]| bounds[0].upper - bounds[0].lower;
    assert!(width(wide.intervals().unwrap()) > width(narrow.intervals().unwrap()));
    assert_eq!(narrow.values(), wide.values());
}

#[test]
fn test_exhausted_budget_degrades() {
    let aggregation = aggregate(daily_sales(200), Granularity::Daily).unwrap();
    let options = NelderMeadOptions {
        max_iterations: 2,
        ..NelderMeadOptions::default()
    };
    let result = ForecastEngine::new(ModelKind::default())
        .with_optimizer(options)
        .forecast(&aggregation, 5)
        .unwrap();

    assert_eq!(result.values(), vec![0.0; 5]);
    assert!(matches!(
        result.status(),
        ForecastStatus::Degraded {
            reason: FitFailure::NonConvergence { iterations: 2 }
        }
    ));
    assert_eq!(result.dates().len(), 5);
}

#[test]
fn test_status_serialization() {
    let json = serde_json::to_value(ForecastStatus::Degraded {
        reason: FitFailure::NonConvergence { iterations: 9 },
    })
    .unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "state": "degraded",
            "reason": { "kind": "non_convergence", "iterations": 9 }
        })
    );
    assert_eq!(
        serde_json::to_value(ForecastStatus::Fitted).unwrap(),
        serde_json::json!({ "state": "fitted" })
    );
}
