use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_forecast::aggregate::aggregate;
use sales_forecast::trend::{forecast_trend, historical_trend};
use sales_forecast::{
    ForecastEngine, ForecastError, Granularity, Summary, TimeSeries, Trend, TrendAnalyzer,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn summarize(values: &[f64]) -> Summary {
    let series = TimeSeries::daily(date(2024, 1, 1), values).unwrap();
    let aggregation = aggregate(series, Granularity::Daily).unwrap();
    let forecast = ForecastEngine::default().forecast(&aggregation, 5).unwrap();
    TrendAnalyzer::new()
        .summarize(aggregation.series(), &forecast)
        .unwrap()
}

#[test]
fn test_total_and_average_rounded() {
    let summary = summarize(&[1.004, 2.0, 3.333]);
    assert_eq!(summary.total, 6.34);
    assert_eq!(summary.average, 2.11);
}

#[test]
fn test_rounding_half_to_even() {
    let summary = summarize(&[0.125]);
    assert_eq!(summary.total, 0.12);
    assert_eq!(summary.average, 0.12);

    let summary = summarize(&[0.125, 0.25]);
    assert_eq!(summary.total, 0.38);
}

#[test]
fn test_historical_trend_directions() {
    assert_eq!(summarize(&[1.0, 2.0, 3.0]).historical_trend, Trend::Increasing);
    assert_eq!(summarize(&[3.0, 9.0, 1.0]).historical_trend, Trend::Decreasing);
    assert_eq!(summarize(&[2.0, 5.0, 2.0]).historical_trend, Trend::Stable);
}

#[test]
fn test_single_value_is_stable() {
    let summary = summarize(&[42.0]);
    assert_eq!(summary.historical_trend, Trend::Stable);
    assert_eq!(summary.total, 42.0);
    assert_eq!(summary.average, 42.0);
}

#[test]
fn test_forecast_trend_baseline_is_last_history_value() {
    // History ends at 3; the forecast falls from 5 to 4 but ends above 3
    assert_eq!(historical_trend(&[1.0, 2.0, 3.0]), Trend::Increasing);
    assert_eq!(forecast_trend(3.0, &[5.0, 4.0]), Trend::Increasing);
}

#[test]
fn test_degraded_forecast_trend() {
    // Too short to fit: the zero fallback sits below positive history
    let summary = summarize(&[4.0, 6.0]);
    assert_eq!(summary.forecast_trend, Trend::Decreasing);
}

#[test]
fn test_empty_history_rejected() {
    let series = TimeSeries::daily(date(2024, 1, 1), &[1.0]).unwrap();
    let aggregation = aggregate(series, Granularity::Daily).unwrap();
    let forecast = ForecastEngine::default().forecast(&aggregation, 5).unwrap();

    let result = TrendAnalyzer::new().summarize(&TimeSeries::default(), &forecast);
    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}

#[test]
fn test_summary_json_shape() {
    let summary = Summary {
        total: 14.0,
        average: 7.0,
        historical_trend: Trend::Stable,
        forecast_trend: Trend::Decreasing,
    };
    assert_eq!(
        serde_json::to_value(summary).unwrap(),
        serde_json::json!({
            "total": 14.0,
            "average": 7.0,
            "historicalTrend": "Stable",
            "forecastTrend": "Decreasing"
        })
    );
    assert_eq!(Trend::Increasing.outlook(), "Expected to Increase");
}
