//! Rendering of pipeline output as text, JSON or CSV rows

use crate::error::Result;
use crate::forecast::ForecastStatus;
use crate::pipeline::PipelineOutput;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::io;

/// One exported row
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Row {
    kind: &'static str,
    date: NaiveDate,
    value: f64,
    lower: Option<f64>,
    upper: Option<f64>,
}

/// Human-readable report for one category
pub fn render_text(output: &PipelineOutput, category: &str) -> String {
    let mut text = String::new();
    // writing into a String cannot fail
    let _ = write_text(&mut text, output, category);
    text
}

fn write_text(text: &mut String, output: &PipelineOutput, category: &str) -> fmt::Result {
    let summary = &output.summary;
    let forecast = &output.forecast;

    writeln!(text, "{} sales for {}", output.granularity, category)?;
    writeln!(text, "  periods         : {}", output.aggregated.len())?;
    writeln!(text, "  total           : {:.2}", summary.total)?;
    writeln!(text, "  average         : {:.2}", summary.average)?;
    writeln!(text, "  historical trend: {}", summary.historical_trend)?;
    writeln!(text, "  forecast trend  : {}", summary.forecast_trend.outlook())?;

    if let ForecastStatus::Degraded { reason } = forecast.status() {
        writeln!(text, "warning: forecast unavailable ({}), showing zeros", reason)?;
    }

    writeln!(text, "forecast ({}):", forecast.model().name())?;
    let intervals = forecast.intervals();
    for (i, point) in forecast.points().iter().enumerate() {
        match intervals.and_then(|bounds| bounds.get(i)) {
            Some(bound) => writeln!(
                text,
                "  {}  {:>12.2}  [{:.2}, {:.2}]",
                point.date, point.value, bound.lower, bound.upper
            )?,
            None => writeln!(text, "  {}  {:>12.2}", point.date, point.value)?,
        }
    }

    if let Some(accuracy) = forecast.diagnostics().and_then(|d| d.in_sample) {
        writeln!(text, "in-sample fit: {}", accuracy)?;
    }

    Ok(())
}

/// Pretty-printed JSON document
pub fn to_json(output: &PipelineOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Write aggregated history and forecast as CSV rows
///
/// Columns are `kind,date,value,lower,upper`; bounds are empty for history
/// rows and for degraded forecasts.
pub fn write_csv<W: io::Write>(output: &PipelineOutput, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for point in output.aggregated.points() {
        csv_writer.serialize(Row {
            kind: "history",
            date: point.date,
            value: point.value,
            lower: None,
            upper: None,
        })?;
    }

    let intervals = output.forecast.intervals();
    for (i, point) in output.forecast.points().iter().enumerate() {
        let bound = intervals.and_then(|bounds| bounds.get(i));
        csv_writer.serialize(Row {
            kind: "forecast",
            date: point.date,
            value: point.value,
            lower: bound.map(|b| b.lower),
            upper: bound.map(|b| b.upper),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
