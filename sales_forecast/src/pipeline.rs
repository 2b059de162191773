//! Aggregate, forecast and summarize in one pass
//!
//! Invalid input stops the run at the first stage that sees it. A model that
//! cannot be fitted does not: the output is complete, with a degraded forecast.

use crate::aggregate::Aggregator;
use crate::config::PipelineConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastEngine, ForecastResult};
use crate::granularity::Granularity;
use crate::trend::{Summary, TrendAnalyzer};
use serde::Serialize;

/// Everything produced by one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub granularity: Granularity,
    pub aggregated: TimeSeries,
    pub forecast: ForecastResult,
    pub summary: Summary,
}

/// Aggregator, engine and analyzer wired together
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    aggregator: Aggregator,
    engine: ForecastEngine,
    analyzer: TrendAnalyzer,
}

impl Pipeline {
    /// Build a pipeline from validated settings
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        let engine = ForecastEngine::new(config.model_kind()?)
            .with_optimizer(config.optimizer_options())
            .with_confidence_level(config.confidence_level)?;

        Ok(Self {
            aggregator: Aggregator::new(),
            engine,
            analyzer: TrendAnalyzer::new(),
        })
    }

    pub fn engine(&self) -> &ForecastEngine {
        &self.engine
    }

    /// Run all stages on a raw series
    pub fn run(&self, series: TimeSeries, granularity: Granularity) -> Result<PipelineOutput> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Sales series is empty".to_string(),
            ));
        }

        let aggregation = self.aggregator.aggregate(series, granularity)?;
        let forecast = self.engine.forecast(&aggregation, aggregation.horizon())?;
        let summary = self.analyzer.summarize(aggregation.series(), &forecast)?;

        tracing::info!(
            %granularity,
            periods = aggregation.series().len(),
            horizon = forecast.horizon(),
            degraded = forecast.is_degraded(),
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            granularity,
            aggregated: aggregation.into_series(),
            forecast,
            summary,
        })
    }

    /// Run with a granularity token such as `"Weekly"`
    pub fn run_token(&self, series: TimeSeries, granularity: &str) -> Result<PipelineOutput> {
        self.run(series, granularity.parse()?)
    }
}

/// Run a default pipeline
pub fn run(series: TimeSeries, granularity: Granularity) -> Result<PipelineOutput> {
    Pipeline::default().run(series, granularity)
}
