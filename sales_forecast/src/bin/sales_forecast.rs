//! Command-line front end: forecast one category of a sales CSV

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sales_forecast::data::DEFAULT_DATE_COLUMN;
use sales_forecast::{report, DataLoader, ForecastError, Granularity, Pipeline, PipelineConfig};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "sales-forecast", version, about = "Aggregate, forecast and summarize category sales")]
struct Cli {
    /// Sales CSV with a date column and one column per category
    #[arg(short, long)]
    input: PathBuf,

    /// Category column to forecast
    #[arg(short, long, required_unless_present = "list_categories")]
    category: Option<String>,

    /// Aggregation granularity: daily, weekly or monthly
    #[arg(short, long, default_value = "daily")]
    granularity: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Header of the date column
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    date_column: String,

    /// Print the category columns and exit
    #[arg(long)]
    list_categories: bool,
}

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("--category is required")]
    MissingCategory,
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCategory => 2,
            Self::Forecast(error) if error.is_invalid_input() => 2,
            Self::Forecast(ForecastError::UnsupportedModel(_)) => 3,
            Self::Forecast(ForecastError::ConfigError(_) | ForecastError::JsonError(_)) => 4,
            Self::Forecast(_) => 10,
        }
    }
}

fn main() {
    init_tracing();

    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let table = DataLoader::from_csv_with_date_column(&cli.input, &cli.date_column)?;

    if cli.list_categories {
        for category in table.categories() {
            println!("{category}");
        }
        return Ok(());
    }

    let category = cli.category.as_deref().ok_or(CliError::MissingCategory)?;
    let granularity: Granularity = cli.granularity.parse()?;

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(&config)?;

    let series = table.series(category)?;
    let output = pipeline.run(series, granularity)?;

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&output, category)),
        OutputFormat::Json => println!("{}", report::to_json(&output)?),
        OutputFormat::Csv => report::write_csv(&output, io::stdout().lock())?,
    }

    Ok(())
}
