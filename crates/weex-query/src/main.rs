//! weexq - compute one aggregate over the WeeWX archive
//!
//! Connects to the archive database, runs a single aggregate request
//! through the dispatcher and prints the resulting measurement.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use weex_aggregate::{AggregateDispatcher, AggregateOptions};
use weex_core::{AggregateType, Measurement, TimeSpan, Unit};
use weex_db::DbClient;
use weewx_config::AppConfig;

use crate::config::{parse_bound, temperature, QueryConfig};

#[derive(Parser)]
#[command(name = "weexq")]
#[command(about = "Compute an aggregate of an archived observation over a time span", long_about = None)]
struct Cli {
    /// Database connection string (overrides [database] url)
    #[arg(long, env)]
    database_url: Option<String>,

    /// Observation field, e.g. outTemp, wind or heatdeg
    #[arg(long)]
    field: String,

    /// Aggregate type, e.g. avg, max, vecdir, min_ge
    #[arg(long, short = 'a')]
    aggregate: String,

    /// Span start (exclusive): epoch seconds or YYYY-MM-DD
    #[arg(long)]
    start: String,

    /// Span stop (inclusive): epoch seconds or YYYY-MM-DD
    #[arg(long)]
    stop: String,

    /// Threshold of the *_ge / *_le aggregates
    #[arg(long)]
    threshold: Option<f64>,

    /// Unit of the threshold; defaults to the field's unit
    #[arg(long, requires = "threshold")]
    threshold_unit: Option<String>,

    /// Degree-day base temperature
    #[arg(long)]
    base: Option<f64>,

    /// Unit of the base temperature
    #[arg(long, default_value = "degree_F")]
    base_unit: String,

    /// Print the measurement as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    weewx_obs::init("weexq");
    let cli = Cli::parse();

    let app = AppConfig::load().context("Failed to load configuration")?;
    let config = QueryConfig::resolve(&app, cli.database_url.clone())?;

    let kind: AggregateType = cli.aggregate.parse()?;
    let span = TimeSpan::new(
        parse_bound(&cli.start, &config.calendar)?,
        parse_bound(&cli.stop, &config.calendar)?,
    )?;

    let db_client = DbClient::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let mut options = AggregateOptions::new();
    if let Some(base) = cli.base {
        options = options.with_degree_day_base(temperature(base, &cli.base_unit)?);
    }
    if let Some(value) = cli.threshold {
        options = options.with_threshold(threshold(&cli, &db_client, value)?);
    }

    let dispatcher = AggregateDispatcher::new(config.calendar, config.bases);
    let result = dispatcher
        .get_aggregate(&cli.field, &span, kind, &db_client, &options)
        .await;
    db_client.close().await;
    let measurement = result.with_context(|| format!("{kind} of {} over {span}", cli.field))?;

    if cli.json {
        println!("{}", serde_json::to_string(&measurement)?);
    } else {
        println!("{measurement}");
    }
    Ok(())
}

/// The threshold in its given unit, or in the unit the archive keeps the
/// field in
fn threshold(cli: &Cli, db_client: &DbClient, value: f64) -> Result<Measurement> {
    let unit = match &cli.threshold_unit {
        Some(name) => name.parse::<Unit>()?,
        None => {
            let group = weex_core::ObsField::parse(&cli.field)
                .unit_group()
                .with_context(|| format!("No unit known for {}", cli.field))?;
            db_client.unit_system().unit_for(group)
        }
    };
    Ok(Measurement::of(value, unit))
}
