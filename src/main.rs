//! CLI entry point for the surf report tool.
//!
//! Provides subcommands for building today's AM/PM surf summaries from the
//! live providers, listing matching spots, and re-summarizing saved inputs.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use surf_report::{
    config::ProviderConfig,
    fetch::BasicClient,
    infra::{NwsClient, SpitcastClient},
    output::{print_json, print_pretty, write_json},
    pipeline::{DayBuckets, SpotInputs, build_buckets, fetch_inputs, fetch_outlook},
    processing::{ZonePolicy, filter_spots},
    services::SurfForecastApi,
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "surf_report")]
#[command(about = "Daily AM/PM surf and wind summaries for a set of spots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's forecasts and weather and write AM/PM summaries
    Report {
        /// Location keyword matched against spot location codes (e.g. "newport")
        #[arg(short, long, env = "SURF_LOCATION", default_value = "newport")]
        location: String,

        /// Directory to write summary JSON files to
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,

        /// Timezone for "today": utc, local or a fixed offset such as -08:00
        #[arg(short, long, env = "SURF_ZONE", default_value = "local")]
        zone: ZonePolicy,

        /// Also write the fetched inputs and the bucketed records
        #[arg(long, default_value_t = false)]
        dump_records: bool,
    },
    /// List spots whose location code matches a keyword
    Spots {
        /// Location keyword matched against spot location codes
        #[arg(short, long, env = "SURF_LOCATION", default_value = "newport")]
        location: String,
    },
    /// Fetch the 7-day weather outlook for spots matching a keyword
    Outlook {
        /// Location keyword matched against spot location codes
        #[arg(short, long, env = "SURF_LOCATION", default_value = "newport")]
        location: String,

        /// Directory to write outlook.json to
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,
    },
    /// Summarize a previously dumped spot_inputs.json without network access
    Summarize {
        /// Path to a spot_inputs.json file written by `report --dump-records`
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to write summary JSON files to
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,

        /// Timezone for "today": utc, local or a fixed offset such as -08:00
        #[arg(short, long, env = "SURF_ZONE", default_value = "local")]
        zone: ZonePolicy,

        /// Date to summarize (YYYY-MM-DD); defaults to today in --zone
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/surf_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("surf_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = ProviderConfig::from_env();

    match cli.command {
        Commands::Report {
            location,
            output_dir,
            zone,
            dump_records,
        } => {
            let today = zone.today();
            let forecast_api = SpitcastClient::new(BasicClient::new(&config)?, config.clone());
            let weather_api = NwsClient::new(BasicClient::new(&config)?, config.clone());

            let inputs = fetch_inputs(&forecast_api, &weather_api, &location, today).await?;
            if inputs.is_empty() {
                warn!(location = %location, "No spot forecasts fetched");
            }

            if dump_records {
                let path = write_json(&output_dir, "spot_inputs", &inputs)?;
                info!(path = %path.display(), "Spot inputs saved");
            }

            let buckets = build_buckets(&inputs, today, zone);
            write_report(&output_dir, &buckets, dump_records)?;
        }
        Commands::Spots { location } => {
            let forecast_api = SpitcastClient::new(BasicClient::new(&config)?, config.clone());
            let spots = forecast_api.list_spots().await?;
            let matched = filter_spots(&spots, &location);

            for spot in &matched {
                let position = spot.position();
                info!(
                    spot_id = spot.spot_id,
                    spot_name = %spot.spot_name,
                    location_code = %spot.location_code,
                    latitude = position.map(|p| p.latitude),
                    longitude = position.map(|p| p.longitude),
                    "Spot"
                );
            }

            info!(
                total = spots.len(),
                matched = matched.len(),
                location = %location,
                "Spot list summary"
            );
        }
        Commands::Outlook {
            location,
            output_dir,
        } => {
            let forecast_api = SpitcastClient::new(BasicClient::new(&config)?, config.clone());
            let weather_api = NwsClient::new(BasicClient::new(&config)?, config.clone());

            let outlooks = fetch_outlook(&forecast_api, &weather_api, &location).await?;
            for outlook in &outlooks {
                for period in &outlook.periods {
                    info!(
                        spot_id = outlook.spot.spot_id,
                        period = %period.name,
                        temperature = period.temperature,
                        wind_speed = %period.wind_speed,
                        wind_direction = %period.wind_direction,
                        forecast = %period.short_forecast,
                        "Outlook"
                    );
                }
            }

            let path = write_json(&output_dir, "outlook", &outlooks)?;
            info!(spots = outlooks.len(), path = %path.display(), "Outlook written");
        }
        Commands::Summarize {
            input,
            output_dir,
            zone,
            date,
        } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let inputs: Vec<SpotInputs> = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to decode {}", input.display()))?;
            let date = date.unwrap_or_else(|| zone.today());

            info!(spots = inputs.len(), date = %date, "Summarizing saved inputs");

            let buckets = build_buckets(&inputs, date, zone);
            write_report(&output_dir, &buckets, false)?;
        }
    }

    Ok(())
}

/// Summarizes the buckets and writes `am_summary.json` / `pm_summary.json`,
/// plus the raw bucket records when `dump_records` is set.
fn write_report(output_dir: &Path, buckets: &DayBuckets, dump_records: bool) -> Result<()> {
    if dump_records {
        write_json(output_dir, "am_records", &buckets.am)?;
        write_json(output_dir, "pm_records", &buckets.pm)?;
    }

    let report = buckets.summarize();
    print_pretty(&report);
    print_json(&report)?;

    let am_path = write_json(output_dir, "am_summary", &report.am)?;
    let pm_path = write_json(output_dir, "pm_summary", &report.pm)?;

    info!(
        am_spots = report.am.len(),
        pm_spots = report.pm.len(),
        am_path = %am_path.display(),
        pm_path = %pm_path.display(),
        "Summaries written"
    );
    Ok(())
}
