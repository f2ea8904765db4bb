//! CLI entry point for the EV fleet trend and residual value tools.
//!
//! Provides subcommands for analyzing quarterly licensing data, generating a
//! synthetic used-listings dataset, and fitting residual value forecasts.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use ev_fleet_rv::rv::ingest::DEFAULT_REFERENCE_YEAR;
use ev_fleet_rv::synth::{DEFAULT_LISTINGS_PER_MODEL, DEFAULT_SEED};
use ev_fleet_rv::{output, rv, synth, trends};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ev_fleet_rv")]
#[command(about = "EV fleet trend and residual value analysis tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze quarterly licensing counts by fuel and keepership
    Trends {
        /// Path to the wide-format licensing CSV (e.g. df_VEH0145)
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Directory to write the time series, chart, and report to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Generate a synthetic used-EV listings dataset
    GenListings {
        /// Output CSV path
        #[arg(short, long, default_value = "data/ev_used_listings.csv")]
        out: PathBuf,

        /// Listings to draw per catalog model
        #[arg(short = 'n', long, default_value_t = DEFAULT_LISTINGS_PER_MODEL)]
        per_model: usize,

        /// RNG seed; identical seeds produce identical files
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Fit depreciation curves and project residual values
    Rv {
        /// Path to a listings CSV with Make,Model,Year,Mileage,AskingPrice
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Directory to write the forecasts, chart, and report to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Year used to derive vehicle age from model year
        #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
        reference_year: i32,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ev_fleet_rv.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ev_fleet_rv.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Trends { input, output_dir } => {
            let summary = trends::pipeline::run(&input, &output_dir)?;
            info!(
                rows = summary.rows.len(),
                first = %summary.first_period,
                latest = %summary.latest_period,
                "Trend pipeline complete"
            );
            output::print_json(&summary.growth)?;
        }
        Commands::GenListings {
            out,
            per_model,
            seed,
        } => {
            let rows = synth::generate(per_model, seed)?;
            synth::write_listings(&out, &rows)?;
            info!(path = %out.display(), rows = rows.len(), seed, "Synthetic listings written");
        }
        Commands::Rv {
            input,
            output_dir,
            reference_year,
        } => {
            let outcome = rv::pipeline::run(&input, &output_dir, reference_year)?;
            info!(
                groups_seen = outcome.groups_seen,
                groups_fitted = outcome.forecasts.len(),
                "Residual value pipeline complete"
            );
            output::print_json(&rv::types::RvRunSummary {
                generated_at: chrono::Utc::now(),
                input: input.display().to_string(),
                groups_seen: outcome.groups_seen,
                groups_fitted: outcome.forecasts.len(),
            })?;
        }
    }

    Ok(())
}
