//! CLI entry point for the panel aggregator.
//!
//! Combines a directory of per-period panel files into a single file
//! covering the whole span, averaging each panelist's weight.

use anyhow::Result;
use clap::Parser;
use panel_aggregator::aggregate::aggregator::aggregate_periods;
use panel_aggregator::aggregate::types::RunSummary;
use panel_aggregator::config::AggregateConfig;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "panel_aggregator")]
#[command(about = "Combine per-period panel files into a single averaged panel", long_about = None)]
struct Cli {
    /// Name of the panel type being aggregated
    #[arg(long)]
    panel: String,

    /// Directory of period files
    #[arg(long = "files", value_name = "DIR")]
    files_dir: PathBuf,

    /// Field separator for input and output: a single character, '\t' or 'tab'
    #[arg(long, default_value = "\t")]
    sep: String,

    /// Output file
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/panel_aggregator.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("panel_aggregator.log"));

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
    let config = AggregateConfig::new(cli.panel, cli.files_dir, &cli.sep, cli.output)?;

    match aggregate_periods(&config) {
        Ok(summary) => print_summary(&summary)?,
        Err(e) => {
            error!(error = %e, "Aggregation failed");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Logs the run summary as pretty-printed JSON.
fn print_summary(summary: &RunSummary) -> Result<()> {
    info!(
        panel = %summary.panel,
        periods = summary.periods,
        panelists = summary.panelists,
        "Aggregation complete"
    );
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
