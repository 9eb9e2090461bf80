//! CLI entry point for the SUS bed occupancy dashboard core.
//!
//! Provides subcommands for producing the initial render, re-rendering a
//! slider range, listing the period index, and exporting the monthly table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use sus_occupancy::Dashboard;
use sus_occupancy::loader::DEFAULT_DATA_PATH;
use sus_occupancy::output::{export_table_csv, write_json};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sus_occupancy")]
#[command(about = "Hospital bed occupancy aggregates for the e-SUS dashboard", long_about = None)]
struct Cli {
    /// Path to the occupancy CSV (defaults to $DATA_PATH, then the bundled location)
    #[arg(short, long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce the initial page render (map, table, slider) as JSON
    Render {
        /// File to write JSON to; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-render the map and table for a slider range
    Refresh {
        /// First slider position
        #[arg(long)]
        from: usize,

        /// Last slider position
        #[arg(long)]
        to: usize,

        /// File to write JSON to; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List slider positions and their month labels
    Periods,
    /// Export every monthly row in a slider range as CSV
    Export {
        /// First slider position
        #[arg(long)]
        from: usize,

        /// Last slider position
        #[arg(long)]
        to: usize,

        /// CSV file to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sus_occupancy.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sus_occupancy.log"));

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

    let data_path = cli
        .data
        .or_else(|| std::env::var("DATA_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let dashboard = Dashboard::load(&data_path)?;

    match cli.command {
        Commands::Render { output } => {
            let render = dashboard.initial_render();
            info!(
                markers = render.map.markers.len(),
                table_rows = render.table.rows.len(),
                periods = render.periods.len(),
                "Initial render ready"
            );
            write_json(output.as_deref(), &render)?;
        }
        Commands::Refresh { from, to, output } => {
            let render = dashboard.refresh([from, to]);
            if render.table.is_empty() {
                warn!(from, to, "Range selects no data");
            }
            info!(
                from,
                to,
                markers = render.map.markers.len(),
                table_rows = render.table.rows.len(),
                "Refresh ready"
            );
            write_json(output.as_deref(), &render)?;
        }
        Commands::Periods => {
            let periods = dashboard.periods();
            info!(total = periods.len(), "Period index");

            for (position, label) in periods.iter() {
                info!(position, label = %label, "Period");
            }
        }
        Commands::Export { from, to, output } => {
            let selection = dashboard.select([from, to]);
            let written = export_table_csv(&output, &selection.rows)?;
            info!(
                from,
                to,
                rows = written,
                path = %output.display(),
                "Table exported"
            );
        }
    }

    Ok(())
}
