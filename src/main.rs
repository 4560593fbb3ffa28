//! CLI entry point for the WiFi Scan Rater tool.
//!
//! Provides subcommands for analyzing a WiFi scan export, exporting map
//! markers, and merging a KML track with a scan CSV through the merge service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use wifi_scan_rater::analyzers::analyzer::analyze_source;
use wifi_scan_rater::config::Settings;
use wifi_scan_rater::fetch::BasicClient;
use wifi_scan_rater::merge::{DEFAULT_MERGED_FILE, MergeRequest, request_merge};
use wifi_scan_rater::output::{
    append_record, print_json, print_pretty, print_views, write_markers, write_report,
};

#[derive(Parser)]
#[command(name = "wifi_scan_rater")]
#[command(about = "A tool to classify and chart WiFi scan exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a scan CSV and build the chart datasets
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Write the full report as JSON to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// Log the whole report as JSON instead of one line per chart
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export one map marker per valid record
    Markers {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to write markers to
        #[arg(short, long, default_value = "markers.csv")]
        output: PathBuf,
    },
    /// Merge a KML track with a scan CSV using the remote merge service
    Merge {
        /// KML track file
        kml: PathBuf,

        /// Scan CSV file
        csv: PathBuf,

        /// Where to save the merged file
        #[arg(short, long, default_value = DEFAULT_MERGED_FILE)]
        output: PathBuf,

        /// Merge service URL (overrides MERGE_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("wifi_scan_rater.log"));

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
    let client = BasicClient::with_timeout(settings.http_timeout)?;

    match cli.command {
        Commands::Analyze {
            source,
            report,
            summary,
            json,
        } => {
            let (_scan, scan_report) = analyze_source(&client, &source).await?;

            print_pretty(&scan_report);
            if json {
                print_json(&scan_report)?;
            } else {
                print_views(&scan_report);
            }

            if let Some(path) = report {
                write_report(&path, &scan_report)?;
            }
            if let Some(path) = summary {
                append_record(&path, &scan_report.summary())?;
            }
        }
        Commands::Markers { source, output } => {
            let (scan, _report) = analyze_source(&client, &source).await?;
            write_markers(&output, &scan.records)?;
        }
        Commands::Merge {
            kml,
            csv,
            output,
            endpoint,
        } => {
            let endpoint = endpoint.unwrap_or(settings.merge_endpoint);
            let request = MergeRequest::new(kml, csv);

            let merged = request_merge(&client, &endpoint, &request).await?;
            tokio::fs::write(&output, &merged).await?;

            info!(path = %output.display(), bytes = merged.len(), "Merged file saved");
        }
    }

    Ok(())
}
