//! CLI entry point for the review_pulse tool.
//!
//! Provides subcommands for analyzing a review CSV export into quarterly and
//! yearly reputation metrics, and for inspecting how a file would be
//! interpreted before committing to an analysis.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use review_pulse::analytics::aggregate::aggregate;
use review_pulse::analytics::insight::build_insight_context;
use review_pulse::output::{HistoryRecord, append_history, write_json};
use review_pulse::parser::columns::resolve_columns;
use review_pulse::parser::delimiter::{SAMPLE_LEN, describe, detect_delimiter};
use review_pulse::parser::records::parse_reviews;
use review_pulse::parser::tokenizer::tokenize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "review_pulse")]
#[command(about = "A tool to turn review CSV exports into reputation metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a review export for one reporting period
    Analyze {
        /// Path to the CSV export
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Client label stamped into the result
        #[arg(short, long, default_value = "Client Name")]
        client: String,

        /// Reporting year; defaults to the year of the most recent review
        #[arg(short, long)]
        year: Option<i32>,

        /// Reporting quarter (1-4); defaults to the quarter of the most recent review
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=4))]
        quarter: Option<u32>,

        /// JSON file to write the analytics result to
        #[arg(short, long, default_value = "analytics.json")]
        output: String,

        /// Optional JSON file for the narrative-insight context
        #[arg(long)]
        insight_out: Option<String>,

        /// Optional CSV history log to append a metrics snapshot to
        #[arg(long)]
        history: Option<String>,
    },
    /// Report the detected delimiter and column mapping without analyzing
    Inspect {
        /// Path to the CSV export
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/review_pulse.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("review_pulse.log"));

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
        Commands::Analyze {
            file,
            client,
            year,
            quarter,
            output,
            insight_out,
            history,
        } => run_analyze(
            &file,
            &client,
            year,
            quarter,
            &output,
            insight_out.as_deref(),
            history.as_deref(),
        ),
        Commands::Inspect { file } => run_inspect(&file),
    }
}

fn run_analyze(
    file: &Path,
    client: &str,
    year: Option<i32>,
    quarter: Option<u32>,
    output: &str,
    insight_out: Option<&str>,
    history: Option<&str>,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let reviews = parse_reviews(&text)?;
    info!(reviews = reviews.len(), "Export parsed");

    let result = aggregate(&reviews, client, year, quarter)?;
    info!(
        client = %result.client_name,
        year = result.year,
        quarter = result.quarter,
        all_time_total = result.metrics.all_time_total,
        ytd_total = result.metrics.ytd_total,
        ytd_average = result.metrics.ytd_average,
        quarter_total = result.metrics.quarter_total,
        quarter_average = result.metrics.quarter_average,
        reviews_to_improve = result.metrics.reviews_to_improve,
        "Analysis complete"
    );

    write_json(output, &result)?;
    info!(path = output, "Analytics written");

    if let Some(path) = insight_out {
        let context = build_insight_context(&reviews, client, result.year, result.quarter);
        write_json(path, &context)?;
        info!(
            path,
            current = context.current_reviews.len(),
            previous = context.previous_reviews.len(),
            "Insight context written"
        );
    }

    if let Some(path) = history {
        append_history(path, &HistoryRecord::from(&result))?;
        info!(path, "History appended");
    }

    Ok(())
}

/// Dry run of the parsing front end: shows what the heuristics decided so a
/// rejected or oddly bucketed file can be diagnosed before re-export.
fn run_inspect(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let content = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let sample: String = content.chars().take(SAMPLE_LEN).collect();
    let delimiter = detect_delimiter(&sample);
    let rows = tokenize(content, delimiter);
    info!(
        delimiter = describe(delimiter),
        rows = rows.len(),
        "Export tokenized"
    );

    if rows.is_empty() {
        warn!("File appears to be empty.");
        return Ok(());
    }

    match resolve_columns(&rows) {
        Ok(map) => {
            let column = |index: Option<usize>| {
                index
                    .and_then(|i| map.headers.get(i).cloned())
                    .unwrap_or_else(|| "(none)".to_string())
            };
            info!(
                header_row = map.header_row,
                date = %map.headers[map.date],
                rating = %map.headers[map.rating],
                text = %column(map.text),
                reviewer = %column(map.reviewer),
                "Columns resolved"
            );
            info!(
                data_rows = rows.len() - map.header_row - 1,
                "Rows below header"
            );
        }
        Err(e) => warn!(error = %e, "Column resolution failed"),
    }

    Ok(())
}
