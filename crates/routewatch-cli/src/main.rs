//! routewatch CLI - Delivery Route Status Workbook Transform
//!
//! Thin launcher around the transform pipeline: load the uploaded workbook,
//! resolve columns, normalize rows, aggregate, evaluate the clock windows,
//! and write the derived six-sheet report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use routewatch_analysis::{aggregate, evaluate_window};
use routewatch_core::config::{window_rules, ColumnLayout, WindowRule, EASTERN};
use routewatch_core::{RunMeta, WindowCheckResult};
use routewatch_ingest::{load_table, normalize_rows, resolve_columns};
use routewatch_report::{ExcelReport, ReportInput};

#[derive(Parser)]
#[command(name = "routewatch")]
#[command(author, version, about = "Delivery route status workbook transform", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a workbook, resolve its columns, and report row counts
    Check {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit the check result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the full transform and write the derived report workbook
    Transform {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to <input>_report.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { file, json } => run_check(&file, json),
        Commands::Transform { file, output } => run_transform(&file, output),
    }
}

#[derive(Serialize)]
struct CheckReport {
    source_file: String,
    columns: usize,
    route_column: usize,
    status_column: usize,
    timestamp_column: usize,
    flee_column: Option<usize>,
    driver_column: Option<usize>,
    total_rows: usize,
    records: usize,
    exceptions: usize,
    missing_route: usize,
    missing_status: usize,
    bad_timestamp: usize,
    routes: usize,
}

fn run_check(file: &Path, json: bool) -> Result<()> {
    let table = load_table(file).with_context(|| format!("loading {}", file.display()))?;
    let columns = resolve_columns(&ColumnLayout::default(), &table.headers)?;
    let ingestion = normalize_rows(&table, &columns);

    use routewatch_core::ExceptionReason;
    let count_reason = |reason: ExceptionReason| {
        ingestion
            .exceptions
            .iter()
            .filter(|e| e.reason == reason)
            .count()
    };

    let report = CheckReport {
        source_file: source_name(file),
        columns: table.width(),
        route_column: columns.route + 1,
        status_column: columns.status + 1,
        timestamp_column: columns.timestamp + 1,
        flee_column: columns.flee_name.map(|c| c + 1),
        driver_column: columns.driver_name.map(|c| c + 1),
        total_rows: ingestion.total_rows,
        records: ingestion.records.len(),
        exceptions: ingestion.exceptions.len(),
        missing_route: count_reason(ExceptionReason::MissingRoute),
        missing_status: count_reason(ExceptionReason::MissingStatus),
        bad_timestamp: count_reason(ExceptionReason::BadTimestamp),
        routes: routewatch_analysis::group_by_route(&ingestion.records).len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Checked: {}", file.display());
        println!(
            "  {} columns, {} data rows -> {} records, {} exceptions",
            report.columns, report.total_rows, report.records, report.exceptions
        );
        println!(
            "  exceptions: {} missing route, {} missing status, {} bad timestamp",
            report.missing_route, report.missing_status, report.bad_timestamp
        );
        println!("  {} routes", report.routes);
    }
    Ok(())
}

fn run_transform(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let table = load_table(file).with_context(|| format!("loading {}", file.display()))?;
    let columns = resolve_columns(&ColumnLayout::default(), &table.headers)?;
    let ingestion = normalize_rows(&table, &columns);

    let generated_at = Utc::now().with_timezone(&EASTERN);
    let aggregation = aggregate(&ingestion.records, generated_at);
    let windows: Vec<(WindowRule, Vec<WindowCheckResult>)> = window_rules()
        .into_iter()
        .map(|rule| {
            let results = evaluate_window(&rule, &ingestion.records);
            (rule, results)
        })
        .collect();

    let meta = RunMeta {
        generated_at,
        source_file: source_name(file),
        total_rows: ingestion.total_rows,
        record_count: ingestion.records.len(),
        exception_count: ingestion.exceptions.len(),
        route_count: aggregation.summaries.len(),
    };

    let input = ReportInput {
        monitor: &aggregation.monitor,
        summaries: &aggregation.summaries,
        status_order: &aggregation.status_order,
        exceptions: &ingestion.exceptions,
        windows: &windows,
        meta: &meta,
    };
    let bytes = ExcelReport::new().render_to_bytes(&input)?;

    let out = output.unwrap_or_else(|| default_output_path(file));
    std::fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;

    info!(output = %out.display(), "transform complete");
    println!(
        "{}: {} rows -> {} records, {} exceptions, {} routes",
        file.display(),
        meta.total_rows,
        meta.record_count,
        meta.exception_count,
        meta.route_count
    );
    println!("Report written: {}", out.display());
    Ok(())
}

fn source_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("routes");
    input.with_file_name(format!("{stem}_report.xlsx"))
}
