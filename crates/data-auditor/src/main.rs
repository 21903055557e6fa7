//! CLI entry point for the data quality auditor.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use data_auditor::{AuditConfig, AuditReport, Auditor, DataLoader, ReportWriter, Severity};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Anomalous rows shown in the human-readable summary.
const ANOMALY_PREVIEW_ROWS: usize = 20;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data Quality Auditor",
    long_about = "Audits a CSV or Excel dataset: per-column profiling, Isolation Forest \
                  anomaly detection, a 0-100 health score and a list of issues.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable audit\n  \
                  data-auditor -i data.csv\n\n  \
                  # Machine-readable report on stdout\n  \
                  data-auditor -i data.xlsx --json | jq .health_score\n\n  \
                  # Save the report next to other outputs\n  \
                  data-auditor -i data.csv -r reports/"
)]
struct Args {
    /// Path to the .csv, .xlsx or .xls file to audit
    #[arg(short, long)]
    input: String,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logs; only the final JSON report is written.
    #[arg(long)]
    json: bool,

    /// Write the JSON report into this directory as <input_name>_audit.json
    #[arg(short = 'r', long, value_name = "DIR")]
    emit_report: Option<PathBuf>,

    /// Number of raw rows to preview
    #[arg(long, default_value = "50")]
    preview: usize,

    /// Expected fraction of anomalous rows (0.0 - 0.5]
    #[arg(long, default_value = "0.05")]
    contamination: f64,

    /// Seed for the anomaly detector
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the summary)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = AuditConfig::builder()
        .contamination(args.contamination)
        .seed(args.seed)
        .build()?;
    let auditor = Auditor::builder().config(config).build()?;

    let data = DataLoader::load_path(input)
        .with_context(|| format!("Could not load {}", args.input))?;
    let report = auditor.audit_named(&display_name(input), &data)?;

    if args.json {
        println!("{}", report.to_json_pretty()?);
        return Ok(());
    }

    if let Some(ref output_dir) = args.emit_report {
        let report_path = ReportWriter::new(output_dir).write_report(&report, &file_stem(input))?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &data, args.preview)?;

    Ok(())
}

/// File name without its directory, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string)
}

/// Extract the file stem (name without extension) from a path.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print the audit for a terminal.
///
/// Uses `println!` on purpose: this is the command's primary output and must
/// stay visible regardless of the log level.
fn print_human_readable_summary(report: &AuditReport, data: &DataFrame, preview: usize) -> Result<()> {
    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY AUDIT: {}", report.source);
    println!("{}", "=".repeat(80));
    println!();

    println!("  Health Score:       {} / 100", report.health_score);
    println!("  Total Rows:         {}", report.row_count);
    println!("  Total Columns:      {}", report.column_count);
    println!("  Anomalies Detected: {}", report.anomalies.count());
    println!();
    println!(
        "{} - Score: {}/100",
        report.health_band.headline(),
        report.health_score
    );
    println!();

    print_issues(report);
    print_column_profiles(report);
    print_null_chart(report);

    if !report.anomalies.is_empty() {
        println!("ANOMALOUS ROWS");
        println!("{}", "-".repeat(40));
        println!(
            "Showing first {} of {} anomalous rows detected by Isolation Forest",
            report.anomalies.count().min(ANOMALY_PREVIEW_ROWS),
            report.anomalies.count()
        );
        let positions: Vec<IdxSize> = report
            .anomalies
            .indices()
            .iter()
            .take(ANOMALY_PREVIEW_ROWS)
            .map(|&idx| idx as IdxSize)
            .collect();
        let idx = IdxCa::from_vec("idx".into(), positions);
        println!("{}", data.take(&idx)?);
        println!();
    }

    if preview > 0 {
        println!("RAW DATA PREVIEW");
        println!("{}", "-".repeat(40));
        println!("{}", data.head(Some(preview)));
        println!();
    }

    Ok(())
}

fn print_issues(report: &AuditReport) {
    println!("ISSUES FOUND");
    println!("{}", "-".repeat(40));

    if report.issues.is_empty() {
        println!("  No issues found!");
        println!();
        return;
    }

    println!("{:<10} {:<24} {}", "Severity", "Column", "Issue");
    println!("{}", "-".repeat(80));
    for issue in &report.issues {
        let marker = match issue.severity {
            Severity::Critical => "!!",
            Severity::Warning => "! ",
            Severity::Info => "  ",
        };
        println!(
            "{}{:<8} {:<24} {}",
            marker,
            issue.severity.as_str(),
            truncate_str(issue.subject.as_str(), 23),
            issue.message
        );
    }
    println!();
}

fn print_column_profiles(report: &AuditReport) {
    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<10} {:>7} {:>7} {:>9} {:>8} {:>9} {:>10} {:>10} {:>10}",
        "Column", "Type", "Total", "Nulls", "Null %", "Unique", "Unique %", "Mean", "Median", "Std"
    );
    println!("{}", "-".repeat(108));

    for col in &report.profile {
        let (mean, median, std) = match &col.numeric {
            Some(stats) => (
                stats.mean.to_string(),
                stats.median.to_string(),
                stats.std.map_or_else(|| "-".to_string(), |s| s.to_string()),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        println!(
            "{:<20} {:<10} {:>7} {:>7} {:>9} {:>8} {:>9} {:>10} {:>10} {:>10}",
            truncate_str(&col.name, 19),
            truncate_str(&col.dtype, 10),
            col.total,
            col.nulls,
            col.null_pct,
            col.unique,
            col.unique_pct,
            mean,
            median,
            std
        );
    }
    println!();
}

/// Horizontal bars of the null percentage for columns that have nulls.
fn print_null_chart(report: &AuditReport) {
    const BAR_WIDTH: f64 = 40.0;

    println!("NULL VALUES BY COLUMN");
    println!("{}", "-".repeat(40));

    let with_nulls: Vec<_> = report.profile.iter().filter(|col| col.null_pct > 0.0).collect();
    if with_nulls.is_empty() {
        println!("  No null values found in any column!");
        println!();
        return;
    }

    for col in with_nulls {
        let filled = ((col.null_pct / 100.0) * BAR_WIDTH).round().max(1.0) as usize;
        println!(
            "  {:<20} {:<40} {:>6}%",
            truncate_str(&col.name, 19),
            "#".repeat(filled),
            col.null_pct
        );
    }
    println!();
}

/// Truncate a string to a maximum display width, adding an ellipsis.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
