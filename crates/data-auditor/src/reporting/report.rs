use crate::error::{Result, ResultExt};
use crate::types::{AnomalyResult, DatasetProfile, HealthBand, Issue};
use crate::utils::round2;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Audit Report
// ============================================================================

/// Everything an audit produced, in one serializable bundle.
///
/// Used for both JSON output (`--json`) and the report file
/// (`--emit-report`).
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Local time the report was generated
    pub generated_at: String,
    /// Name of the audited file, or a label for in-memory tables
    pub source: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Health score in 0-100
    pub health_score: u8,
    pub health_band: HealthBand,
    /// Anomalous rows as a percentage of all rows (two decimals)
    pub anomaly_pct: f64,
    pub profile: DatasetProfile,
    pub anomalies: AnomalyResult,
    pub issues: Vec<Issue>,
}

impl AuditReport {
    pub fn new(
        source: impl Into<String>,
        profile: DatasetProfile,
        anomalies: AnomalyResult,
        health_score: u8,
        issues: Vec<Issue>,
    ) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.into(),
            row_count: profile.row_count,
            column_count: profile.column_count,
            health_score,
            health_band: HealthBand::from_score(health_score),
            anomaly_pct: round2(anomalies.anomaly_pct(profile.row_count)),
            profile,
            anomalies,
            issues,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Report Writer
// ============================================================================

/// Writes audit reports as JSON files into a directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `<stem>_audit.json`, creating the directory if needed.
    pub fn write_report(&self, report: &AuditReport, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create {}", self.output_dir.display()))?;

        let report_path = self.output_dir.join(format!("{stem}_audit.json"));
        let mut file = File::create(&report_path)
            .context(format!("Failed to create {}", report_path.display()))?;
        file.write_all(report.to_json_pretty()?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
