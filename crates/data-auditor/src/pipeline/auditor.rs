//! The `Auditor` and its builder.

use crate::config::{AuditConfig, ConfigValidationError};
use crate::detector::{AnomalyDetector, OutlierDetector};
use crate::error::Result;
use crate::loader::DataLoader;
use crate::profiler::DataProfiler;
use crate::reporting::{AuditReport, IssueReporter};
use crate::scoring::HealthScorer;
use polars::prelude::*;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Source label used for tables audited straight from memory.
const IN_MEMORY_SOURCE: &str = "<dataframe>";

/// Runs profile, detect, score and report over a table.
///
/// Use [`Auditor::builder()`] to override the configuration or plug in a
/// different outlier model.
///
/// # Example
///
/// ```rust,ignore
/// use data_auditor::{AuditConfig, Auditor};
///
/// let auditor = Auditor::builder()
///     .config(AuditConfig::builder().contamination(0.1).build()?)
///     .build()?;
///
/// let report = auditor.audit_file("data/sales.csv")?;
/// println!("Health score: {}/100", report.health_score);
/// ```
pub struct Auditor {
    config: AuditConfig,
    detector: AnomalyDetector,
}

static_assertions::assert_impl_all!(Auditor: Send, Sync);

impl Auditor {
    /// Create a new auditor builder.
    pub fn builder() -> AuditorBuilder {
        AuditorBuilder::default()
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit a table already in memory.
    pub fn audit(&self, df: &DataFrame) -> Result<AuditReport> {
        self.audit_named(IN_MEMORY_SOURCE, df)
    }

    /// Load a `.csv`, `.xlsx` or `.xls` file and audit it.
    pub fn audit_file(&self, path: impl AsRef<Path>) -> Result<AuditReport> {
        let path = path.as_ref();
        let df = DataLoader::load_path(path)?;
        let source = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        self.audit_named(&source, &df)
    }

    /// Load a table from a byte stream whose format is given by `name`.
    pub fn audit_reader<R: Read>(&self, name: &str, reader: R) -> Result<AuditReport> {
        let df = DataLoader::load_reader(name, reader)?;
        self.audit_named(name, &df)
    }

    /// Audit a table, labelling the report with `source`.
    pub fn audit_named(&self, source: &str, df: &DataFrame) -> Result<AuditReport> {
        info!("Starting audit of {} ({} rows x {} columns)", source, df.height(), df.width());

        info!("Step 1: Profiling dataset...");
        let profile = DataProfiler::profile_dataset(df)?;

        info!("Step 2: Detecting anomalies with {}...", self.detector.model_name());
        let anomalies = self.detector.detect(df)?;
        info!(
            "Flagged {} anomalous rows out of {} candidates",
            anomalies.count(),
            anomalies.candidate_rows()
        );

        info!("Step 3: Scoring dataset health...");
        let total_rows = df.height();
        let health_score =
            HealthScorer::score(&profile, anomalies.count(), total_rows, &self.config.scoring);

        info!("Step 4: Extracting issues...");
        let issues = IssueReporter::extract_issues(
            &profile,
            anomalies.count(),
            total_rows,
            &self.config.issues,
        );

        info!("Audit complete: score {}/100, {} issues", health_score, issues.len());
        Ok(AuditReport::new(source, profile, anomalies, health_score, issues))
    }
}

/// Builder for [`Auditor`].
#[derive(Default)]
pub struct AuditorBuilder {
    config: Option<AuditConfig>,
    detector: Option<Box<dyn OutlierDetector>>,
}

static_assertions::assert_impl_all!(AuditorBuilder: Send);

impl AuditorBuilder {
    /// Set the audit configuration.
    pub fn config(mut self, config: AuditConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default isolation forest with another outlier model.
    pub fn detector(mut self, detector: Box<dyn OutlierDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Validate the configuration and build the auditor.
    pub fn build(self) -> std::result::Result<Auditor, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let detector = match self.detector {
            Some(model) => AnomalyDetector::new(model),
            None => AnomalyDetector::from_config(&config.detector),
        };

        Ok(Auditor { config, detector })
    }
}
