//! Data Quality Auditing Library
//!
//! Audits a single tabular dataset (CSV or Excel) and reports how healthy it
//! is, built with Rust and Polars.
//!
//! # Overview
//!
//! An audit runs four pure stages over one in-memory table:
//!
//! - **Profiling**: per-column null, distinct and descriptive statistics
//! - **Anomaly Detection**: multivariate outliers over the numeric columns
//!   with a seeded Isolation Forest
//! - **Health Scoring**: a 0-100 score from fixed penalty tiers
//! - **Issue Reporting**: an ordered list of Critical/Warning/Info findings
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_auditor::{AuditConfig, Auditor};
//!
//! let auditor = Auditor::builder()
//!     .config(AuditConfig::builder().contamination(0.05).seed(42).build()?)
//!     .build()?;
//!
//! let report = auditor.audit_file("data/sales.csv")?;
//!
//! println!("Health score: {}/100", report.health_score);
//! for issue in &report.issues {
//!     println!("[{}] {}: {}", issue.severity, issue.subject, issue.message);
//! }
//! ```
//!
//! # Custom Outlier Models
//!
//! The detector is pluggable through the [`OutlierDetector`] trait:
//!
//! ```rust,ignore
//! use data_auditor::{Auditor, Label, OutlierDetector};
//!
//! struct NeverAnomalous;
//!
//! impl OutlierDetector for NeverAnomalous {
//!     fn name(&self) -> &str { "never" }
//!
//!     fn fit_predict(&self, rows: &[Vec<f64>]) -> Vec<Label> {
//!         vec![Label::Normal; rows.len()]
//!     }
//! }
//!
//! let auditor = Auditor::builder().detector(Box::new(NeverAnomalous)).build()?;
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod scoring;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    AuditConfig, AuditConfigBuilder, ConfigValidationError, DetectorConfig, IssueThresholds,
    PenaltyTier, ScoringConfig,
};
pub use detector::{AnomalyDetector, FittedForest, IsolationForest, Label, OutlierDetector};
pub use error::{AuditError, Result as AuditResult, ResultExt};
pub use loader::{DataLoader, FileFormat};
pub use pipeline::{Auditor, AuditorBuilder};
pub use profiler::DataProfiler;
pub use reporting::{AuditReport, IssueReporter, ReportWriter};
pub use scoring::HealthScorer;
pub use types::{
    AnomalyResult, ColumnProfile, DatasetProfile, HealthBand, Issue, IssueSubject, NumericStats,
    Severity,
};
pub use utils::ColumnKind;
