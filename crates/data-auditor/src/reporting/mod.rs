//! Issue extraction and audit reports.
//!
//! [`IssueReporter`] turns the profile and anomaly count into an ordered
//! list of [`Issue`](crate::types::Issue)s. [`AuditReport`] bundles every
//! audit output for JSON printing, and [`ReportWriter`] saves it to disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_auditor::reporting::{AuditReport, ReportWriter};
//!
//! let report = auditor.audit_file("data/sales.csv")?;
//! println!("{}", report.to_json_pretty()?);
//!
//! ReportWriter::new("reports").write_report(&report, "sales")?;
//! ```

mod issues;
mod report;

pub use issues::IssueReporter;
pub use report::{AuditReport, ReportWriter};
