use crate::config::IssueThresholds;
use crate::types::{DatasetProfile, Issue, Severity};
use crate::utils::{format_pct, percentage, round2};

/// Turns profiles and the anomaly count into an ordered list of issues.
pub struct IssueReporter;

impl IssueReporter {
    /// Extract issues in report order.
    ///
    /// For every column in table order: its null issue (if any) followed by
    /// its identifier hint (if any). A single dataset-wide anomaly issue
    /// closes the list when at least one row was flagged.
    pub fn extract_issues(
        profile: &DatasetProfile,
        anomaly_count: usize,
        total_rows: usize,
        thresholds: &IssueThresholds,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();

        for col in profile {
            let null_severity = if col.null_pct > thresholds.null_critical_pct {
                Some(Severity::Critical)
            } else if col.null_pct > thresholds.null_warning_pct {
                Some(Severity::Warning)
            } else {
                None
            };

            if let Some(severity) = null_severity {
                issues.push(Issue::column(
                    severity,
                    &col.name,
                    format!("{}% null values ({} rows)", format_pct(col.null_pct), col.nulls),
                ));
            }

            if col.is_fully_unique() && !col.kind.is_generic() {
                issues.push(Issue::column(
                    Severity::Info,
                    &col.name,
                    "All values are unique; possible ID column",
                ));
            }
        }

        let anomaly_pct = round2(percentage(anomaly_count, total_rows));
        let anomaly_severity = if anomaly_pct > thresholds.anomaly_critical_pct {
            Some(Severity::Critical)
        } else if anomaly_pct > 0.0 {
            Some(Severity::Warning)
        } else {
            None
        };

        if let Some(severity) = anomaly_severity {
            issues.push(Issue::dataset_wide(
                severity,
                format!(
                    "{} anomalous rows detected ({}%)",
                    anomaly_count,
                    format_pct(anomaly_pct)
                ),
            ));
        }

        issues
    }
}
