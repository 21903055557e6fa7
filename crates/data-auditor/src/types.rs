use serde::{Serialize, Serializer};

use crate::utils::{ColumnKind, percentage};

// ============================================================================
// Profile Types
// ============================================================================

/// Descriptive statistics of a numeric column, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; absent with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Raw polars dtype, e.g. `Int64` or `String`.
    pub dtype: String,
    pub kind: ColumnKind,
    pub total: usize,
    pub nulls: usize,
    /// Percentage of missing cells (0-100, two decimals).
    pub null_pct: f64,
    /// Distinct non-missing values.
    pub unique: usize,
    /// Percentage of distinct values relative to `total` (two decimals).
    pub unique_pct: f64,
    /// Only present for numeric columns with at least one value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
}

impl ColumnProfile {
    /// Whether every cell holds a different value.
    pub fn is_fully_unique(&self) -> bool {
        self.unique_pct == 100.0
    }
}

/// Column profiles in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    /// Look up a column profile by name.
    pub fn get(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnProfile> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|col| col.name.as_str())
    }
}

impl<'a> IntoIterator for &'a DatasetProfile {
    type Item = &'a ColumnProfile;
    type IntoIter = std::slice::Iter<'a, ColumnProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

// ============================================================================
// Anomaly Types
// ============================================================================

/// Rows flagged as outliers, as ascending indices into the original table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyResult {
    indices: Vec<usize>,
    count: usize,
    candidate_rows: usize,
}

impl AnomalyResult {
    /// Build a result from flagged row indices.
    ///
    /// Indices are sorted and deduplicated so the result is always ascending.
    pub fn new(mut indices: Vec<usize>, candidate_rows: usize) -> Self {
        indices.sort_unstable();
        indices.dedup();
        let count = indices.len();
        Self {
            indices,
            count,
            candidate_rows,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Rows that entered the model (numeric and fully populated).
    pub fn candidate_rows(&self) -> usize {
        self.candidate_rows
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Anomalous rows as a percentage of the full table, not the candidates.
    pub fn anomaly_pct(&self, total_rows: usize) -> f64 {
        percentage(self.count, total_rows)
    }
}

// ============================================================================
// Issue Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an issue is about: one column, or the dataset as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueSubject {
    Column(String),
    DatasetWide,
}

impl IssueSubject {
    pub const DATASET_WIDE: &'static str = "Dataset-wide";

    pub fn as_str(&self) -> &str {
        match self {
            IssueSubject::Column(name) => name,
            IssueSubject::DatasetWide => Self::DATASET_WIDE,
        }
    }
}

impl std::fmt::Display for IssueSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IssueSubject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub subject: IssueSubject,
    pub message: String,
}

impl Issue {
    pub fn column(severity: Severity, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            subject: IssueSubject::Column(column.into()),
            message: message.into(),
        }
    }

    pub fn dataset_wide(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            subject: IssueSubject::DatasetWide,
            message: message.into(),
        }
    }
}

// ============================================================================
// Health Types
// ============================================================================

/// Coarse reading of a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    /// Score of 80 or more
    Healthy,
    /// Score from 60 to 79
    NeedsAttention,
    /// Score below 60
    Serious,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => HealthBand::Healthy,
            60..=79 => HealthBand::NeedsAttention,
            _ => HealthBand::Serious,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            HealthBand::Healthy => "Dataset is Healthy",
            HealthBand::NeedsAttention => "Dataset Needs Attention",
            HealthBand::Serious => "Dataset Has Serious Issues",
        }
    }
}
