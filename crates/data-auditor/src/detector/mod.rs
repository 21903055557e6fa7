//! Multivariate outlier detection over the numeric columns of a table.
//!
//! Only numeric columns take part and only rows where every one of them is
//! present and finite are scored. Infinities count as missing here. Flagged rows are reported by their position in the
//! original table, not in the filtered candidate set.
//!
//! The model is a trait object so the isolation forest can be swapped for
//! any other detector with the same contract.

mod isolation_forest;

pub use isolation_forest::{FittedForest, IsolationForest};

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::types::AnomalyResult;
use crate::utils::{column_kind, numeric_values};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Per-row verdict of an outlier model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Normal,
    Anomalous,
}

/// An unsupervised outlier model.
///
/// Implementations must be deterministic for a fixed configuration and
/// return exactly one label per input row, in input order.
pub trait OutlierDetector: Send + Sync {
    fn name(&self) -> &str;

    fn fit_predict(&self, rows: &[Vec<f64>]) -> Vec<Label>;
}

/// Runs an [`OutlierDetector`] over the complete numeric rows of a table.
pub struct AnomalyDetector {
    model: Box<dyn OutlierDetector>,
}

impl AnomalyDetector {
    pub fn new(model: Box<dyn OutlierDetector>) -> Self {
        Self { model }
    }

    /// Detector backed by a seeded [`IsolationForest`].
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(Box::new(IsolationForest::new(config)))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Flag anomalous rows of `df`.
    ///
    /// Returns an empty result when the table has no numeric column or no
    /// row is fully populated across the numeric columns.
    pub fn detect(&self, df: &DataFrame) -> Result<AnomalyResult> {
        let numeric_columns = df
            .get_columns()
            .iter()
            .map(|col| col.as_materialized_series())
            .filter(|series| column_kind(series.dtype()).is_numeric())
            .map(numeric_values)
            .collect::<PolarsResult<Vec<_>>>()?;

        if numeric_columns.is_empty() {
            debug!("No numeric columns, skipping anomaly detection");
            return Ok(AnomalyResult::empty());
        }

        let (positions, rows) = complete_rows(&numeric_columns, df.height());
        if rows.is_empty() {
            debug!("No fully populated numeric rows, skipping anomaly detection");
            return Ok(AnomalyResult::empty());
        }

        debug!(
            "Running {} on {} of {} rows across {} numeric columns",
            self.model.name(),
            rows.len(),
            df.height(),
            numeric_columns.len()
        );

        let labels = self.model.fit_predict(&rows);
        let flagged: Vec<usize> = positions
            .iter()
            .zip(&labels)
            .filter(|(_, label)| **label == Label::Anomalous)
            .map(|(&position, _)| position)
            .collect();

        Ok(AnomalyResult::new(flagged, rows.len()))
    }
}

/// Rows with a finite value in every column, paired with their original
/// positions.
fn complete_rows(columns: &[Vec<Option<f64>>], height: usize) -> (Vec<usize>, Vec<Vec<f64>>) {
    (0..height)
        .filter_map(|row| {
            columns
                .iter()
                .map(|values| values[row].filter(|v| v.is_finite()))
                .collect::<Option<Vec<f64>>>()
                .map(|values| (row, values))
        })
        .unzip()
}
