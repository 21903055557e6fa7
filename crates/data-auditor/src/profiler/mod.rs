//! Per-column profiling.
//!
//! Every column gets counts of cells, missing cells and distinct values.
//! Numeric and boolean columns additionally get descriptive statistics,
//! booleans counted as 0 and 1. Profiling is a pure function of the table
//! and never fails on data shape: a zero-row column reports zero
//! percentages instead of dividing by zero.

mod statistics;

use crate::error::Result;
use crate::types::{ColumnProfile, DatasetProfile};
use crate::utils::{ColumnKind, column_kind, missing_count, numeric_values, percentage, round2};
use polars::prelude::*;
use tracing::debug;

/// Data profiler for computing column statistics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column of a table, in table order.
    pub fn profile_dataset(df: &DataFrame) -> Result<DatasetProfile> {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| Self::profile_column(col.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;

        debug!("Profiled {} columns over {} rows", columns.len(), df.height());

        Ok(DatasetProfile {
            row_count: df.height(),
            column_count: df.width(),
            columns,
        })
    }

    /// Profile a single column.
    pub fn profile_column(series: &Series) -> Result<ColumnProfile> {
        let kind = column_kind(series.dtype());
        let total = series.len();
        let nulls = missing_count(series)?;

        let (unique, numeric) = if kind.is_numeric() || kind == ColumnKind::Boolean {
            let values: Vec<f64> = numeric_values(series)?.into_iter().flatten().collect();
            (
                statistics::distinct_count(&values),
                statistics::numeric_stats(&values),
            )
        } else {
            (series.drop_nulls().n_unique()?, None)
        };

        Ok(ColumnProfile {
            name: series.name().to_string(),
            dtype: format!("{:?}", series.dtype()),
            kind,
            total,
            nulls,
            null_pct: round2(percentage(nulls, total)),
            unique,
            unique_pct: round2(percentage(unique, total)),
            numeric,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profile_mixed_columns() {
        let df = df![
            "id" => [1i64, 2, 3, 4],
            "city" => [Some("Oslo"), Some("Rome"), None, Some("Oslo")],
            "price" => [Some(10.0), None, Some(30.0), Some(20.0)],
        ]
        .unwrap();

        let profile = DataProfiler::profile_dataset(&df).unwrap();
        assert_eq!(profile.row_count, 4);
        assert_eq!(profile.column_count, 3);
        assert_eq!(profile.column_names().collect::<Vec<_>>(), ["id", "city", "price"]);

        let id = profile.get("id").unwrap();
        assert_eq!(id.kind, ColumnKind::Integer);
        assert_eq!(id.dtype, "Int64");
        assert_eq!(id.unique, 4);
        assert_eq!(id.unique_pct, 100.0);
        assert_eq!(id.numeric.as_ref().unwrap().median, 2.5);

        let city = profile.get("city").unwrap();
        assert_eq!(city.kind, ColumnKind::Text);
        assert_eq!(city.nulls, 1);
        assert_eq!(city.null_pct, 25.0);
        // Missing cells are not a distinct value
        assert_eq!(city.unique, 2);
        assert_eq!(city.unique_pct, 50.0);
        assert!(city.numeric.is_none());

        let price = profile.get("price").unwrap();
        assert_eq!(price.kind, ColumnKind::Float);
        let stats = price.numeric.as_ref().unwrap();
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.std, Some(10.0));
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
    }

    #[test]
    fn test_profile_boolean_column_has_stats() {
        let df = df!["active" => [Some(true), Some(false), None, Some(true)]].unwrap();
        let col = DataProfiler::profile_dataset(&df).unwrap().columns.remove(0);

        assert_eq!(col.kind, ColumnKind::Boolean);
        assert_eq!(col.nulls, 1);
        assert_eq!(col.unique, 2);
        let stats = col.numeric.unwrap();
        assert_eq!(stats.mean, 0.67);
        assert_eq!(stats.median, 1.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
    }

    #[test]
    fn test_profile_percentages_rounded() {
        let df = df!["x" => [Some(1.0), None, None]].unwrap();
        let col = DataProfiler::profile_dataset(&df).unwrap().columns.remove(0);
        assert_eq!(col.null_pct, 66.67);
        assert_eq!(col.unique_pct, 33.33);
    }

    #[test]
    fn test_profile_all_null_numeric_column() {
        let df = df!["reading" => vec![None::<f64>; 10]].unwrap();
        let col = DataProfiler::profile_dataset(&df).unwrap().columns.remove(0);

        assert_eq!(col.total, 10);
        assert_eq!(col.nulls, 10);
        assert_eq!(col.null_pct, 100.0);
        assert_eq!(col.unique, 0);
        assert!(col.numeric.is_none());
    }

    #[test]
    fn test_profile_nan_counts_as_missing() {
        let df = df!["x" => [1.0, f64::NAN, 3.0, 3.0]].unwrap();
        let col = DataProfiler::profile_dataset(&df).unwrap().columns.remove(0);

        assert_eq!(col.nulls, 1);
        assert_eq!(col.unique, 2);
        assert_eq!(col.numeric.unwrap().mean, 2.33);
    }

    #[test]
    fn test_profile_zero_row_column() {
        let df = df!["empty" => Vec::<i64>::new()].unwrap();
        let col = DataProfiler::profile_dataset(&df).unwrap().columns.remove(0);

        assert_eq!(col.total, 0);
        assert_eq!(col.null_pct, 0.0);
        assert_eq!(col.unique_pct, 0.0);
        assert!(col.numeric.is_none());
    }

    #[test]
    fn test_profile_empty_table() {
        let profile = DataProfiler::profile_dataset(&DataFrame::empty()).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.row_count, 0);
    }

    #[test]
    fn test_profile_is_deterministic() {
        let df = df![
            "a" => [Some(1.5), None, Some(2.5), Some(1.5)],
            "b" => ["x", "y", "z", "x"],
        ]
        .unwrap();

        let first = DataProfiler::profile_dataset(&df).unwrap();
        let second = DataProfiler::profile_dataset(&df).unwrap();
        assert_eq!(first, second);
    }
}
