//! Shared utilities for the audit pipeline.
//!
//! Dtype classification and the missing-value predicate live here so the
//! profiler and the detector agree on what "numeric" and "missing" mean.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Declared kind of a column, derived from its polars dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Signed or unsigned integers
    Integer,
    /// Floating point numbers
    Float,
    /// Boolean type
    Boolean,
    /// Date, datetime, time or duration types
    Datetime,
    /// String/categorical text
    Text,
    /// Anything else (nested, binary, null-typed columns)
    Other,
}

impl ColumnKind {
    /// Integer and float columns are numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Text and catch-all kinds carry no type information of their own.
    pub fn is_generic(self) -> bool {
        matches!(self, ColumnKind::Text | ColumnKind::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Text => "text",
            ColumnKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Check if a DataType is a temporal type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time | DataType::Duration(_)
    )
}

/// Classify a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_integer_dtype(dtype) {
        ColumnKind::Integer
    } else if is_float_dtype(dtype) {
        ColumnKind::Float
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if is_datetime_dtype(dtype) {
        ColumnKind::Datetime
    } else if dtype.is_string() || dtype.is_categorical() || dtype.is_enum() {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

// =============================================================================
// Missing Values
// =============================================================================

/// Per-row missing flags for a series.
///
/// A cell is missing when it is null, or NaN in a floating point column.
pub fn missing_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    if is_float_dtype(series.dtype()) {
        let values = series.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(f64::is_nan))
            .collect())
    } else {
        let nulls = series.is_null();
        Ok(nulls.into_iter().map(|v| v.unwrap_or(true)).collect())
    }
}

/// Number of missing cells in a series.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    Ok(missing_mask(series)?.into_iter().filter(|&m| m).count())
}

/// Numeric cells of a series as `f64`, with missing cells as `None`.
///
/// Callers must only pass numeric or boolean series.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let values = series.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

// =============================================================================
// Number Formatting
// =============================================================================

/// Round to two decimal places, half away from zero.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total * 100`, defined as 0 for an empty total.
#[inline]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Format a percentage the way it appears in issue messages.
///
/// Whole numbers keep one decimal (`100.0`), others use the shortest
/// representation (`33.33`, `10.5`).
pub fn format_pct(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
