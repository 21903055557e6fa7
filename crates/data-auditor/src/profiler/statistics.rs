//! Descriptive statistics for numeric columns.

use crate::types::NumericStats;
use crate::utils::round2;

/// Summary statistics over the non-missing values of a column.
///
/// Returns `None` when there are no values. Every field is rounded to two
/// decimals; the standard deviation is the sample one (n - 1) and is absent
/// for a single value.
pub(crate) fn numeric_stats(values: &[f64]) -> Option<NumericStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(NumericStats {
        mean: round2(mean(values)),
        median: round2(median_of_sorted(&sorted)),
        std: sample_std(values).map(round2),
        min: round2(sorted[0]),
        max: round2(sorted[sorted.len() - 1]),
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Calculate the sample standard deviation.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Count distinct values, treating `-0.0` and `0.0` as equal.
pub(crate) fn distinct_count(values: &[f64]) -> usize {
    let mut normalized: Vec<f64> = values.iter().map(|v| v + 0.0).collect();
    normalized.sort_by(f64::total_cmp);
    normalized.dedup();
    normalized.len()
}
