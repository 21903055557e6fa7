//! Dataset health score.

use crate::config::ScoringConfig;
use crate::types::DatasetProfile;
use crate::utils::percentage;

/// Maximum (and starting) health score.
pub const MAX_SCORE: u8 = 100;

/// Computes a 0-100 health score from column profiles and the anomaly count.
pub struct HealthScorer;

impl HealthScorer {
    /// Start at 100, subtract the null penalty of every column and the
    /// anomaly penalty once, then clamp into `0..=100`.
    pub fn score(
        profile: &DatasetProfile,
        anomaly_count: usize,
        total_rows: usize,
        config: &ScoringConfig,
    ) -> u8 {
        let null_penalty: i64 = profile
            .iter()
            .map(|col| i64::from(config.null_penalty(col.null_pct)))
            .sum();
        let anomaly_penalty = i64::from(config.anomaly_penalty(percentage(anomaly_count, total_rows)));

        let score = i64::from(MAX_SCORE) - null_penalty - anomaly_penalty;
        score.clamp(0, i64::from(MAX_SCORE)) as u8
    }
}
