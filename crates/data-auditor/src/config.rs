//! Configuration types for the audit pipeline.
//!
//! All tunable constants (contamination fraction, seed, score penalties,
//! issue thresholds) live here and are passed explicitly into the detector,
//! scorer and reporter. The defaults reproduce the fixed audit heuristic.

use serde::{Deserialize, Serialize};

/// A single penalty band: applies when a percentage is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTier {
    /// Lower bound (exclusive) of the band, in percent.
    pub above: f64,
    /// Points subtracted from the health score.
    pub penalty: u32,
}

impl PenaltyTier {
    pub const fn new(above: f64, penalty: u32) -> Self {
        Self { above, penalty }
    }
}

/// Returns the penalty of the first tier whose bound `pct` exceeds.
///
/// Tiers are ordered from the highest bound down, so the first match is the
/// most severe band the value falls into.
pub(crate) fn tier_penalty(tiers: &[PenaltyTier], pct: f64) -> u32 {
    tiers
        .iter()
        .find(|tier| pct > tier.above)
        .map_or(0, |tier| tier.penalty)
}

/// Settings for the outlier-detection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Expected fraction of anomalous rows.
    /// Default: 0.05
    pub contamination: f64,

    /// Seed for the model's random number generator.
    /// Default: 42
    pub seed: u64,

    /// Number of isolation trees in the ensemble.
    /// Default: 100
    pub n_estimators: usize,

    /// Rows sampled per tree. `None` means `min(256, n)`.
    /// Default: None
    pub max_samples: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: 0.05,
            seed: 42,
            n_estimators: 100,
            max_samples: None,
        }
    }
}

/// Penalty tables for the health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Per-column penalties keyed on null percentage, highest bound first.
    pub null_penalties: Vec<PenaltyTier>,

    /// Dataset-wide penalties keyed on anomaly percentage, highest bound first.
    pub anomaly_penalties: Vec<PenaltyTier>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            null_penalties: vec![
                PenaltyTier::new(50.0, 15),
                PenaltyTier::new(20.0, 8),
                PenaltyTier::new(5.0, 3),
            ],
            anomaly_penalties: vec![PenaltyTier::new(10.0, 20), PenaltyTier::new(5.0, 10)],
        }
    }
}

impl ScoringConfig {
    /// Penalty for a single column with the given null percentage.
    pub fn null_penalty(&self, null_pct: f64) -> u32 {
        tier_penalty(&self.null_penalties, null_pct)
    }

    /// Penalty for the whole dataset with the given anomaly percentage.
    pub fn anomaly_penalty(&self, anomaly_pct: f64) -> u32 {
        tier_penalty(&self.anomaly_penalties, anomaly_pct)
    }
}

/// Percent thresholds used when turning signals into issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueThresholds {
    /// Null percentage above which a column issue is critical.
    /// Default: 20.0
    pub null_critical_pct: f64,

    /// Null percentage above which a column issue is a warning.
    /// Default: 5.0
    pub null_warning_pct: f64,

    /// Anomaly percentage above which the dataset issue is critical.
    /// Any positive percentage up to this bound is a warning.
    /// Default: 5.0
    pub anomaly_critical_pct: f64,
}

impl Default for IssueThresholds {
    fn default() -> Self {
        Self {
            null_critical_pct: 20.0,
            null_warning_pct: 5.0,
            anomaly_critical_pct: 5.0,
        }
    }
}

/// Configuration for a complete audit.
///
/// Use [`AuditConfig::builder()`] to override individual settings.
///
/// # Example
///
/// ```rust
/// use data_auditor::AuditConfig;
///
/// let config = AuditConfig::builder()
///     .contamination(0.1)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(config.detector.seed, 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub detector: DetectorConfig,
    pub scoring: ScoringConfig,
    pub issues: IssueThresholds,
}

impl AuditConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let contamination = self.detector.contamination;
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(ConfigValidationError::InvalidContamination(contamination));
        }

        if self.detector.n_estimators == 0 {
            return Err(ConfigValidationError::InvalidEstimators(
                self.detector.n_estimators,
            ));
        }

        if self.detector.max_samples == Some(0) {
            return Err(ConfigValidationError::InvalidMaxSamples);
        }

        validate_tiers("null_penalties", &self.scoring.null_penalties)?;
        validate_tiers("anomaly_penalties", &self.scoring.anomaly_penalties)?;

        if self.issues.null_warning_pct > self.issues.null_critical_pct {
            return Err(ConfigValidationError::InvertedThresholds {
                warning: self.issues.null_warning_pct,
                critical: self.issues.null_critical_pct,
            });
        }

        Ok(())
    }
}

fn validate_tiers(field: &str, tiers: &[PenaltyTier]) -> Result<(), ConfigValidationError> {
    let descending = tiers.windows(2).all(|pair| pair[0].above > pair[1].above);
    if !descending {
        return Err(ConfigValidationError::UnorderedTiers(field.to_string()));
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid contamination: {0} (must be in (0.0, 0.5])")]
    InvalidContamination(f64),

    #[error("Invalid number of estimators: {0} (must be at least 1)")]
    InvalidEstimators(usize),

    #[error("Invalid max_samples: must be at least 1 when set")]
    InvalidMaxSamples,

    #[error("Penalty tiers in '{0}' must be ordered by strictly decreasing bound")]
    UnorderedTiers(String),

    #[error("Warning threshold {warning} exceeds critical threshold {critical}")]
    InvertedThresholds { warning: f64, critical: f64 },
}

/// Builder for [`AuditConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    contamination: Option<f64>,
    seed: Option<u64>,
    n_estimators: Option<usize>,
    max_samples: Option<usize>,
    scoring: Option<ScoringConfig>,
    issues: Option<IssueThresholds>,
}

impl AuditConfigBuilder {
    /// Set the expected fraction of anomalous rows (0.0 - 0.5].
    pub fn contamination(mut self, contamination: f64) -> Self {
        self.contamination = Some(contamination);
        self
    }

    /// Set the seed used by the outlier-detection model.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of trees in the ensemble.
    pub fn n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = Some(n);
        self
    }

    /// Set a fixed subsample size per tree.
    pub fn max_samples(mut self, n: usize) -> Self {
        self.max_samples = Some(n);
        self
    }

    /// Replace the score penalty tables.
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = Some(scoring);
        self
    }

    /// Replace the issue thresholds.
    pub fn issue_thresholds(mut self, issues: IssueThresholds) -> Self {
        self.issues = Some(issues);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<AuditConfig, ConfigValidationError> {
        let defaults = DetectorConfig::default();
        let config = AuditConfig {
            detector: DetectorConfig {
                contamination: self.contamination.unwrap_or(defaults.contamination),
                seed: self.seed.unwrap_or(defaults.seed),
                n_estimators: self.n_estimators.unwrap_or(defaults.n_estimators),
                max_samples: self.max_samples.or(defaults.max_samples),
            },
            scoring: self.scoring.unwrap_or_default(),
            issues: self.issues.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuditConfig::default();
        assert_eq!(config.detector.contamination, 0.05);
        assert_eq!(config.detector.seed, 42);
        assert_eq!(config.detector.n_estimators, 100);
        assert_eq!(config.detector.max_samples, None);
        assert_eq!(config.issues.null_critical_pct, 20.0);
        assert_eq!(config.issues.null_warning_pct, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = AuditConfig::builder().build().unwrap();
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AuditConfig::builder()
            .contamination(0.1)
            .seed(7)
            .n_estimators(25)
            .max_samples(64)
            .build()
            .unwrap();

        assert_eq!(config.detector.contamination, 0.1);
        assert_eq!(config.detector.seed, 7);
        assert_eq!(config.detector.n_estimators, 25);
        assert_eq!(config.detector.max_samples, Some(64));
    }

    // ==================== tier_penalty tests ====================

    #[test]
    fn test_null_penalty_bands() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.null_penalty(0.0), 0);
        assert_eq!(scoring.null_penalty(5.0), 0);
        assert_eq!(scoring.null_penalty(5.01), 3);
        assert_eq!(scoring.null_penalty(20.0), 3);
        assert_eq!(scoring.null_penalty(20.5), 8);
        assert_eq!(scoring.null_penalty(50.0), 8);
        assert_eq!(scoring.null_penalty(50.01), 15);
        assert_eq!(scoring.null_penalty(100.0), 15);
    }

    #[test]
    fn test_anomaly_penalty_bands() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.anomaly_penalty(0.0), 0);
        assert_eq!(scoring.anomaly_penalty(5.0), 0);
        assert_eq!(scoring.anomaly_penalty(6.0), 10);
        assert_eq!(scoring.anomaly_penalty(10.0), 10);
        assert_eq!(scoring.anomaly_penalty(10.5), 20);
    }

    // ==================== validation tests ====================

    #[test]
    fn test_validation_invalid_contamination() {
        for bad in [0.0, -0.1, 0.75] {
            let result = AuditConfig::builder().contamination(bad).build();
            assert!(matches!(
                result.unwrap_err(),
                ConfigValidationError::InvalidContamination(_)
            ));
        }
    }

    #[test]
    fn test_validation_zero_estimators() {
        let result = AuditConfig::builder().n_estimators(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidEstimators(0)
        ));
    }

    #[test]
    fn test_validation_unordered_tiers() {
        let scoring = ScoringConfig {
            null_penalties: vec![PenaltyTier::new(5.0, 3), PenaltyTier::new(50.0, 15)],
            ..ScoringConfig::default()
        };
        let result = AuditConfig::builder().scoring(scoring).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::UnorderedTiers(field) if field == "null_penalties"
        ));
    }

    #[test]
    fn test_validation_inverted_issue_thresholds() {
        let issues = IssueThresholds {
            null_critical_pct: 5.0,
            null_warning_pct: 20.0,
            ..IssueThresholds::default()
        };
        let result = AuditConfig::builder().issue_thresholds(issues).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvertedThresholds { .. }
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AuditConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AuditConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
