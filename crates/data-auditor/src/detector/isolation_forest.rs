//! Isolation Forest outlier model.
//!
//! Anomalies are isolated by fewer random axis-aligned splits than normal
//! points. Each tree is grown on a random subsample; a row's anomaly score
//! is `2^(-E[h(x)] / c(psi))` where `E[h(x)]` is its mean path length over
//! the ensemble and `c(psi)` the expected path length of an unsuccessful
//! BST search over `psi` samples.
//!
//! Rows whose score lies strictly above the `(1 - contamination)` quantile
//! of all scores are labelled anomalous.

use super::{Label, OutlierDetector};
use crate::config::DetectorConfig;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

/// Euler-Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Default subsample size cap per tree.
const DEFAULT_MAX_SAMPLES: usize = 256;

/// Isolation Forest configured with a fixed seed.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: Option<usize>,
    contamination: f64,
    seed: u64,
}

impl IsolationForest {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            n_estimators: config.n_estimators.max(1),
            max_samples: config.max_samples,
            contamination: config.contamination,
            seed: config.seed,
        }
    }

    /// Grow the ensemble on `rows`, which must be rectangular.
    pub fn fit(&self, rows: &[Vec<f64>]) -> FittedForest {
        let n = rows.len();
        if n == 0 {
            return FittedForest {
                trees: Vec::new(),
                sample_size: 0,
            };
        }

        let n_features = rows.first().map_or(0, Vec::len);
        let sample_size = self
            .max_samples
            .unwrap_or(DEFAULT_MAX_SAMPLES)
            .clamp(1, n);
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let trees = (0..self.n_estimators)
            .map(|_| {
                let sample = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                let points: Vec<&[f64]> = sample.iter().map(|&i| rows[i].as_slice()).collect();
                build_tree(&points, n_features, max_depth, &mut rng)
            })
            .collect();

        FittedForest { trees, sample_size }
    }
}

impl OutlierDetector for IsolationForest {
    fn name(&self) -> &str {
        "isolation_forest"
    }

    fn fit_predict(&self, rows: &[Vec<f64>]) -> Vec<Label> {
        if rows.len() < 2 {
            return vec![Label::Normal; rows.len()];
        }

        let forest = self.fit(rows);
        let scores: Vec<f64> = rows.iter().map(|row| forest.score(row)).collect();
        let threshold = quantile(&scores, 1.0 - self.contamination);
        debug!(
            "Isolation forest scored {} rows, threshold {:.4}",
            rows.len(),
            threshold
        );

        scores
            .iter()
            .map(|&score| {
                if score > threshold {
                    Label::Anomalous
                } else {
                    Label::Normal
                }
            })
            .collect()
    }
}

/// A grown ensemble of isolation trees.
pub struct FittedForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl FittedForest {
    /// Anomaly score in (0, 1]; higher means easier to isolate.
    pub fn score(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }

        let mean_path = self
            .trees
            .iter()
            .map(|tree| path_length(tree, row, 0))
            .sum::<f64>()
            / self.trees.len() as f64;

        let normalizer = average_path_length(self.sample_size);
        if normalizer > 0.0 {
            2f64.powf(-mean_path / normalizer)
        } else {
            0.5
        }
    }
}

enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

fn build_tree(points: &[&[f64]], n_features: usize, depth_left: usize, rng: &mut StdRng) -> Node {
    if points.len() <= 1 || depth_left == 0 {
        return Node::Leaf { size: points.len() };
    }

    // Only features that still vary inside this node can split it
    let candidates: Vec<(usize, f64, f64)> = (0..n_features)
        .filter_map(|feature| {
            let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[feature]), hi.max(p[feature]))
            });
            (min.is_finite() && max.is_finite() && max > min).then_some((feature, min, max))
        })
        .collect();

    let Some(&(feature, min, max)) = candidates.choose(rng) else {
        return Node::Leaf { size: points.len() };
    };

    let threshold = split_point(min, max, rng.random::<f64>());
    let (left, right): (Vec<&[f64]>, Vec<&[f64]>) =
        points.iter().copied().partition(|p| p[feature] < threshold);

    if left.is_empty() || right.is_empty() {
        return Node::Leaf { size: points.len() };
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(&left, n_features, depth_left - 1, rng)),
        right: Box::new(build_tree(&right, n_features, depth_left - 1, rng)),
    }
}

/// Point at fraction `t` of `[min, max]`.
///
/// Blending the bounds stays finite even when `max - min` overflows, as it
/// does for values near `f64::MAX` of opposite sign.
fn split_point(min: f64, max: f64, t: f64) -> f64 {
    (min * (1.0 - t) + max * t).clamp(min, max)
}

fn path_length(node: &Node, row: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if row[*feature] < *threshold {
                path_length(left, row, depth + 1)
            } else {
                path_length(right, row, depth + 1)
            }
        }
    }
}

/// c(n) = 2H(n-1) - 2(n-1)/n, with H(i) approximated by ln(i) + gamma.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile, `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
