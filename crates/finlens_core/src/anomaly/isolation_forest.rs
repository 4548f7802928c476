//! Isolation forest over a single numeric feature
//!
//! Points that are easy to isolate with random splits (short average path
//! length) score close to 1 and are labelled outliers. The decision offset is
//! placed so that roughly `contamination` of the fitted points fall below it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::DetectionError;
use crate::stats::percentile;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Capability interface for the model-based outlier test.
///
/// Implementations label each value `true` when it is an outlier. The
/// returned vector must have the same length as `values`.
pub trait OutlierModel {
    fn fit_predict(&self, values: &[f64]) -> Result<Vec<bool>, DetectionError>;
}

#[derive(Debug, Clone)]
pub struct IsolationForest {
    pub n_estimators: usize,
    pub max_samples: usize,
    /// Expected fraction of outliers, in (0, 0.5]
    pub contamination: f64,
    pub random_state: u64,
}

impl IsolationForest {
    pub const DEFAULT_ESTIMATORS: usize = 100;
    pub const DEFAULT_MAX_SAMPLES: usize = 256;
    pub const DEFAULT_RANDOM_STATE: u64 = 42;

    pub fn new(contamination: f64) -> Self {
        Self {
            n_estimators: Self::DEFAULT_ESTIMATORS,
            max_samples: Self::DEFAULT_MAX_SAMPLES,
            contamination,
            random_state: Self::DEFAULT_RANDOM_STATE,
        }
    }

    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    fn validate(&self) -> Result<(), DetectionError> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(DetectionError::InvalidPolicy {
                field: "contamination",
                value: self.contamination,
                reason: "must be in (0, 0.5]",
            });
        }
        if self.n_estimators == 0 || self.max_samples == 0 {
            return Err(DetectionError::Model(
                "forest needs at least one tree and one sample per tree".to_string(),
            ));
        }
        Ok(())
    }

    /// Anomaly score of every value in (0, 1]; higher is more anomalous.
    pub fn score_samples(&self, values: &[f64]) -> Result<Vec<f64>, DetectionError> {
        self.validate()?;
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let sample_size = self.max_samples.min(values.len());
        let height_limit = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = SmallRng::seed_from_u64(self.random_state);

        let trees: Vec<Node> = (0..self.n_estimators)
            .map(|_| {
                let sample: Vec<f64> =
                    rand::seq::index::sample(&mut rng, values.len(), sample_size)
                        .into_iter()
                        .map(|i| values[i])
                        .collect();
                Node::build(&sample, 0, height_limit, &mut rng)
            })
            .collect();

        let normalizer = average_path_length(sample_size);
        let scores = values
            .iter()
            .map(|&x| {
                let mean_depth =
                    trees.iter().map(|t| t.path_length(x, 0)).sum::<f64>() / trees.len() as f64;
                if normalizer > 0.0 {
                    2f64.powf(-mean_depth / normalizer)
                } else {
                    0.5
                }
            })
            .collect();

        Ok(scores)
    }
}

impl OutlierModel for IsolationForest {
    fn fit_predict(&self, values: &[f64]) -> Result<Vec<bool>, DetectionError> {
        if values.len() < 2 {
            self.validate()?;
            return Ok(vec![false; values.len()]);
        }

        let negated: Vec<f64> = self.score_samples(values)?.iter().map(|s| -s).collect();
        let offset = percentile(&negated, self.contamination)
            .ok_or_else(|| DetectionError::Model("no scores to threshold".to_string()))?;

        Ok(negated.iter().map(|s| *s < offset).collect())
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn build<R: Rng + ?Sized>(values: &[f64], depth: usize, limit: usize, rng: &mut R) -> Node {
        if depth >= limit || values.len() <= 1 {
            return Node::Leaf { size: values.len() };
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min >= max {
            return Node::Leaf { size: values.len() };
        }

        let threshold = rng.random_range(min..max);
        let (left, right): (Vec<f64>, Vec<f64>) =
            values.iter().copied().partition(|&v| v < threshold);

        Node::Split {
            threshold,
            left: Box::new(Node::build(&left, depth + 1, limit, rng)),
            right: Box::new(Node::build(&right, depth + 1, limit, rng)),
        }
    }

    fn path_length(&self, x: f64, depth: usize) -> f64 {
        match self {
            Node::Leaf { size } => depth as f64 + average_path_length(*size),
            Node::Split {
                threshold,
                left,
                right,
            } => {
                if x < *threshold {
                    left.path_length(x, depth + 1)
                } else {
                    right.path_length(x, depth + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful binary-search-tree lookup over `n` points
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
