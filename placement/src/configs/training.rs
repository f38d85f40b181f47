use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

const DEFAULT_EPOCHS: NonZeroUsize = NonZeroUsize::new(5000).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerConfig {
    GradientDescent {
        lr: f64,
    },
    Adam {
        lr: f64,
        beta1: f64,
        beta2: f64,
        eps: f64,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam {
            lr: 0.05,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

/// How the classifier is fitted and evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TrainingConfig {
    /// Fraction of the rows held out for measuring accuracy.
    pub test_ratio: f64,
    pub split_seed: u64,
    pub epochs: NonZeroUsize,
    /// `None` trains on the whole partition at once.
    pub batch_size: Option<NonZeroUsize>,
    pub optimizer: OptimizerConfig,
    /// Inverse of the ridge penalty strength, smaller values regularize more.
    pub c: f64,
    pub tolerance: Option<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            split_seed: 42,
            epochs: DEFAULT_EPOCHS,
            batch_size: None,
            optimizer: OptimizerConfig::default(),
            c: 1.,
            tolerance: None,
        }
    }
}
