use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

const DEFAULT_SAMPLES: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

/// How the synthetic student table is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorConfig {
    pub n_samples: NonZeroUsize,
    pub seed: u64,
    /// Standard deviation of the zero mean gaussian noise added to every score.
    pub noise_std: f64,
    /// A noisy score strictly above this value is labeled as placed.
    pub threshold: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_samples: DEFAULT_SAMPLES,
            seed: 42,
            noise_std: 15.,
            threshold: 75.,
        }
    }
}
