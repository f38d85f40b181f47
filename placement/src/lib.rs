pub mod configs;
pub mod error;
pub mod generator;
pub mod model;
pub mod persistence;
pub mod predict;
pub mod training;

use std::path::PathBuf;

use rand::{SeedableRng, rngs::StdRng};

pub use error::{PlacementErr, Result};

use crate::configs::PlacementConfig;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub accuracy: f64,
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
}

/// Generates the student table, fits the classifier and writes both artifacts.
///
/// Nothing is written unless generation and fitting both succeed. Existing artifacts are
/// overwritten.
///
/// # Errors
/// Returns a `PlacementErr` if the config is invalid, the fit fails or an artifact can't be
/// written.
pub fn run(config: &PlacementConfig) -> Result<RunReport> {
    config.validate()?;

    log::info!("generating dataset");
    let mut rng = StdRng::seed_from_u64(config.generator.seed);
    let data = generator::generate(&config.generator, &mut rng)?;

    log::info!("training model");
    let model = training::fit(&config.training, &data)?;

    let output = &config.output;
    persistence::ensure_dir(&output.model_dir)?;
    persistence::ensure_dir(&output.dataset_dir)?;

    let model_path = output.model_path();
    let dataset_path = output.dataset_path();
    persistence::write_model(&model_path, &model)?;
    persistence::write_dataset(&dataset_path, &data)?;

    Ok(RunReport {
        accuracy: model.accuracy,
        model_path,
        dataset_path,
    })
}
