mod generator;
mod output;
mod training;

use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};

pub use generator::GeneratorConfig;
pub use output::OutputConfig;
pub use training::{OptimizerConfig, TrainingConfig};

use crate::error::{PlacementErr, Result};

/// Names a JSON file whose contents override the defaults.
pub const CONFIG_ENV_VAR: &str = "PLACEMENT_CONFIG";

/// Everything a run depends on. Missing fields take their default values, so an empty JSON
/// object is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PlacementConfig {
    pub generator: GeneratorConfig,
    pub training: TrainingConfig,
    pub output: OutputConfig,
}

impl PlacementConfig {
    /// Loads and validates a config from a JSON file.
    ///
    /// # Errors
    /// Returns a `PlacementErr` if the file can't be read, isn't valid JSON or fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(PlacementErr::io(path))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Uses the file named by `PLACEMENT_CONFIG` when set, the defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("loading config from {}", Path::new(&path).display());
                Self::from_json_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Checks the numeric ranges serde can't express.
    ///
    /// # Errors
    /// Returns `PlacementErr::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let GeneratorConfig {
            noise_std,
            threshold,
            ..
        } = self.generator;

        ensure(
            noise_std.is_finite() && noise_std >= 0.,
            format!("generator.noise_std must be finite and non negative, got {noise_std}"),
        )?;
        ensure(
            threshold.is_finite(),
            format!("generator.threshold must be finite, got {threshold}"),
        )?;

        let training = &self.training;
        ensure(
            training.test_ratio > 0. && training.test_ratio < 1.,
            format!(
                "training.test_ratio must lie in (0, 1), got {}",
                training.test_ratio
            ),
        )?;
        ensure(
            training.c.is_finite() && training.c > 0.,
            format!("training.c must be positive, got {}", training.c),
        )?;

        if let Some(tol) = training.tolerance {
            ensure(
                tol.is_finite() && tol >= 0.,
                format!("training.tolerance must be non negative, got {tol}"),
            )?;
        }

        match training.optimizer {
            OptimizerConfig::GradientDescent { lr } => ensure_lr(lr),
            OptimizerConfig::Adam {
                lr,
                beta1,
                beta2,
                eps,
            } => {
                ensure_lr(lr)?;
                for (name, beta) in [("beta1", beta1), ("beta2", beta2)] {
                    ensure(
                        (0. ..1.).contains(&beta),
                        format!("training.optimizer.adam.{name} must lie in [0, 1), got {beta}"),
                    )?;
                }
                ensure(
                    eps.is_finite() && eps > 0.,
                    format!("training.optimizer.adam.eps must be positive, got {eps}"),
                )
            }
        }
    }
}

fn ensure(cond: bool, msg: String) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(PlacementErr::InvalidConfig(msg))
    }
}

fn ensure_lr(lr: f64) -> Result<()> {
    ensure(
        lr.is_finite() && lr > 0.,
        format!("training.optimizer.lr must be positive, got {lr}"),
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PlacementConfig::default();

        config.validate().unwrap();
        assert_eq!(config.generator.n_samples.get(), 1000);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.threshold, 75.);
        assert_eq!(config.generator.noise_std, 15.);
        assert_eq!(config.training.test_ratio, 0.2);
        assert_eq!(config.output.model_path(), Path::new("model/model.json"));
        assert_eq!(
            config.output.dataset_path(),
            Path::new("dataset/placement.csv")
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "generator": { "threshold": 80.0 },
            "training": { "optimizer": { "gradient_descent": { "lr": 0.001 } } }
        }"#;
        let config: PlacementConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.generator.threshold, 80.);
        assert_eq!(config.generator.noise_std, 15.);
        assert_eq!(
            config.training.optimizer,
            OptimizerConfig::GradientDescent { lr: 0.001 }
        );
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn zero_samples_is_rejected_by_the_parser() {
        let json = r#"{ "generator": { "n_samples": 0 } }"#;
        assert!(serde_json::from_str::<PlacementConfig>(json).is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = PlacementConfig::default();
        config.generator.noise_std = -1.;
        let res = config.validate();
        assert!(matches!(res, Err(PlacementErr::InvalidConfig(_))));

        let mut config = PlacementConfig::default();
        config.training.test_ratio = 1.;
        assert!(config.validate().is_err());

        let mut config = PlacementConfig::default();
        config.training.optimizer = OptimizerConfig::Adam {
            lr: 0.1,
            beta1: 1.,
            beta2: 0.999,
            eps: 1e-8,
        };
        assert!(config.validate().is_err());

        let mut config = PlacementConfig::default();
        config.training.c = 0.;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "generator": {{ "seed": 7, "n_samples": 50 }} }}"#).unwrap();

        let config = PlacementConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.n_samples.get(), 50);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = PlacementConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
