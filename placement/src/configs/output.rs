use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the artifacts are written, relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OutputConfig {
    pub model_dir: PathBuf,
    pub model_file: String,
    pub dataset_dir: PathBuf,
    pub dataset_file: String,
}

impl OutputConfig {
    /// Places both artifact directories under `root`, keeping the default layout.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let defaults = Self::default();

        Self {
            model_dir: root.join(defaults.model_dir),
            dataset_dir: root.join(defaults.dataset_dir),
            ..defaults
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.dataset_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            model_dir: "model".into(),
            model_file: "model.json".into(),
            dataset_dir: "dataset".into(),
            dataset_file: "placement.csv".into(),
        }
    }
}
