use std::{fmt, io, path::PathBuf};

use machine_learning::MlErr;

/// The placement crate's result type.
pub type Result<T> = std::result::Result<T, PlacementErr>;

/// All errors that can occur while generating, fitting or persisting.
#[derive(Debug)]
pub enum PlacementErr {
    /// Invalid configuration, caught before any work is done.
    InvalidConfig(String),
    /// A candidate or a loaded artifact doesn't satisfy the expected ranges or shapes.
    InvalidInput(String),
    /// Failed to read or write a file or directory.
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    Csv(csv::Error),
    Ml(MlErr),
}

impl PlacementErr {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

impl fmt::Display for PlacementErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Io { path, source } => write!(f, "io error on {}: {source}", path.display()),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Ml(e) => write!(f, "training error: {e}"),
        }
    }
}

impl std::error::Error for PlacementErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Csv(e) => Some(e),
            Self::Ml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PlacementErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<csv::Error> for PlacementErr {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<MlErr> for PlacementErr {
    fn from(e: MlErr) -> Self {
        Self::Ml(e)
    }
}
