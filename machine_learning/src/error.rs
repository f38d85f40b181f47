use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidSplit {
        ratio: f64,
        len: usize,
    },
    EmptyDataset,
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
    },
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => format!(
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::InvalidSplit { ratio, len } => format!(
                "Can't split a dataset of {len} rows with a test ratio of {ratio}, both partitions must be non empty"
            ),
            MlErr::EmptyDataset => "The dataset has no rows".to_string(),
            MlErr::InvalidHyperparameter { name, value } => {
                format!("The hyperparameter {name} can't take the value {value}")
            }
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {}
