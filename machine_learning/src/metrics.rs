use ndarray::{ArrayView2, Zip};

use crate::{MlErr, Result};

/// The fraction of rows where the predicted label equals the expected one.
///
/// # Arguments
/// * `y_pred` - The predicted labels.
/// * `y` - The expected labels.
///
/// # Returns
/// A value in `[0, 1]`, or an error if the inputs are empty or differently shaped.
pub fn accuracy(y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<f64> {
    if y_pred.dim() != y.dim() {
        return Err(MlErr::SizeMismatch {
            a: "y_pred",
            b: "y",
            got: y_pred.len(),
            expected: y.len(),
        });
    }

    if y.is_empty() {
        return Err(MlErr::EmptyDataset);
    }

    let hits = Zip::from(&y_pred)
        .and(&y)
        .fold(0usize, |acc, p, t| acc + usize::from(p == t));

    Ok(hits as f64 / y.len() as f64)
}
