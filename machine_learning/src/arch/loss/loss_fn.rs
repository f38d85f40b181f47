use ndarray::{Array2, ArrayView2};

pub trait LossFn {
    /// Returns the mean loss of a batch.
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64;

    /// Returns the derivative of `loss` with respect to each entry of `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64>;
}
