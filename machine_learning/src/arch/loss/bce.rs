use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;
use crate::arch::activations::Sigmoid;

/// Binary cross entropy (log loss) measured on *logits*, not on probabilities.
///
/// Taking the pre activation values keeps both the loss and its derivative finite when the
/// model is very confident, the derivative collapses to `(sigmoid(z) - y) / n`.
#[derive(Default, Clone, Copy)]
pub struct BinaryCrossEntropy {
    sigmoid: Sigmoid,
}

impl BinaryCrossEntropy {
    /// Returns a new `BinaryCrossEntropy`.
    pub fn new() -> Self {
        Self::default()
    }
}

/// `ln(1 + e^z)` without overflowing for large `z`.
fn softplus(z: f64) -> f64 {
    z.max(0.) + (-z.abs()).exp().ln_1p()
}

impl LossFn for BinaryCrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
        let n = y_pred.len();
        if n == 0 {
            return 0.;
        }

        let total = Zip::from(&y_pred)
            .and(&y)
            .fold(0., |acc, &z, &t| acc + softplus(z) - t * z);

        total / n as f64
    }

    fn loss_prime(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64> {
        let n = y_pred.len().max(1) as f64;
        Zip::from(&y_pred)
            .and(&y)
            .map_collect(|&z, &t| (self.sigmoid.f(z) - t) / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn matches_log_loss_on_probabilities() {
        let z = array![[0.0], [2.0], [-1.5]];
        let y = array![[1.0], [0.0], [0.0]];
        let s = Sigmoid::new();

        let total: f64 = z
            .iter()
            .zip(y.iter())
            .map(|(&z, &t)| {
                let p = s.f(z);
                -(t * p.ln() + (1. - t) * (1. - p).ln())
            })
            .sum();
        let expected = total / 3.;

        let got = BinaryCrossEntropy::new().loss(z.view(), y.view());
        assert!((got - expected).abs() < 1e-12, "got {got}, want {expected}");
    }

    #[test]
    fn stays_finite_when_confidently_wrong() {
        let z = array![[800.0], [-800.0]];
        let y = array![[0.0], [1.0]];
        let bce = BinaryCrossEntropy::new();

        let loss = bce.loss(z.view(), y.view());
        assert!((loss - 800.).abs() < 1e-9);

        let d = bce.loss_prime(z.view(), y.view());
        assert_eq!(d, array![[0.5], [-0.5]]);
    }

    #[test]
    fn derivative_vanishes_at_perfect_fit() {
        let z = array![[50.0], [-50.0]];
        let y = array![[1.0], [0.0]];

        let d = BinaryCrossEntropy::new().loss_prime(z.view(), y.view());
        assert!(d.iter().all(|g| g.abs() < 1e-12));
    }
}
