use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use super::{Model, activations::Sigmoid, loss::LossFn};
use crate::{MlErr, Result, optimization::Optimizer};

/// A binary logistic regression: `p(y = 1 | x) = sigmoid(x · w + b)`.
///
/// The parameters live outside the model as a flat slice laid out as `[w_0, .., w_{n-1}, b]`.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    n_features: usize,
    l2: f64,
    sigmoid: Sigmoid,
}

impl LogisticRegression {
    /// Creates a new unregularized `LogisticRegression`.
    ///
    /// # Arguments
    /// * `n_features` - The amount of input columns.
    pub fn new(n_features: usize) -> Self {
        Self {
            n_features,
            l2: 0.,
            sigmoid: Sigmoid::new(),
        }
    }

    /// Adds a ridge penalty of `l2 / 2 * ||w||²` to the loss. The intercept isn't penalized.
    ///
    /// # Returns
    /// An error if `l2` is negative or not finite.
    pub fn with_l2(mut self, l2: f64) -> Result<Self> {
        if !l2.is_finite() || l2 < 0. {
            return Err(MlErr::InvalidHyperparameter {
                name: "l2",
                value: l2,
            });
        }

        self.l2 = l2;
        Ok(self)
    }

    /// Computes the pre activation values `x · w + b`.
    ///
    /// # Returns
    /// A `(rows, 1)` array or an error if `params` or `x` have the wrong width.
    pub fn logits(&self, params: &[f64], x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (w, b) = self.view_params(params)?;

        if x.ncols() != self.n_features {
            return Err(MlErr::SizeMismatch {
                a: "x",
                b: "features",
                got: x.ncols(),
                expected: self.n_features,
            });
        }

        let w = w.insert_axis(Axis(1));
        Ok(x.dot(&w) + b)
    }

    /// Predicts the class of every row, `1.0` when the positive probability exceeds one half.
    pub fn predict(&self, params: &[f64], x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let p = self.forward(params, x)?;
        Ok(p.mapv(|p| if p > 0.5 { 1. } else { 0. }))
    }

    /// Gives a view of the raw parameter slice as the weights and the intercept.
    fn view_params<'a>(&self, params: &'a [f64]) -> Result<(ArrayView1<'a, f64>, f64)> {
        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                a: "params",
                b: "model",
                got: params.len(),
                expected: self.size(),
            });
        }

        let (w, b) = params.split_at(self.n_features);
        Ok((ArrayView1::from(w), b[0]))
    }

    fn penalty(&self, w: ArrayView1<f64>) -> f64 {
        0.5 * self.l2 * w.dot(&w)
    }
}

impl Model for LogisticRegression {
    fn size(&self) -> usize {
        self.n_features + 1
    }

    fn forward(&self, params: &[f64], x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let z = self.logits(params, x)?;
        Ok(z.mapv(|z| self.sigmoid.f(z)))
    }

    fn backprop<'a, L, O, I>(
        &self,
        params: &mut [f64],
        grad: &mut [f64],
        loss_fn: &L,
        optimizer: &mut O,
        batches: I,
    ) -> Result<f64>
    where
        L: LossFn,
        O: Optimizer,
        I: Iterator<Item = (ArrayView2<'a, f64>, ArrayView2<'a, f64>)>,
    {
        if grad.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                a: "grad",
                b: "model",
                got: grad.len(),
                expected: self.size(),
            });
        }

        let mut total_loss = 0.;
        let mut num_batches = 0;

        for (x, y) in batches {
            let z = self.logits(params, x)?;
            let d = loss_fn.loss_prime(z.view(), y);
            let d = d.column(0);

            let (w, _) = self.view_params(params)?;
            total_loss += loss_fn.loss(z.view(), y) + self.penalty(w);
            num_batches += 1;

            let (dw, db) = grad.split_at_mut(self.n_features);
            let gw = x.t().dot(&d);
            for ((g, gw), w) in dw.iter_mut().zip(&gw).zip(&w) {
                *g = gw + self.l2 * w;
            }
            db[0] = d.sum();

            optimizer.update_params(params, grad)?;
        }

        if num_batches == 0 {
            return Err(MlErr::EmptyDataset);
        }

        Ok(total_loss / num_batches as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::loss::BinaryCrossEntropy;
    use ndarray::array;

    /// Keeps the last gradient it was handed and leaves the parameters alone.
    #[derive(Default)]
    struct Recorder {
        grad: Vec<f64>,
    }

    impl Optimizer for Recorder {
        fn update_params(&mut self, _params: &mut [f64], grad: &[f64]) -> Result<()> {
            self.grad = grad.to_vec();
            Ok(())
        }
    }

    fn batch() -> (Array2<f64>, Array2<f64>) {
        let x = array![[1.0, 2.0], [-0.5, 0.3], [2.5, -1.0], [0.0, 0.7]];
        let y = array![[1.0], [0.0], [1.0], [0.0]];
        (x, y)
    }

    fn objective(
        model: &LogisticRegression,
        params: &[f64],
        x: &Array2<f64>,
        y: &Array2<f64>,
    ) -> f64 {
        let z = model.logits(params, x.view()).unwrap();
        let (w, _) = model.view_params(params).unwrap();
        BinaryCrossEntropy::new().loss(z.view(), y.view()) + model.penalty(w)
    }

    #[test]
    fn forward_is_sigmoid_of_affine_map() {
        let model = LogisticRegression::new(2);
        let params = [1.0, -2.0, 0.5];
        let x = array![[0.0, 0.0], [1.0, 1.0]];

        let p = model.forward(&params, x.view()).unwrap();
        let s = Sigmoid::new();

        assert_eq!(p.dim(), (2, 1));
        assert!((p[[0, 0]] - s.f(0.5)).abs() < 1e-12);
        assert!((p[[1, 0]] - s.f(-0.5)).abs() < 1e-12);
    }

    #[test]
    fn rejects_wrong_param_count() {
        let model = LogisticRegression::new(3);
        let x = array![[1.0, 2.0, 3.0]];

        let err = model.forward(&[0.0; 3], x.view()).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                got: 3,
                expected: 4,
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_l2() {
        assert!(LogisticRegression::new(1).with_l2(-1.).is_err());
        assert!(LogisticRegression::new(1).with_l2(f64::NAN).is_err());
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let model = LogisticRegression::new(2).with_l2(0.3).unwrap();
        let (x, y) = batch();
        let mut params = vec![0.4, -0.2, 0.1];
        let mut grad = vec![0.; 3];
        let mut recorder = Recorder::default();

        let batches = std::iter::once((x.view(), y.view()));
        let loss_fn = BinaryCrossEntropy::new();
        model
            .backprop(&mut params, &mut grad, &loss_fn, &mut recorder, batches)
            .unwrap();

        let h = 1e-6;
        for i in 0..params.len() {
            let mut plus = params.clone();
            let mut minus = params.clone();
            plus[i] += h;
            minus[i] -= h;

            let up = objective(&model, &plus, &x, &y);
            let down = objective(&model, &minus, &x, &y);
            let numeric = (up - down) / (2. * h);
            assert!(
                (numeric - recorder.grad[i]).abs() < 1e-6,
                "param {i}: numeric {numeric}, analytic {}",
                recorder.grad[i]
            );
        }
    }

    #[test]
    fn backprop_without_batches_fails() {
        let model = LogisticRegression::new(2);
        let mut params = vec![0.; 3];
        let mut grad = vec![0.; 3];

        let res = model.backprop(
            &mut params,
            &mut grad,
            &BinaryCrossEntropy::new(),
            &mut Recorder::default(),
            std::iter::empty(),
        );

        assert_eq!(res, Err(MlErr::EmptyDataset));
    }
}
