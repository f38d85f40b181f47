use crate::Result;

pub trait Optimizer {
    /// Takes a single step over `params` given the gradient of the loss at `params`.
    ///
    /// # Returns
    /// An error if `params` and `grad` have different lengths.
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) -> Result<()>;
}
