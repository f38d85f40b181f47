use crate::Result;

/// Something that fits a set of parameters to the data it holds.
pub trait Trainer {
    /// Runs the training loop, updating `params` in place.
    ///
    /// # Arguments
    /// * `params` - The initial parameters, overwritten with the fitted ones.
    ///
    /// # Returns
    /// The loss of every epoch that ran.
    fn train(&mut self, params: &mut [f64]) -> Result<Vec<f64>>;

    /// The amount of parameters `train` expects.
    fn size(&self) -> usize;
}
