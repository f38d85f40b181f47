use std::num::NonZeroUsize;

use rand::Rng;

use super::Trainer;
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn},
    dataset::Dataset,
    optimization::Optimizer,
};

/// A model `Trainer`. Contains the relevant components needed for training a model,
/// including the model itself.
pub struct ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    grad: Vec<f64>,
    optimizer: O,
    dataset: Dataset,
    loss_fn: L,
    model: M,

    epochs: NonZeroUsize,
    batch_size: Option<NonZeroUsize>,
    tolerance: Option<f64>,
    rng: R,
}

impl<M, O, L, R> ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - The optimizer that updates the parameters after every batch.
    /// * `dataset` - The dataset the model will be trained with.
    /// * `epochs` - The maximum amount of passes over the dataset.
    /// * `batch_size` - The rows per batch, `None` uses the whole dataset as a single batch.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `rng` - A random number generator, used to shuffle the rows between epochs.
    pub fn new(
        model: M,
        optimizer: O,
        dataset: Dataset,
        epochs: NonZeroUsize,
        batch_size: Option<NonZeroUsize>,
        loss_fn: L,
        rng: R,
    ) -> Self {
        Self {
            grad: vec![0.; model.size()],
            model,
            optimizer,
            dataset,
            epochs,
            batch_size,
            loss_fn,
            tolerance: None,
            rng,
        }
    }

    /// Stops training early once an epoch changes the loss by less than `tolerance`.
    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Performs up to `epochs` epochs of training its model, using its optimizer, dataset, loss
    /// function and batch size.
    ///
    /// # Arguments
    /// * `params` - The parameters being fitted.
    ///
    /// # Returns
    /// The loss of every epoch that ran.
    pub fn train(&mut self, params: &mut [f64]) -> Result<Vec<f64>> {
        if params.len() != self.model.size() {
            return Err(MlErr::SizeMismatch {
                a: "params",
                b: "model",
                got: params.len(),
                expected: self.model.size(),
            });
        }

        let full = NonZeroUsize::new(self.dataset.len()).ok_or(MlErr::EmptyDataset)?;
        let batch_size = self.batch_size.unwrap_or(full).min(full);
        let shuffle = batch_size < full;

        let epochs = self.epochs.get();
        let mut losses: Vec<f64> = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            if shuffle {
                self.dataset.shuffle(&mut self.rng);
            }

            let batches = self.dataset.batches(batch_size);
            let loss = self.model.backprop(
                params,
                &mut self.grad,
                &self.loss_fn,
                &mut self.optimizer,
                batches,
            )?;
            log::trace!("epoch {epoch}: loss {loss}");

            let converged = match (self.tolerance, losses.last()) {
                (Some(tol), Some(prev)) => (prev - loss).abs() < tol,
                _ => false,
            };
            losses.push(loss);

            if converged {
                log::debug!("loss settled after {} epochs", epoch + 1);
                break;
            }
        }

        Ok(losses)
    }
}

impl<M, O, L, R> Trainer for ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    fn train(&mut self, params: &mut [f64]) -> Result<Vec<f64>> {
        self.train(params)
    }

    fn size(&self) -> usize {
        self.model.size()
    }
}
