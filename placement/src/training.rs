//! Fitting the placement classifier and scoring it on held out rows.

use machine_learning::{
    arch::{LogisticRegression, Model, loss::BinaryCrossEntropy},
    dataset::Dataset,
    metrics,
    optimization::{Adam, GradientDescent, Optimizer},
    training::{ModelTrainer, Trainer},
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    configs::{OptimizerConfig, TrainingConfig},
    error::Result,
    generator::{FEATURES, PlacementData},
    model::ModelParams,
};

/// Splits the table, fits a ridge penalized logistic regression on the training part and
/// measures its accuracy on the rest.
///
/// # Arguments
/// * `config` - Split, penalty and optimizer settings.
/// * `data` - The labelled table.
///
/// # Returns
/// The fitted model together with its held out accuracy.
///
/// # Errors
/// Returns a `PlacementErr::Ml` if the table is too small to split or the fit fails.
pub fn fit(config: &TrainingConfig, data: &PlacementData) -> Result<ModelParams> {
    let dataset = data.to_dataset()?;
    let mut rng = StdRng::seed_from_u64(config.split_seed);
    let (train, test) = dataset.split(config.test_ratio, &mut rng)?;
    log::info!(train = train.len(), test = test.len(); "split {} rows", dataset.len());

    let l2 = 1. / (config.c * train.len() as f64);
    let model = LogisticRegression::new(FEATURES.len()).with_l2(l2)?;

    let mut trainer = TrainerBuilder::new(config).build(model.clone(), train, rng);
    let mut params = vec![0.; trainer.size()];
    let losses = trainer.train(&mut params)?;

    let y_pred = model.predict(&params, test.x())?;
    let accuracy = metrics::accuracy(y_pred.view(), test.y())?;
    log::info!(
        "fit done after {} epochs, final loss {:.4}, accuracy {accuracy:.4}",
        losses.len(),
        losses.last().copied().unwrap_or(f64::NAN)
    );

    ModelParams::from_flat(&params, accuracy)
}

/// Turns a `TrainingConfig` into a ready to run `Trainer`.
struct TrainerBuilder<'a> {
    config: &'a TrainingConfig,
}

impl<'a> TrainerBuilder<'a> {
    fn new(config: &'a TrainingConfig) -> Self {
        Self { config }
    }

    fn build(&self, model: LogisticRegression, dataset: Dataset, rng: StdRng) -> Box<dyn Trainer> {
        match self.config.optimizer {
            OptimizerConfig::GradientDescent { lr } => {
                let optimizer = GradientDescent::new(lr);
                self.terminate_build(model, optimizer, dataset, rng)
            }
            OptimizerConfig::Adam {
                lr,
                beta1,
                beta2,
                eps,
            } => {
                let optimizer = Adam::new(model.size(), lr, beta1, beta2, eps);
                self.terminate_build(model, optimizer, dataset, rng)
            }
        }
    }

    fn terminate_build<O>(
        &self,
        model: LogisticRegression,
        optimizer: O,
        dataset: Dataset,
        rng: StdRng,
    ) -> Box<dyn Trainer>
    where
        O: Optimizer + 'static,
    {
        let trainer = ModelTrainer::new(
            model,
            optimizer,
            dataset,
            self.config.epochs,
            self.config.batch_size,
            BinaryCrossEntropy::new(),
            rng,
        )
        .with_tolerance(self.config.tolerance);

        Box::new(trainer)
    }
}
