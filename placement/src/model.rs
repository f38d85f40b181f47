use serde::{Deserialize, Serialize};

use crate::{
    error::{PlacementErr, Result},
    generator::FEATURES,
};

/// The class labels in the order the coefficients refer to: a positive logit favors the last one.
pub const CLASSES: [u8; 2] = [0, 1];

/// The fitted classifier as written to `model.json`.
///
/// The nesting mirrors the usual one-vs-rest layout of linear classifiers: one intercept and one
/// coefficient row per decision function, of which a binary problem has exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub intercept: Vec<f64>,
    pub coefficients: Vec<Vec<f64>>,
    pub classes: Vec<u8>,
    pub accuracy: f64,
}

impl ModelParams {
    /// Builds the document from a flat `[w_0, .., w_4, b]` parameter slice.
    ///
    /// # Errors
    /// Returns `PlacementErr::InvalidInput` if `params` doesn't hold one weight per feature plus
    /// the intercept.
    pub fn from_flat(params: &[f64], accuracy: f64) -> Result<Self> {
        let Some((&intercept, weights)) = params.split_last() else {
            return Err(PlacementErr::InvalidInput("no parameters".into()));
        };

        let model = Self {
            intercept: vec![intercept],
            coefficients: vec![weights.to_vec()],
            classes: CLASSES.to_vec(),
            accuracy,
        };
        model.validate()?;
        Ok(model)
    }

    /// Checks the shape invariants, a loaded document may violate them.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PlacementErr::InvalidInput(msg));

        if self.intercept.len() != 1 {
            return invalid(format!("expected 1 intercept, got {}", self.intercept.len()));
        }

        match self.coefficients.as_slice() {
            [row] if row.len() == FEATURES.len() => {}
            [row] => {
                return invalid(format!(
                    "expected {} coefficients, got {}",
                    FEATURES.len(),
                    row.len()
                ));
            }
            rows => return invalid(format!("expected 1 coefficient row, got {}", rows.len())),
        }

        if self.classes != CLASSES {
            return invalid(format!("expected classes {CLASSES:?}, got {:?}", self.classes));
        }

        if !(0. ..=1.).contains(&self.accuracy) {
            return invalid(format!("accuracy {} is not a fraction", self.accuracy));
        }

        Ok(())
    }

    /// The bias term.
    pub fn bias(&self) -> f64 {
        self.intercept.first().copied().unwrap_or_default()
    }

    /// The weights, in feature order.
    pub fn weights(&self) -> &[f64] {
        self.coefficients.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// The log-odds of placement for the given features.
    pub fn logit(&self, features: &[f64; 5]) -> f64 {
        self.bias()
            + self
                .weights()
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}
