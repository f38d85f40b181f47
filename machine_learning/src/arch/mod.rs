pub mod activations;
mod logistic;
pub mod loss;
mod model;

pub use logistic::LogisticRegression;
pub use model::Model;
