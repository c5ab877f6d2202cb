pub mod collector;
pub mod features;
pub mod markov;
pub mod naive_bayes;
pub mod predictor;
pub mod retrain;

pub use markov::MarkovPredictor;
pub use naive_bayes::NaiveBayesPredictor;
pub use predictor::{Predictor, PredictorSet};
