//! # NextApp
//!
//! Predicts which application a user will open next from a local log of
//! launch events and the device context around them.
//!
//! - [`database`]: the SQLite launch log and the [`EventSource`] read seam
//! - [`services::features`]: calendar, battery and weekend features
//! - [`MarkovPredictor`]: previous-app transition counts with a
//!   most-frequently-used fallback
//! - [`NaiveBayesPredictor`]: smoothed log-likelihood ranking over nine
//!   contextual features
//! - [`Predictor`]: the closed set of both, selected by [`PredictorKind`]
//!
//! Model state lives only in memory and is rebuilt from the most recent
//! training window on every `train()`.

pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use database::{EventSink, EventSource, EventStore, MemoryEventStore};
pub use error::{PredictError, Result};
pub use models::{
    ActivityType, LaunchEvent, LaunchObservation, NewLaunch, PowerState, Prediction,
    PredictionContext, PredictorKind, Settings,
};
pub use services::{MarkovPredictor, NaiveBayesPredictor, Predictor, PredictorSet};
