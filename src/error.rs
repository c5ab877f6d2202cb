//! Error types for the prediction engine.
//!
//! Insufficient data and empty results are deliberately absent here: they are
//! reported through `has_enough_data()` and empty prediction lists instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    /// The event store could not be read or written.
    #[error("Event store error: {0}")]
    SourceRead(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value supplied by the host could not be parsed.
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PredictError>;
