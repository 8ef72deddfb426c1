//! Error types for dimucat

use thiserror::Error;

/// dimucat error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (selection, categories, score model)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sample-level error (bad descriptor, inconsistent category sets)
    #[error("Sample error: {0}")]
    Sample(String),

    /// Event-level error (corrupt event data inside a task)
    #[error("Event error: {0}")]
    Event(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
