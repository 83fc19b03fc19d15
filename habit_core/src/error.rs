//! Error types for the habit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for habit_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing input field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage medium could not be reached or written
    #[error("Storage unavailable: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the system
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
