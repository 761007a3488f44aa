//! Core error types for Tethys

use thiserror::Error;

/// Main error type for Tethys operations
#[derive(Error, Debug)]
pub enum TethysError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Statistics error: {0}")]
    Statistics(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Tethys operations
pub type TethysResult<T> = Result<T, TethysError>;

// Conversion implementations for common error types
impl From<serde_json::Error> for TethysError {
    fn from(err: serde_json::Error) -> Self {
        TethysError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for TethysError {
    fn from(err: anyhow::Error) -> Self {
        TethysError::Other(err.to_string())
    }
}
