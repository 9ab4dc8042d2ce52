//! Core error types

use thiserror::Error;

/// Errors raised by the configuration and logging layers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A symbolic constant or document could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Logging subscriber could not be installed
    #[error("Logging initialization failed: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
