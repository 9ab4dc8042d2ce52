//! Error types for stream, reader, writer and copy operations.
//!
//! Decoding problems are not errors: invalid input is replaced with the
//! substitute character and consumption continues.

use thiserror::Error;

/// Errors that can occur in stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A parameter violates a stated precondition
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Operation is outside the stream's capability set
    #[error("Operation not supported: {operation}")]
    NotSupported {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Operation invoked after dispose()
    #[error("Cannot access a disposed {object}")]
    ObjectDisposed {
        /// Kind of object that was disposed
        object: &'static str,
    },

    /// Operation is not valid in the current configuration
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Unspecified failure of the underlying device
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StreamError {
    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        StreamError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_supported(operation: &'static str) -> Self {
        StreamError::NotSupported { operation }
    }

    pub(crate) fn disposed(object: &'static str) -> Self {
        StreamError::ObjectDisposed { object }
    }

    /// Name of the argument for [`StreamError::InvalidArgument`].
    pub fn argument_name(&self) -> Option<&'static str> {
        match self {
            StreamError::InvalidArgument { argument, .. } => Some(*argument),
            _ => None,
        }
    }

    /// Whether this error reports use after disposal.
    pub fn is_disposed(&self) -> bool {
        matches!(self, StreamError::ObjectDisposed { .. })
    }
}

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
