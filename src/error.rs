//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.

use thiserror::Error;

/// Main error type for Lineal operations
#[derive(Error, Debug)]
pub enum LinealError {
    /// Invalid arguments (bad sizes, out-of-range probabilities, ladder violations)
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Invalid object state (haplotype unset or already mutated, pedigree unset)
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// The cancellation probe tripped between major steps
    #[error("operation cancelled")]
    Cancelled,

    /// Numeric failures (degenerate decompositions, non-finite intermediates)
    #[error("numeric failure: {message}")]
    Numeric { message: String },
}

/// Type alias for Results using LinealError
pub type Result<T> = std::result::Result<T, LinealError>;

impl LinealError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a numeric failure error
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::Numeric {
            message: message.into(),
        }
    }
}
