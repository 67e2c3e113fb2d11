//! Monitor error types.

use divergence_spi::DivergenceError;
use thiserror::Error;

/// Monitor errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Non-finite input at index {index}")]
    NonFiniteInput { index: usize },

    #[error("Divergence error: {0}")]
    Divergence(#[from] DivergenceError),
}

impl MonitorError {
    pub fn invalid(name: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
