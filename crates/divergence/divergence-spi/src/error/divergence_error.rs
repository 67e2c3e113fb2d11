//! Divergence error types.

use thiserror::Error;

/// Divergence computation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DivergenceError {
    #[error("Shape mismatch: distributions must have the same length ({left} vs {right})")]
    ShapeMismatch { left: usize, right: usize },

    #[error("Dimensionality error: only one-dimensional distributions are supported, got {ndim} dimensions")]
    Dimensionality { ndim: usize },

    #[error("Non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Empty input: at least one value is required")]
    EmptyInput,
}

/// Result type for divergence operations.
pub type Result<T> = std::result::Result<T, DivergenceError>;
