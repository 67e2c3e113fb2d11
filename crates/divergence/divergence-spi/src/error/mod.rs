//! Error types for divergence computation.
//!
//! This module contains error types and the Result alias.

mod divergence_error;

pub use divergence_error::{DivergenceError, Result};
