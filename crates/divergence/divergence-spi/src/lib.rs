//! Divergence Service Provider Interface
//!
//! Defines the contract, error taxonomy and data models shared by every
//! divergence measure.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::Divergence;
pub use error::{DivergenceError, Result};
pub use model::{MetricCheck, ProbabilityVector, WDecomposition};
