//! Data models for divergence computation.
//!
//! This module contains data structures produced by the divergence kernel.

mod decomposition;
mod probability_vector;

pub use decomposition::{MetricCheck, WDecomposition};
pub use probability_vector::ProbabilityVector;
