//! Contract definitions for divergence measures.
//!
//! This module contains trait definitions that providers must implement.

mod divergence;

pub use divergence::Divergence;
