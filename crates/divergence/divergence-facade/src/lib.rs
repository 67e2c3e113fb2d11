//! W Divergence Facade
//!
//! Unified re-exports for the divergence module.
//!
//! This facade provides a single entry point to the numerical kernel:
//! - `Divergence` trait, `ProbabilityVector` and errors from SPI
//! - `DivergenceConfig`, `Metric` and histogram configuration from API
//! - Kernel functions (`w`, `kl`, `jensen_shannon`, `hellinger`), the
//!   histogram estimator, information measures and resampling from Core

// Re-export everything from SPI
pub use divergence_spi::*;

// Re-export everything from API
pub use divergence_api::*;

// Re-export everything from Core
pub use divergence_core::*;
