//! Monitor Facade
//!
//! Unified re-exports for the monitor module.
//!
//! This facade provides a single entry point to all monitoring functionality:
//! - `WindowComparator` and `MonitoringStream` traits, reports and errors from SPI
//! - Configuration types from API
//! - `WindowedComparator`, `AnomalyDetector`, `AnomalyStream`, `DriftMonitor`
//!   and `RegimeMonitor` from Core

// Re-export everything from SPI
pub use monitor_spi::*;

// Re-export everything from API
pub use monitor_api::*;

// Re-export everything from Core
pub use monitor_core::*;
