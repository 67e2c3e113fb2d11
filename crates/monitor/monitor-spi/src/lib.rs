//! Monitor Service Provider Interface
//!
//! Defines traits and types for the windowed distribution-shift monitors.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{MonitoringStream, WindowComparator};
pub use error::{MonitorError, Result};
pub use model::{
    Alert, AlertSeverity, AnomalyReport, DriftLevel, DriftReport, RegimeReport,
    CRITICAL_THRESHOLD, MODERATE_THRESHOLD, SLIGHT_THRESHOLD,
};
