//! Data models for the monitors.
//!
//! This module contains the reports and alerts produced by the monitors.

mod alert;
mod anomaly_report;
mod drift_report;
mod regime_report;

pub use alert::{Alert, AlertSeverity};
pub use anomaly_report::AnomalyReport;
pub use drift_report::{
    DriftLevel, DriftReport, CRITICAL_THRESHOLD, MODERATE_THRESHOLD, SLIGHT_THRESHOLD,
};
pub use regime_report::RegimeReport;
