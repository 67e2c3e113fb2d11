//! Alert types for the streaming anomaly monitor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// An alert raised when a window score crosses the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Position of the triggering value in the stream.
    pub index: usize,
    /// Seconds since the Unix epoch when the alert was raised.
    pub timestamp: u64,
    pub value: f64,
    pub score: f64,
    pub severity: AlertSeverity,
    pub message: String,
}
