//! Alert construction for the streaming anomaly monitor.

use std::time::{SystemTime, UNIX_EPOCH};

use monitor_spi::{Alert, AlertSeverity};

/// Severity of an anomalous score: critical at twice the threshold or more.
pub fn severity_for(score: f64, threshold: f64) -> AlertSeverity {
    if score >= 2.0 * threshold {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    }
}

/// Create an alert for the value at `index` whose window score crossed
/// `threshold`.
pub fn create_alert(index: usize, value: f64, score: f64, threshold: f64) -> Alert {
    AlertBuilder::new(index, value, score)
        .severity(severity_for(score, threshold))
        .build()
}

/// Alert builder for custom alert creation.
#[derive(Debug, Clone)]
pub struct AlertBuilder {
    index: usize,
    value: f64,
    score: f64,
    severity: Option<AlertSeverity>,
    message: Option<String>,
}

impl AlertBuilder {
    /// Start an alert with the severity and message left unset.
    pub fn new(index: usize, value: f64, score: f64) -> Self {
        Self {
            index,
            value,
            score,
            severity: None,
            message: None,
        }
    }

    /// Set a custom severity instead of the default warning.
    pub fn severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set a custom message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Build the alert, filling in a default message if none was set.
    pub fn build(self) -> Alert {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let message = self.message.unwrap_or_else(|| {
            format!(
                "Distribution shift at index {}: value={:.4}, score={:.4}",
                self.index, self.value, self.score
            )
        });

        Alert {
            index: self.index,
            timestamp,
            value: self.value,
            score: self.score,
            severity: self.severity.unwrap_or(AlertSeverity::Warning),
            message,
        }
    }
}
