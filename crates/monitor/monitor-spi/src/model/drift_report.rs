//! Drift classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores above this are critical drift.
pub const CRITICAL_THRESHOLD: f64 = 0.5;
/// Scores above this are moderate drift.
pub const MODERATE_THRESHOLD: f64 = 0.2;
/// Scores above this are slight drift.
pub const SLIGHT_THRESHOLD: f64 = 0.05;

/// Severity band of a drift score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftLevel {
    Normal,
    Slight,
    Moderate,
    Critical,
}

impl DriftLevel {
    /// Band a W score. Boundaries are exclusive: exactly 0.5 is moderate.
    pub fn from_score(score: f64) -> Self {
        if score > CRITICAL_THRESHOLD {
            DriftLevel::Critical
        } else if score > MODERATE_THRESHOLD {
            DriftLevel::Moderate
        } else if score > SLIGHT_THRESHOLD {
            DriftLevel::Slight
        } else {
            DriftLevel::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DriftLevel::Normal => "normal",
            DriftLevel::Slight => "slight",
            DriftLevel::Moderate => "moderate",
            DriftLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for DriftLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of checking one batch against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub w_score: f64,
    /// KL(baseline || batch); infinite when it cannot be computed.
    pub kl_score: f64,
    pub level: DriftLevel,
    pub sample_size: usize,
}

impl DriftReport {
    pub fn is_drift(&self) -> bool {
        self.level != DriftLevel::Normal
    }
}
