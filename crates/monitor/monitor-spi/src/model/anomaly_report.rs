//! Batch anomaly detection output.

use serde::{Deserialize, Serialize};

/// Result of scanning a series with two adjacent sliding windows.
///
/// `scores` is aligned with the input: `scores[i]` compares the window
/// ending just before `i` with the window before it. Positions without
/// two full windows of history score zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Indices whose score strictly exceeds the threshold, ascending.
    pub anomalies: Vec<usize>,
    /// One score per input position.
    pub scores: Vec<f64>,
    pub threshold: f64,
}

impl AnomalyReport {
    pub fn anomaly_count(&self) -> usize {
        self.anomalies.len()
    }

    pub fn is_anomaly(&self, index: usize) -> bool {
        self.anomalies.binary_search(&index).is_ok()
    }

    /// Index and value of the highest score, if any position scored.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
