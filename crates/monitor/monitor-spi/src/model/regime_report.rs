//! Regime change scan output.

use serde::{Deserialize, Serialize};

/// Scores of the short recent window against the long baseline window,
/// indexed into the return series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    /// Return-series positions where a score was computed, ascending.
    pub indices: Vec<usize>,
    /// One score per entry of `indices`.
    pub scores: Vec<f64>,
}

impl RegimeReport {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `(index, score)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.scores.iter().copied())
    }

    /// Score computed at `index`, if it was scanned.
    pub fn score_at(&self, index: usize) -> Option<f64> {
        self.indices
            .binary_search(&index)
            .ok()
            .map(|pos| self.scores[pos])
    }
}
