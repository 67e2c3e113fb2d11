//! Comparator and streaming monitor contracts.

use crate::error::Result;
use crate::model::Alert;

/// Scores how far a test window has moved away from a reference window.
///
/// Implementations histogram both windows on shared bin edges and return
/// a non-negative divergence score.
pub trait WindowComparator: Send + Sync {
    /// Divergence between the reference and test windows.
    fn compare(&self, reference: &[f64], test: &[f64]) -> Result<f64>;

    /// Name of the comparator, for logging.
    fn name(&self) -> &str;
}

/// Trait for streaming monitors fed one observation at a time.
pub trait MonitoringStream: Send + Sync {
    /// Push a new value and check for an anomaly.
    fn push(&mut self, value: f64) -> Result<Option<Alert>>;

    /// Scores recorded so far, one per pushed value.
    fn scores(&self) -> &[f64];

    /// Number of values pushed since creation or the last reset.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset the monitor state.
    fn reset(&mut self);
}
