//! Divergence measure trait definition.

use crate::error::Result;

/// A divergence between two discrete distributions.
///
/// Implementations receive raw, equal-length vectors and are responsible
/// for their own flooring and normalization. Scores are non-negative;
/// asymmetric measures may return `f64::INFINITY`.
pub trait Divergence: Send + Sync {
    /// Compute the divergence between `p` and `q`.
    fn divergence(&self, p: &[f64], q: &[f64]) -> Result<f64>;

    /// Short identifier used in reports and logs.
    fn name(&self) -> &'static str;

    /// Whether `divergence(p, q) == divergence(q, p)` for all inputs.
    fn is_symmetric(&self) -> bool;
}
