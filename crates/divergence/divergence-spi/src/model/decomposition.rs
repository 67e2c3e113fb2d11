//! Per-bin breakdown of the W divergence and metric axiom checks.

use serde::{Deserialize, Serialize};

/// Term-by-term decomposition of a W divergence evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WDecomposition {
    /// Contribution of each bin (`chi_terms[i] * smoothing[i]`).
    pub contributions: Vec<f64>,
    /// Modified chi-square term per bin.
    pub chi_terms: Vec<f64>,
    /// Exponential smoothing factor per bin.
    pub smoothing: Vec<f64>,
    /// Sum of the contributions.
    pub total: f64,
    /// Normalized first distribution.
    pub p: Vec<f64>,
    /// Normalized second distribution.
    pub q: Vec<f64>,
}

impl WDecomposition {
    /// Index of the bin contributing the most to the total.
    pub fn dominant_bin(&self) -> Option<usize> {
        self.contributions
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Which metric-space axioms a divergence satisfied on a given triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCheck {
    pub identity: bool,
    pub symmetry: bool,
    pub triangle: bool,
    pub non_negativity: bool,
}

impl MetricCheck {
    /// True when every checked axiom holds.
    pub fn all(&self) -> bool {
        self.identity && self.symmetry && self.triangle && self.non_negativity
    }
}
