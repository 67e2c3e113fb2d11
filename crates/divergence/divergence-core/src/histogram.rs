//! Density estimation via fixed-bin-count histograms.

use divergence_api::{BinRange, HistogramConfig, DENSITY_FLOOR};
use divergence_spi::{DivergenceError, ProbabilityVector, Result};

/// Equal-width bin edges over a closed range.
///
/// Bins are half-open `[edge_i, edge_i+1)` except the last, which also
/// contains the upper bound. Samples outside the range are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEdges {
    lo: f64,
    hi: f64,
    bins: usize,
}

impl BinEdges {
    /// Build edges over `[lo, hi]`. A degenerate range is widened by 0.5 on
    /// each side.
    pub fn new(lo: f64, hi: f64, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(DivergenceError::InvalidParameter {
                name: "bins".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return Err(DivergenceError::InvalidParameter {
                name: "range".to_string(),
                reason: format!("invalid bounds [{}, {}]", lo, hi),
            });
        }
        let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
        Ok(Self { lo, hi, bins })
    }

    /// Resolve a [`BinRange`] against a sample.
    pub fn from_range(range: BinRange, bins: usize, samples: &[f64]) -> Result<Self> {
        let (lo, hi) = resolve_range(range, samples);
        Self::new(lo, hi, bins)
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn width(&self) -> f64 {
        (self.hi - self.lo) / self.bins as f64
    }

    fn edge(&self, i: usize) -> f64 {
        if i >= self.bins {
            self.hi
        } else {
            self.lo + i as f64 * self.width()
        }
    }

    /// All `bins + 1` edges.
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.bins).map(|i| self.edge(i)).collect()
    }

    /// Bin index of `x`, or `None` when it falls outside the range.
    pub fn bin_of(&self, x: f64) -> Option<usize> {
        if !(x >= self.lo && x <= self.hi) {
            return None;
        }
        let mut idx = (((x - self.lo) / self.width()) as usize).min(self.bins - 1);
        // Correct for rounding in the division against the stored edges.
        if x < self.edge(idx) {
            idx = idx.saturating_sub(1);
        } else if idx + 1 < self.bins && x >= self.edge(idx + 1) {
            idx += 1;
        }
        Some(idx)
    }

    /// Per-bin sample counts.
    pub fn counts(&self, samples: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.bins];
        for idx in samples.iter().filter_map(|&x| self.bin_of(x)) {
            counts[idx] += 1;
        }
        counts
    }

    /// Histogram density floored at [`DENSITY_FLOOR`] and renormalized.
    ///
    /// A sample with nothing inside the range yields the uniform vector.
    pub fn estimate(&self, samples: &[f64]) -> ProbabilityVector {
        let counts = self.counts(samples);
        let total: usize = counts.iter().sum();
        let density: Vec<f64> = if total == 0 {
            vec![0.0; self.bins]
        } else {
            let scale = 1.0 / (total as f64 * self.width());
            counts.iter().map(|&c| c as f64 * scale).collect()
        };
        ProbabilityVector::normalize(&density, DENSITY_FLOOR)
    }
}

/// Minimum and maximum of the finite values in `samples`.
pub fn data_range(samples: &[f64]) -> Option<(f64, f64)> {
    samples
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

fn resolve_range(range: BinRange, samples: &[f64]) -> (f64, f64) {
    match range {
        BinRange::Fixed { lo, hi } => (lo, hi),
        BinRange::Data => data_range(samples).unwrap_or((0.0, 1.0)),
        BinRange::Margin { fraction } => {
            let (lo, hi) = data_range(samples).unwrap_or((0.0, 1.0));
            let margin = (hi - lo) * fraction;
            (lo - margin, hi + margin)
        }
        BinRange::AtLeast { lo, hi } => match data_range(samples) {
            Some((min, max)) => (lo.min(min), hi.max(max)),
            None => (lo, hi),
        },
    }
}

/// Estimate a probability vector from raw samples.
pub fn estimate(samples: &[f64], config: &HistogramConfig) -> Result<ProbabilityVector> {
    config.validate()?;
    Ok(BinEdges::from_range(config.range, config.bins, samples)?.estimate(samples))
}
