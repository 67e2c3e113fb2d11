//! Shared-bin histogram comparison of two windows.

use divergence_api::{BinRange, ProbabilityVector};
use divergence_core::{data_range, score, BinEdges};
use monitor_api::{ComparatorConfig, RangePolicy};
use monitor_spi::{Result, WindowComparator};

/// Histograms a reference and a test window and scores them with the
/// configured metric.
#[derive(Debug, Clone)]
pub struct WindowedComparator {
    config: ComparatorConfig,
}

impl WindowedComparator {
    pub fn new(config: ComparatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Bin edges for each window under the range policy.
    ///
    /// Empty windows fall back to the remaining data, then to the band or
    /// the unit interval.
    pub fn edges(&self, reference: &[f64], test: &[f64]) -> Result<(BinEdges, BinEdges)> {
        let bins = self.config.bins;
        let pooled = pooled_range(data_range(reference), data_range(test));

        let shared = match self.config.range_policy {
            RangePolicy::Pooled => {
                let (lo, hi) = pooled.unwrap_or((0.0, 1.0));
                BinEdges::new(lo, hi, bins)?
            }
            RangePolicy::Fixed { lo, hi } => BinEdges::new(lo, hi, bins)?,
            RangePolicy::AtLeast { lo, hi } => {
                let (min, max) = pooled.unwrap_or((lo, hi));
                BinEdges::new(lo.min(min), hi.max(max), bins)?
            }
            RangePolicy::PerWindow => {
                return Ok((
                    BinEdges::from_range(BinRange::Data, bins, reference)?,
                    BinEdges::from_range(BinRange::Data, bins, test)?,
                ));
            }
            RangePolicy::PerWindowAtLeast { lo, hi } => {
                let band = BinRange::AtLeast { lo, hi };
                return Ok((
                    BinEdges::from_range(band, bins, reference)?,
                    BinEdges::from_range(band, bins, test)?,
                ));
            }
        };
        Ok((shared, shared))
    }

    /// Probability vectors of both windows. An empty window estimates to
    /// the uniform vector.
    pub fn estimate_pair(
        &self,
        reference: &[f64],
        test: &[f64],
    ) -> Result<(ProbabilityVector, ProbabilityVector)> {
        let (ref_edges, test_edges) = self.edges(reference, test)?;
        Ok((ref_edges.estimate(reference), test_edges.estimate(test)))
    }
}

fn pooled_range(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((lo_a, hi_a)), Some((lo_b, hi_b))) => Some((lo_a.min(lo_b), hi_a.max(hi_b))),
        (Some(range), None) | (None, Some(range)) => Some(range),
        (None, None) => None,
    }
}

impl WindowComparator for WindowedComparator {
    fn compare(&self, reference: &[f64], test: &[f64]) -> Result<f64> {
        let (p, q) = self.estimate_pair(reference, test)?;
        Ok(score(
            self.config.metric,
            p.as_slice(),
            q.as_slice(),
            &self.config.divergence,
        )?)
    }

    fn name(&self) -> &str {
        self.config.metric.as_str()
    }
}
