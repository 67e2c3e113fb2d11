//! Drift detection of incoming batches against a fixed baseline.

use divergence_api::{BinRange, ProbabilityVector};
use divergence_core::{kl, w, BinEdges};
use monitor_api::DriftConfig;
use monitor_spi::{DriftLevel, DriftReport, MonitorError, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::ensure_finite;

/// Compares batches against a baseline histogram computed once at
/// construction.
///
/// The bin range is the baseline's min and max widened by the configured
/// margin. Batch samples outside it are dropped, or clamped into the
/// outermost bins when [`DriftConfig::clamp_outliers`] is set. A batch with
/// nothing in range estimates to the uniform vector. Checks only borrow the
/// monitor, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct DriftMonitor {
    config: DriftConfig,
    edges: BinEdges,
    baseline: ProbabilityVector,
    baseline_size: usize,
}

impl DriftMonitor {
    pub fn new(baseline: &[f64], config: DriftConfig) -> Result<Self> {
        config.validate()?;
        if baseline.is_empty() {
            return Err(MonitorError::InsufficientData {
                required: 1,
                got: 0,
            });
        }
        ensure_finite(baseline)?;

        let range = BinRange::Margin {
            fraction: config.margin,
        };
        let edges = BinEdges::from_range(range, config.bins, baseline)?;
        let distribution = edges.estimate(baseline);
        debug!(
            samples = baseline.len(),
            lo = edges.lo(),
            hi = edges.hi(),
            bins = edges.bins(),
            "drift baseline built"
        );

        Ok(Self {
            config,
            edges,
            baseline: distribution,
            baseline_size: baseline.len(),
        })
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    pub fn baseline(&self) -> &ProbabilityVector {
        &self.baseline
    }

    pub fn baseline_size(&self) -> usize {
        self.baseline_size
    }

    /// Score one batch against the baseline.
    pub fn check(&self, batch: &[f64]) -> Result<DriftReport> {
        ensure_finite(batch)?;

        let (lo, hi) = (self.edges.lo(), self.edges.hi());
        let outside = batch.iter().filter(|&&x| x < lo || x > hi).count();
        if outside == batch.len() {
            warn!(
                samples = batch.len(),
                "no batch sample inside the baseline range"
            );
        }
        let current = if self.config.clamp_outliers {
            let clamped: Vec<f64> = batch.iter().map(|x| x.clamp(lo, hi)).collect();
            self.edges.estimate(&clamped)
        } else {
            self.edges.estimate(batch)
        };
        let divergence = &self.config.divergence;

        let w_score = w(
            self.baseline.as_slice(),
            current.as_slice(),
            divergence.epsilon,
            divergence.lambda,
            true,
        )?;
        let kl_score = match kl(self.baseline.as_slice(), current.as_slice(), divergence.epsilon, true) {
            Ok(score) if score.is_finite() => score,
            _ => {
                warn!("KL divergence degenerated, reporting infinity");
                f64::INFINITY
            }
        };

        let level = DriftLevel::from_score(w_score);
        debug!(w_score, kl_score, %level, samples = batch.len(), outside, "batch checked");

        Ok(DriftReport {
            w_score,
            kl_score,
            level,
            sample_size: batch.len(),
        })
    }

    /// Score several batches in parallel; results keep the input order.
    pub fn check_many<B>(&self, batches: &[B]) -> Result<Vec<DriftReport>>
    where
        B: AsRef<[f64]> + Sync,
    {
        batches
            .par_iter()
            .map(|batch| self.check(batch.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, offset: f64) -> Vec<f64> {
        (0..n).map(|i| offset + (i as f64 * 0.618).fract() * 4.0).collect()
    }

    #[test]
    fn test_baseline_edges_have_margin() {
        let baseline = [0.0, 5.0, 10.0];
        let monitor = DriftMonitor::new(&baseline, DriftConfig::default()).unwrap();
        assert!((monitor.edges().lo() + 1.0).abs() < 1e-12);
        assert!((monitor.edges().hi() - 11.0).abs() < 1e-12);
        assert_eq!(monitor.edges().bins(), 20);
        assert_eq!(monitor.baseline().len(), 20);
    }

    #[test]
    fn test_same_distribution_is_normal() {
        let monitor = DriftMonitor::new(&ramp(1000, 0.0), DriftConfig::default()).unwrap();
        let report = monitor.check(&ramp(500, 0.0)).unwrap();
        assert_eq!(report.level, DriftLevel::Normal);
        assert_eq!(report.sample_size, 500);
        assert!(report.kl_score.is_finite());
    }

    #[test]
    fn test_shifted_batch_is_critical() {
        let monitor = DriftMonitor::new(&ramp(1000, 0.0), DriftConfig::default()).unwrap();
        let report = monitor.check(&ramp(500, 3.0)).unwrap();
        assert_eq!(report.level, DriftLevel::Critical);
        assert!(report.w_score > 0.5);
    }

    #[test]
    fn test_out_of_range_samples_are_dropped() {
        let monitor = DriftMonitor::new(&[0.0, 10.0], DriftConfig::new(4, 0.0)).unwrap();
        let report = monitor.check(&[-50.0, 50.0, 5.0, 1.0]).unwrap();
        assert_eq!(report.sample_size, 4);
        // Baseline [.5, 0, 0, .5] against the in-range half [.5, 0, .5, 0].
        assert!((report.w_score - (-0.25f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_moves_outliers_into_edge_bins() {
        let config = DriftConfig::new(4, 0.0).with_clamp_outliers(true);
        let monitor = DriftMonitor::new(&[0.0, 10.0], config).unwrap();
        let report = monitor.check(&[-50.0, 50.0, 5.0, 1.0]).unwrap();
        // Clamped batch is [.5, 0, .25, .25].
        let expected = (-0.125f64).exp() / 3.0;
        assert!((report.w_score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_fully_out_of_range_batch_is_uniform() {
        let monitor = DriftMonitor::new(&ramp(1000, 0.0), DriftConfig::default()).unwrap();
        let report = monitor.check(&ramp(500, 100.0)).unwrap();
        assert!(report.w_score.is_finite());
        assert_eq!(report.sample_size, 500);
    }

    #[test]
    fn test_check_many_preserves_order() {
        let monitor = DriftMonitor::new(&ramp(1000, 0.0), DriftConfig::default()).unwrap();
        let batches = vec![ramp(200, 0.0), ramp(200, 3.0), ramp(200, 0.0)];
        let reports = monitor.check_many(&batches).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0], monitor.check(&batches[0]).unwrap());
        assert_eq!(reports[1].level, DriftLevel::Critical);
        assert_eq!(reports[2].level, DriftLevel::Normal);
    }

    #[test]
    fn test_constant_baseline() {
        let monitor = DriftMonitor::new(&[3.0; 100], DriftConfig::default()).unwrap();
        let report = monitor.check(&[3.0; 50]).unwrap();
        assert!(report.w_score.abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch_scores_against_uniform() {
        let monitor = DriftMonitor::new(&ramp(1000, 0.0), DriftConfig::default()).unwrap();
        let report = monitor.check(&[]).unwrap();
        assert_eq!(report.sample_size, 0);
        assert!(report.w_score.is_finite());
        assert!(report.kl_score.is_finite());
    }

    #[test]
    fn test_rejects_empty_baseline_and_non_finite() {
        assert!(DriftMonitor::new(&[], DriftConfig::default()).is_err());
        let monitor = DriftMonitor::new(&[1.0, 2.0], DriftConfig::default()).unwrap();
        assert_eq!(
            monitor.check(&[1.0, f64::NAN]).unwrap_err(),
            MonitorError::NonFiniteInput { index: 1 }
        );
    }
}
