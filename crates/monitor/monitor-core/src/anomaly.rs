//! Batch anomaly detection with two adjacent sliding windows.

use monitor_api::AnomalyConfig;
use monitor_spi::{AnomalyReport, Result, WindowComparator};
use tracing::{debug, trace};

use crate::comparator::WindowedComparator;
use crate::ensure_finite;

/// Flags positions where the distribution of the last `W` values departs
/// from the `W` values before them.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
    comparator: WindowedComparator,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Result<Self> {
        config.validate()?;
        let comparator = WindowedComparator::new(config.comparator.clone())?;
        debug!(
            window_size = config.window_size,
            threshold = config.threshold,
            metric = %config.comparator.metric,
            "anomaly detector created"
        );
        Ok(Self { config, comparator })
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    pub fn comparator(&self) -> &WindowedComparator {
        &self.comparator
    }

    /// Score of position `i`, which needs `2W` values before it.
    pub(crate) fn score_at(&self, history: &[f64]) -> Result<f64> {
        let (reference, test) = history.split_at(self.config.window_size);
        self.comparator.compare(reference, test)
    }

    /// Score every position of `series`.
    ///
    /// Positions below `2W` score `0.0` and are never anomalous. Position
    /// `i` compares `[i - 2W, i - W)` against `[i - W, i)`.
    pub fn detect(&self, series: &[f64]) -> Result<AnomalyReport> {
        ensure_finite(series)?;
        let warmup = self.config.warmup();
        let mut scores = vec![0.0; series.len()];

        for i in warmup..series.len() {
            let score = self.score_at(&series[i - warmup..i])?;
            trace!(index = i, score, "window scored");
            scores[i] = score;
        }

        let threshold = self.config.threshold;
        let anomalies: Vec<usize> = scores
            .iter()
            .enumerate()
            .skip(warmup)
            .filter(|&(_, &s)| s > threshold)
            .map(|(i, _)| i)
            .collect();

        debug!(
            len = series.len(),
            anomalies = anomalies.len(),
            "anomaly scan complete"
        );

        Ok(AnomalyReport {
            anomalies,
            scores,
            threshold,
        })
    }
}
