//! Regime change scanning over daily log returns.

use monitor_api::{ComparatorConfig, Metric, RangePolicy, RegimeConfig};
use monitor_spi::{RegimeReport, Result, WindowComparator};
use tracing::{debug, trace};

use crate::comparator::WindowedComparator;
use crate::ensure_finite;

/// Calculate log returns from prices, dropping non-finite results.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }

    prices
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .filter(|r| r.is_finite())
        .collect()
}

/// Scores a short recent window against the longer baseline preceding it.
#[derive(Debug, Clone)]
pub struct RegimeMonitor {
    config: RegimeConfig,
    comparator: WindowedComparator,
}

impl RegimeMonitor {
    pub fn new(config: RegimeConfig) -> Result<Self> {
        config.validate()?;
        let (lo, hi) = config.band;
        let comparator = WindowedComparator::new(
            ComparatorConfig::new(config.bins, RangePolicy::PerWindowAtLeast { lo, hi })
                .with_metric(Metric::W)
                .with_divergence(config.divergence),
        )?;
        Ok(Self { config, comparator })
    }

    pub fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// The comparator each window pair is scored with.
    pub fn comparator(&self) -> &WindowedComparator {
        &self.comparator
    }

    /// Score every position `i` in `long..n`.
    ///
    /// Baseline is `[i - long, i - short)` and the recent window
    /// `[i - short, i)`. Fewer than `long` returns gives an empty report.
    pub fn scan(&self, returns: &[f64]) -> Result<RegimeReport> {
        ensure_finite(returns)?;
        let RegimeConfig {
            short_window,
            long_window,
            ..
        } = self.config;

        let mut report = RegimeReport::default();
        if returns.len() < long_window {
            debug!(
                len = returns.len(),
                required = long_window,
                "series shorter than the baseline window"
            );
            return Ok(report);
        }

        for i in long_window..returns.len() {
            let baseline = &returns[i - long_window..i - short_window];
            let recent = &returns[i - short_window..i];
            let score = self.comparator.compare(baseline, recent)?;
            trace!(index = i, score, "regime window scored");
            report.indices.push(i);
            report.scores.push(score);
        }

        debug!(len = returns.len(), scored = report.len(), "regime scan complete");
        Ok(report)
    }

    /// [`log_returns`] followed by [`scan`](Self::scan).
    pub fn scan_prices(&self, prices: &[f64]) -> Result<RegimeReport> {
        self.scan(&log_returns(prices))
    }
}
