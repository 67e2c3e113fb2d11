//! Monitor API
//!
//! Configuration types and builders for the comparator and the three
//! monitors built on it.

use serde::{Deserialize, Serialize};

pub use divergence_api::{DivergenceConfig, Metric};

// Re-export SPI types
pub use monitor_spi::{
    Alert, AlertSeverity, AnomalyReport, DriftLevel, DriftReport, MonitorError,
    MonitoringStream, RegimeReport, Result, WindowComparator,
};

// ============================================================================
// Comparator Configuration
// ============================================================================

/// How the shared bin range of two windows is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangePolicy {
    /// Min and max over both windows together.
    Pooled,
    /// Each window binned over its own min and max.
    #[default]
    PerWindow,
    /// A fixed interval for both windows.
    Fixed { lo: f64, hi: f64 },
    /// The wider of a fixed band and both windows' min and max.
    AtLeast { lo: f64, hi: f64 },
    /// Each window binned over the wider of a fixed band and its own min
    /// and max.
    PerWindowAtLeast { lo: f64, hi: f64 },
}

impl RangePolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            RangePolicy::Fixed { lo, hi }
            | RangePolicy::AtLeast { lo, hi }
            | RangePolicy::PerWindowAtLeast { lo, hi } => {
                if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                    return Err(MonitorError::invalid(
                        "range_policy",
                        "bounds must be finite with lo < hi",
                    ));
                }
                Ok(())
            }
            RangePolicy::Pooled | RangePolicy::PerWindow => Ok(()),
        }
    }
}

/// Windowed comparator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Histogram bins per window (default: 10).
    pub bins: usize,
    pub range_policy: RangePolicy,
    pub metric: Metric,
    pub divergence: DivergenceConfig,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            bins: 10,
            range_policy: RangePolicy::PerWindow,
            metric: Metric::W,
            divergence: DivergenceConfig::default(),
        }
    }
}

impl ComparatorConfig {
    pub fn new(bins: usize, range_policy: RangePolicy) -> Self {
        Self {
            bins,
            range_policy,
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_divergence(mut self, divergence: DivergenceConfig) -> Self {
        self.divergence = divergence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(MonitorError::invalid("bins", "must be at least 1"));
        }
        self.range_policy.validate()?;
        self.divergence.validate()?;
        Ok(())
    }
}

// ============================================================================
// Anomaly Detector Configuration
// ============================================================================

/// Sliding-window anomaly detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Length W of each of the two adjacent windows (default: 50).
    pub window_size: usize,
    /// Scores strictly above this are anomalies (default: 0.1).
    pub threshold: f64,
    pub comparator: ComparatorConfig,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            threshold: 0.1,
            comparator: ComparatorConfig::default(),
        }
    }
}

impl AnomalyConfig {
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.comparator.metric = metric;
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.comparator.bins = bins;
        self
    }

    pub fn with_range_policy(mut self, range_policy: RangePolicy) -> Self {
        self.comparator.range_policy = range_policy;
        self
    }

    pub fn with_divergence(mut self, divergence: DivergenceConfig) -> Self {
        self.comparator.divergence = divergence;
        self
    }

    /// Values consumed before the first real score.
    pub fn warmup(&self) -> usize {
        self.window_size.saturating_mul(2)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(MonitorError::invalid("window_size", "must be at least 1"));
        }
        if self.window_size.checked_mul(2).is_none() {
            return Err(MonitorError::invalid("window_size", "two windows must fit in usize"));
        }
        if !self.threshold.is_finite() {
            return Err(MonitorError::invalid("threshold", "must be finite"));
        }
        self.comparator.validate()
    }
}

// ============================================================================
// Drift Monitor Configuration
// ============================================================================

/// Baseline drift monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Histogram bins over the baseline range (default: 20).
    pub bins: usize,
    /// Fraction of the baseline span added on each side (default: 0.1).
    pub margin: f64,
    /// Clamp batch samples outside the baseline range into the outermost
    /// bins instead of dropping them (default: false).
    pub clamp_outliers: bool,
    pub divergence: DivergenceConfig,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            bins: 20,
            margin: 0.1,
            clamp_outliers: false,
            divergence: DivergenceConfig::default(),
        }
    }
}

impl DriftConfig {
    pub fn new(bins: usize, margin: f64) -> Self {
        Self {
            bins,
            margin,
            ..Self::default()
        }
    }

    pub fn with_clamp_outliers(mut self, clamp_outliers: bool) -> Self {
        self.clamp_outliers = clamp_outliers;
        self
    }

    pub fn with_divergence(mut self, divergence: DivergenceConfig) -> Self {
        self.divergence = divergence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(MonitorError::invalid("bins", "must be at least 1"));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(MonitorError::invalid("margin", "must be non-negative and finite"));
        }
        self.divergence.validate()?;
        Ok(())
    }
}

// ============================================================================
// Regime Monitor Configuration
// ============================================================================

/// Regime change monitor configuration for daily log returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Recent window length (default: 21, about one trading month).
    pub short_window: usize,
    /// Baseline span ending at the scan position (default: 252, one trading year).
    pub long_window: usize,
    /// Histogram bins (default: 50).
    pub bins: usize,
    /// Minimum bin range; widened when the data exceeds it (default: ±0.15).
    pub band: (f64, f64),
    pub divergence: DivergenceConfig,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            short_window: 21,
            long_window: 252,
            bins: 50,
            band: (-0.15, 0.15),
            divergence: DivergenceConfig::default(),
        }
    }
}

impl RegimeConfig {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            ..Self::default()
        }
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_band(mut self, lo: f64, hi: f64) -> Self {
        self.band = (lo, hi);
        self
    }

    pub fn with_divergence(mut self, divergence: DivergenceConfig) -> Self {
        self.divergence = divergence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 {
            return Err(MonitorError::invalid("short_window", "must be at least 1"));
        }
        if self.long_window <= self.short_window {
            return Err(MonitorError::invalid(
                "long_window",
                "must be greater than short_window",
            ));
        }
        if self.bins == 0 {
            return Err(MonitorError::invalid("bins", "must be at least 1"));
        }
        RangePolicy::PerWindowAtLeast {
            lo: self.band.0,
            hi: self.band.1,
        }
        .validate()?;
        self.divergence.validate()?;
        Ok(())
    }
}
