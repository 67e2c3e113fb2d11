//! Divergence API
//!
//! Configuration types and defaults for the divergence kernel and the
//! density estimator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use divergence_spi::{
    Divergence, DivergenceError, MetricCheck, ProbabilityVector, Result, WDecomposition,
};

/// Default epsilon floor for probabilities.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Default smoothing exponent for the W divergence.
pub const DEFAULT_LAMBDA: f64 = 0.5;

/// Floor applied to histogram densities before renormalization.
pub const DENSITY_FLOOR: f64 = 1e-10;

// ============================================================================
// Kernel Configuration
// ============================================================================

/// Parameters shared by every kernel evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergenceConfig {
    /// Minimum probability substituted for near-zero entries (default: 1e-10).
    pub epsilon: f64,
    /// Exponential downweighting of large per-bin differences (default: 0.5).
    pub lambda: f64,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            lambda: DEFAULT_LAMBDA,
        }
    }
}

impl DivergenceConfig {
    pub fn new(epsilon: f64, lambda: f64) -> Self {
        Self { epsilon, lambda }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Reject parameters that would make the kernel produce NaN.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(DivergenceError::InvalidParameter {
                name: "epsilon".to_string(),
                reason: "must be positive and finite".to_string(),
            });
        }
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(DivergenceError::InvalidParameter {
                name: "lambda".to_string(),
                reason: "must be non-negative and finite".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Metric Selection
// ============================================================================

/// Which kernel function a monitor scores with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Symmetric, zero-robust W divergence.
    #[default]
    W,
    /// Kullback-Leibler divergence D(p || q).
    Kl,
    /// Jensen-Shannon divergence.
    JensenShannon,
    /// Hellinger distance.
    Hellinger,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::W => "w",
            Metric::Kl => "kl",
            Metric::JensenShannon => "jensen_shannon",
            Metric::Hellinger => "hellinger",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DivergenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "w" => Ok(Metric::W),
            "kl" | "kullback_leibler" => Ok(Metric::Kl),
            "js" | "jsd" | "jensen_shannon" => Ok(Metric::JensenShannon),
            "hellinger" => Ok(Metric::Hellinger),
            other => Err(DivergenceError::InvalidParameter {
                name: "metric".to_string(),
                reason: format!("unknown metric '{}', use w, kl, js or hellinger", other),
            }),
        }
    }
}

// ============================================================================
// Histogram Configuration
// ============================================================================

/// Where a histogram takes its value range from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BinRange {
    /// A literal range.
    Fixed { lo: f64, hi: f64 },
    /// The sample's own minimum and maximum.
    Data,
    /// The sample's min/max widened on both sides by `fraction` of the span.
    Margin { fraction: f64 },
    /// The wider of a fixed band and the sample's min/max.
    AtLeast { lo: f64, hi: f64 },
}

impl Default for BinRange {
    fn default() -> Self {
        BinRange::Data
    }
}

/// Density estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Number of equal-width bins.
    pub bins: usize,
    /// Range source.
    pub range: BinRange,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: 10,
            range: BinRange::Data,
        }
    }
}

impl HistogramConfig {
    pub fn new(bins: usize, range: BinRange) -> Self {
        Self { bins, range }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(DivergenceError::InvalidParameter {
                name: "bins".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        match self.range {
            BinRange::Fixed { lo, hi } | BinRange::AtLeast { lo, hi } => {
                if !(lo.is_finite() && hi.is_finite()) || lo > hi {
                    return Err(DivergenceError::InvalidParameter {
                        name: "range".to_string(),
                        reason: format!("invalid bounds [{}, {}]", lo, hi),
                    });
                }
            }
            BinRange::Margin { fraction } => {
                if !(fraction.is_finite() && fraction >= 0.0) {
                    return Err(DivergenceError::InvalidParameter {
                        name: "fraction".to_string(),
                        reason: "must be non-negative and finite".to_string(),
                    });
                }
            }
            BinRange::Data => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DivergenceConfig::default();
        assert_eq!(config.epsilon, 1e-10);
        assert_eq!(config.lambda, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DivergenceConfig::default().with_lambda(2.0).with_epsilon(1e-8);
        assert_eq!(config.lambda, 2.0);
        assert_eq!(config.epsilon, 1e-8);
    }

    #[test]
    fn test_invalid_epsilon() {
        let config = DivergenceConfig::new(0.0, 0.5);
        assert!(matches!(
            config.validate(),
            Err(DivergenceError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_lambda() {
        assert!(DivergenceConfig::new(1e-10, -1.0).validate().is_err());
        assert!(DivergenceConfig::new(1e-10, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: DivergenceConfig = serde_json::from_str(r#"{"lambda": 1.5}"#).unwrap();
        assert_eq!(config.lambda, 1.5);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("W".parse::<Metric>().unwrap(), Metric::W);
        assert_eq!("kl".parse::<Metric>().unwrap(), Metric::Kl);
        assert_eq!("js".parse::<Metric>().unwrap(), Metric::JensenShannon);
        assert_eq!("hellinger".parse::<Metric>().unwrap(), Metric::Hellinger);
        assert!("chi2".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_display_round_trips() {
        for metric in [Metric::W, Metric::Kl, Metric::JensenShannon, Metric::Hellinger] {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_histogram_config_validation() {
        assert!(HistogramConfig::default().validate().is_ok());
        assert!(HistogramConfig::new(0, BinRange::Data).validate().is_err());
        assert!(HistogramConfig::new(10, BinRange::Fixed { lo: 1.0, hi: 0.0 })
            .validate()
            .is_err());
        assert!(HistogramConfig::new(10, BinRange::Margin { fraction: -0.1 })
            .validate()
            .is_err());
    }

    #[test]
    fn test_bin_range_serde_tag() {
        let range: BinRange = serde_json::from_str(r#"{"kind":"at_least","lo":-0.15,"hi":0.15}"#).unwrap();
        assert_eq!(range, BinRange::AtLeast { lo: -0.15, hi: 0.15 });
    }
}
