//! [`Divergence`] implementations over the kernel functions.

use divergence_api::{DivergenceConfig, Metric};
use divergence_spi::{Divergence, Result};

use crate::kernel;

/// W divergence with fixed epsilon and lambda.
#[derive(Debug, Clone, Copy, Default)]
pub struct WDivergence {
    config: DivergenceConfig,
}

impl WDivergence {
    pub fn new(config: DivergenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DivergenceConfig {
        &self.config
    }
}

impl Divergence for WDivergence {
    fn divergence(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        kernel::w(p, q, self.config.epsilon, self.config.lambda, true)
    }

    fn name(&self) -> &'static str {
        "w"
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

/// Kullback-Leibler divergence `D(p || q)`.
#[derive(Debug, Clone, Copy)]
pub struct KullbackLeibler {
    epsilon: f64,
}

impl KullbackLeibler {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for KullbackLeibler {
    fn default() -> Self {
        Self::new(divergence_api::DEFAULT_EPSILON)
    }
}

impl Divergence for KullbackLeibler {
    fn divergence(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        kernel::kl(p, q, self.epsilon, true)
    }

    fn name(&self) -> &'static str {
        "kl"
    }

    fn is_symmetric(&self) -> bool {
        false
    }
}

/// Jensen-Shannon divergence.
#[derive(Debug, Clone, Copy)]
pub struct JensenShannon {
    epsilon: f64,
}

impl JensenShannon {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for JensenShannon {
    fn default() -> Self {
        Self::new(divergence_api::DEFAULT_EPSILON)
    }
}

impl Divergence for JensenShannon {
    fn divergence(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        kernel::jensen_shannon(p, q, self.epsilon)
    }

    fn name(&self) -> &'static str {
        "jensen_shannon"
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

/// Hellinger distance.
#[derive(Debug, Clone, Copy)]
pub struct Hellinger {
    epsilon: f64,
}

impl Hellinger {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for Hellinger {
    fn default() -> Self {
        Self::new(divergence_api::DEFAULT_EPSILON)
    }
}

impl Divergence for Hellinger {
    fn divergence(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        kernel::hellinger(p, q, self.epsilon)
    }

    fn name(&self) -> &'static str {
        "hellinger"
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

/// Boxed measure for a [`Metric`] selection.
pub fn measure_for(metric: Metric, config: DivergenceConfig) -> Box<dyn Divergence> {
    match metric {
        Metric::W => Box::new(WDivergence::new(config)),
        Metric::Kl => Box::new(KullbackLeibler::new(config.epsilon)),
        Metric::JensenShannon => Box::new(JensenShannon::new(config.epsilon)),
        Metric::Hellinger => Box::new(Hellinger::new(config.epsilon)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_names_match_metric() {
        for metric in [Metric::W, Metric::Kl, Metric::JensenShannon, Metric::Hellinger] {
            let measure = measure_for(metric, DivergenceConfig::default());
            assert_eq!(measure.name(), metric.as_str());
        }
    }

    #[test]
    fn test_symmetric_measures_are_symmetric() {
        let p = [0.7, 0.2, 0.1];
        let q = [0.1, 0.3, 0.6];
        for metric in [Metric::W, Metric::JensenShannon, Metric::Hellinger] {
            let m = measure_for(metric, DivergenceConfig::default());
            assert!(m.is_symmetric());
            let diff = m.divergence(&p, &q).unwrap() - m.divergence(&q, &p).unwrap();
            assert!(diff.abs() < 1e-12, "{} not symmetric", m.name());
        }
        assert!(!KullbackLeibler::default().is_symmetric());
    }

    #[test]
    fn test_w_measure_uses_config() {
        let p = [0.9, 0.1];
        let q = [0.1, 0.9];
        let flat = WDivergence::new(DivergenceConfig::default().with_lambda(0.0));
        let steep = WDivergence::new(DivergenceConfig::default().with_lambda(3.0));
        assert!(steep.divergence(&p, &q).unwrap() < flat.divergence(&p, &q).unwrap());
        assert_eq!(steep.config().lambda, 3.0);
    }

    #[test]
    fn test_trait_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Divergence>();
    }
}
