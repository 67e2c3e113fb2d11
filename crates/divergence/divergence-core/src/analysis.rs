//! Sensitivity, regularization and axiom checks around the W divergence.

use divergence_api::DivergenceConfig;
use divergence_spi::{DivergenceError, MetricCheck, Result};

use crate::kernel::{self, check_finite};

/// Step used by [`w_gradient`].
const GRADIENT_STEP: f64 = 1e-7;

/// Additive (Laplace) smoothing: `(p + α) / (Σp + α·N)`.
pub fn laplace_smoothing(p: &[f64], alpha: f64) -> Result<Vec<f64>> {
    if !(alpha.is_finite() && alpha >= 0.0) {
        return Err(DivergenceError::InvalidParameter {
            name: "alpha".to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    check_finite(p)?;
    let denom = p.iter().sum::<f64>() + alpha * p.len() as f64;
    Ok(p.iter().map(|&v| (v + alpha) / denom).collect())
}

fn variance(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let n = v.len() as f64;
    let mean = v.iter().sum::<f64>() / n;
    v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}

/// Heuristic lambda from the spread of the two vectors.
///
/// `1 / (sqrt((var p + var q) / 2) + 1e-5)`: flat vectors get a large
/// lambda, peaked ones a small one.
pub fn suggest_lambda(p: &[f64], q: &[f64]) -> f64 {
    let mean_var = (variance(p) + variance(q)) / 2.0;
    1.0 / (mean_var.sqrt() + 1e-5)
}

/// Central finite-difference gradient of `w(·, q)` at the raw vector `p`.
///
/// Normalization is part of the differentiated function, so the gradient
/// is with respect to the unnormalized entries.
pub fn w_gradient(p: &[f64], q: &[f64], config: &DivergenceConfig) -> Result<Vec<f64>> {
    kernel::validate(p, q)?;
    kernel::check_stability(p, q)?;

    let mut probe = p.to_vec();
    let mut grad = Vec::with_capacity(p.len());
    for i in 0..probe.len() {
        let original = probe[i];
        probe[i] = original + GRADIENT_STEP;
        let plus = kernel::w(&probe, q, config.epsilon, config.lambda, true)?;
        probe[i] = original - GRADIENT_STEP;
        let minus = kernel::w(&probe, q, config.epsilon, config.lambda, true)?;
        probe[i] = original;
        grad.push((plus - minus) / (2.0 * GRADIENT_STEP));
    }
    Ok(grad)
}

/// W evaluated at each lambda, paired with the lambda.
pub fn lambda_sensitivity(
    p: &[f64],
    q: &[f64],
    lambdas: &[f64],
    epsilon: f64,
) -> Result<Vec<(f64, f64)>> {
    lambdas
        .iter()
        .map(|&lambda| kernel::w(p, q, epsilon, lambda, true).map(|score| (lambda, score)))
        .collect()
}

/// Check identity, symmetry, non-negativity and the triangle inequality of
/// W on the triple `(p, q, r)`.
///
/// W is a divergence, not a metric; the triangle flag is expected to fail
/// for some triples.
pub fn check_metric_axioms(
    p: &[f64],
    q: &[f64],
    r: &[f64],
    config: &DivergenceConfig,
) -> Result<MetricCheck> {
    let w = |a: &[f64], b: &[f64]| kernel::w(a, b, config.epsilon, config.lambda, true);

    let pq = w(p, q)?;
    let qp = w(q, p)?;
    let pp = w(p, p)?;
    let pr = w(p, r)?;
    let qr = w(q, r)?;

    Ok(MetricCheck {
        identity: pp < 1e-12,
        symmetry: (pq - qp).abs() < 1e-12,
        triangle: pr <= pq + qr + 1e-10,
        non_negativity: pq >= -1e-12,
    })
}
