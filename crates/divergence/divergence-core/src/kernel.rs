//! Divergence kernel.
//!
//! Pure functions computing KL, Jensen-Shannon, Hellinger and the W
//! divergence between two equal-length vectors. Every function validates
//! its inputs, rejects NaN/Inf entries, and allocates fresh buffers for the
//! normalized vectors; nothing is mutated in place.

use divergence_api::{DivergenceConfig, Metric};
use divergence_spi::{DivergenceError, ProbabilityVector, Result, WDecomposition};

/// Floor every entry at `epsilon` and divide by the new sum.
///
/// Never fails. Negative entries are floored like zeros (no sign check).
pub fn normalize(v: &[f64], epsilon: f64) -> ProbabilityVector {
    ProbabilityVector::normalize(v, epsilon)
}

/// Require two distributions of the same length.
pub fn validate(p: &[f64], q: &[f64]) -> Result<()> {
    validate_shapes(&[p.len()], &[q.len()])
}

/// Shape check for inputs that may carry nested structure.
///
/// Both shapes must be one-dimensional and of equal length.
pub fn validate_shapes(p_shape: &[usize], q_shape: &[usize]) -> Result<()> {
    for shape in [p_shape, q_shape] {
        if shape.len() != 1 {
            return Err(DivergenceError::Dimensionality { ndim: shape.len() });
        }
    }
    if p_shape[0] != q_shape[0] {
        return Err(DivergenceError::ShapeMismatch {
            left: p_shape[0],
            right: q_shape[0],
        });
    }
    Ok(())
}

/// Reject any NaN or infinite entry.
pub fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DivergenceError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Stability check run before every kernel evaluation.
pub fn check_stability(p: &[f64], q: &[f64]) -> Result<()> {
    check_finite(p)?;
    check_finite(q)
}

fn prepare(p: &[f64], q: &[f64]) -> Result<()> {
    validate(p, q)?;
    check_stability(p, q)
}

fn floor(v: &[f64], epsilon: f64) -> Vec<f64> {
    v.iter().map(|&x| x.max(epsilon)).collect()
}

/// Kullback-Leibler divergence `D(p || q) = Σ p·ln(p/q)`.
///
/// With `normalize` both vectors are floored and rescaled; otherwise they
/// are only floored at `epsilon`. Asymmetric, and unbounded when the floor
/// is tiny relative to the mass it replaces.
pub fn kl(p: &[f64], q: &[f64], epsilon: f64, normalize: bool) -> Result<f64> {
    prepare(p, q)?;
    let (p, q) = if normalize {
        (
            ProbabilityVector::normalize(p, epsilon).into_vec(),
            ProbabilityVector::normalize(q, epsilon).into_vec(),
        )
    } else {
        (floor(p, epsilon), floor(q, epsilon))
    };
    Ok(p.iter().zip(&q).map(|(&pi, &qi)| pi * (pi / qi).ln()).sum())
}

/// The W divergence.
///
/// `W(p, q) = Σ (p−q)² / (p+q+ε) · exp(−λ·|p−q|)`
///
/// Symmetric to the bit, zero on identical inputs, and finite even when
/// either vector has exact-zero bins: the `+ε` keeps the denominator away
/// from zero whether or not the inputs are normalized.
pub fn w(p: &[f64], q: &[f64], epsilon: f64, lambda: f64, normalize: bool) -> Result<f64> {
    prepare(p, q)?;
    if normalize {
        let p = ProbabilityVector::normalize(p, epsilon);
        let q = ProbabilityVector::normalize(q, epsilon);
        Ok(w_sum(p.as_slice(), q.as_slice(), epsilon, lambda))
    } else {
        Ok(w_sum(p, q, epsilon, lambda))
    }
}

#[inline]
fn w_term(pi: f64, qi: f64, epsilon: f64, lambda: f64) -> (f64, f64) {
    let diff = pi - qi;
    let chi = diff * diff / (pi + qi + epsilon);
    let smoothing = (-lambda * diff.abs()).exp();
    (chi, smoothing)
}

fn w_sum(p: &[f64], q: &[f64], epsilon: f64, lambda: f64) -> f64 {
    p.iter()
        .zip(q)
        .map(|(&pi, &qi)| {
            let (chi, smoothing) = w_term(pi, qi, epsilon, lambda);
            chi * smoothing
        })
        .sum()
}

/// Jensen-Shannon divergence, bounded by `ln 2`.
pub fn jensen_shannon(p: &[f64], q: &[f64], epsilon: f64) -> Result<f64> {
    prepare(p, q)?;
    let p = ProbabilityVector::normalize(p, epsilon);
    let q = ProbabilityVector::normalize(q, epsilon);
    let m: Vec<f64> = p.iter().zip(q.iter()).map(|(a, b)| 0.5 * (a + b)).collect();
    Ok(0.5 * kl(p.as_slice(), &m, epsilon, false)? + 0.5 * kl(q.as_slice(), &m, epsilon, false)?)
}

/// Hellinger distance, bounded by 1.
pub fn hellinger(p: &[f64], q: &[f64], epsilon: f64) -> Result<f64> {
    prepare(p, q)?;
    let p = ProbabilityVector::normalize(p, epsilon);
    let q = ProbabilityVector::normalize(q, epsilon);
    let sum: f64 = p
        .iter()
        .zip(q.iter())
        .map(|(a, b)| (a.sqrt() - b.sqrt()).powi(2))
        .sum();
    Ok((0.5 * sum).sqrt())
}

/// Score `p` against `q` with the selected metric.
///
/// This is the single dispatch point the monitors go through; every metric
/// normalizes its inputs.
pub fn score(metric: Metric, p: &[f64], q: &[f64], config: &DivergenceConfig) -> Result<f64> {
    match metric {
        Metric::W => w(p, q, config.epsilon, config.lambda, true),
        Metric::Kl => kl(p, q, config.epsilon, true),
        Metric::JensenShannon => jensen_shannon(p, q, config.epsilon),
        Metric::Hellinger => hellinger(p, q, config.epsilon),
    }
}

/// Per-bin breakdown of `w(p, q)` over the normalized vectors.
pub fn w_decomposition(p: &[f64], q: &[f64], epsilon: f64, lambda: f64) -> Result<WDecomposition> {
    prepare(p, q)?;
    let p = ProbabilityVector::normalize(p, epsilon).into_vec();
    let q = ProbabilityVector::normalize(q, epsilon).into_vec();

    let n = p.len();
    let mut chi_terms = Vec::with_capacity(n);
    let mut smoothing = Vec::with_capacity(n);
    let mut contributions = Vec::with_capacity(n);
    for (&pi, &qi) in p.iter().zip(&q) {
        let (chi, smooth) = w_term(pi, qi, epsilon, lambda);
        chi_terms.push(chi);
        smoothing.push(smooth);
        contributions.push(chi * smooth);
    }
    let total = contributions.iter().sum();

    Ok(WDecomposition {
        contributions,
        chi_terms,
        smoothing,
        total,
        p,
        q,
    })
}

/// W over two sampled densities, integrated with the trapezoid rule.
///
/// The densities are clipped at zero but not normalized; `dx` is the
/// spacing between evaluation points.
pub fn w_continuous(p: &[f64], q: &[f64], dx: f64, epsilon: f64, lambda: f64) -> Result<f64> {
    prepare(p, q)?;
    let integrand: Vec<f64> = p
        .iter()
        .zip(q)
        .map(|(&pi, &qi)| {
            let (chi, smoothing) = w_term(pi.max(0.0), qi.max(0.0), epsilon, lambda);
            chi * smoothing
        })
        .collect();
    Ok(integrand
        .windows(2)
        .map(|pair| 0.5 * (pair[0] + pair[1]) * dx)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;
    const LAMBDA: f64 = 0.5;

    #[test]
    fn test_w_identity() {
        let p = [0.4, 0.3, 0.2, 0.1];
        assert!(w(&p, &p, EPS, LAMBDA, true).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_w_symmetry() {
        let p = [0.4, 0.3, 0.2, 0.1];
        let q = [0.25, 0.25, 0.25, 0.25];
        let pq = w(&p, &q, EPS, LAMBDA, true).unwrap();
        let qp = w(&q, &p, EPS, LAMBDA, true).unwrap();
        assert_eq!(pq.to_bits(), qp.to_bits());
        assert!(pq > 0.0);
    }

    #[test]
    fn test_w_reference_value() {
        // diffs 0.15, 0.05, -0.05, -0.15; sums 0.65, 0.55, 0.45, 0.35
        let p = [0.4, 0.3, 0.2, 0.1];
        let q = [0.25, 0.25, 0.25, 0.25];
        let expected = 0.0225 / 0.65 * (-0.075f64).exp()
            + 0.0025 / 0.55 * (-0.025f64).exp()
            + 0.0025 / 0.45 * (-0.025f64).exp()
            + 0.0225 / 0.35 * (-0.075f64).exp();
        let got = w(&p, &q, EPS, LAMBDA, true).unwrap();
        assert!((got - expected).abs() < 1e-8);
    }

    #[test]
    fn test_w_disjoint_support_is_finite() {
        let p = [0.5, 0.5, 0.0, 0.0, 0.0];
        let q = [0.0, 0.0, 0.0, 0.5, 0.5];
        let score = w(&p, &q, EPS, LAMBDA, true).unwrap();
        assert!(score.is_finite());
        assert!(score > 0.0);
    }

    #[test]
    fn test_w_without_normalization_handles_zeros() {
        let p = [0.0, 0.0, 1.0];
        let q = [0.0, 0.0, 0.0];
        let score = w(&p, &q, EPS, LAMBDA, false).unwrap();
        assert!(score.is_finite());
    }

    #[test]
    fn test_lambda_downweights_large_differences() {
        let p = [0.9, 0.1];
        let q = [0.1, 0.9];
        let low = w(&p, &q, EPS, 0.0, true).unwrap();
        let high = w(&p, &q, EPS, 5.0, true).unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_w_shape_mismatch() {
        let err = w(&[1.0, 2.0, 3.0], &[1.0, 2.0], EPS, LAMBDA, true).unwrap_err();
        assert_eq!(err, DivergenceError::ShapeMismatch { left: 3, right: 2 });
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = w(&[1.0, f64::NAN], &[0.5, 0.5], EPS, LAMBDA, true).unwrap_err();
        assert_eq!(err, DivergenceError::NonFinite { index: 1 });
        assert!(kl(&[0.5, 0.5], &[f64::INFINITY, 1.0], EPS, true).is_err());
    }

    #[test]
    fn test_validate_shapes_dimensionality() {
        assert_eq!(
            validate_shapes(&[2, 3], &[6]).unwrap_err(),
            DivergenceError::Dimensionality { ndim: 2 }
        );
        assert!(validate_shapes(&[4], &[4]).is_ok());
    }

    #[test]
    fn test_kl_asymmetry() {
        let p = [0.4, 0.3, 0.2, 0.1];
        let q = [0.25, 0.25, 0.25, 0.25];
        let pq = kl(&p, &q, EPS, true).unwrap();
        let qp = kl(&q, &p, EPS, true).unwrap();
        assert!(pq > 0.0 && qp > 0.0);
        assert!((pq - qp).abs() > 1e-4);
    }

    #[test]
    fn test_kl_zero_on_identical() {
        let p = [0.2, 0.8];
        assert!(kl(&p, &p, EPS, true).unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_kl_zeros_finite_with_normalization() {
        let p = [0.5, 0.5, 0.0, 0.0, 0.0];
        let q = [0.0, 0.0, 0.0, 0.5, 0.5];
        let score = kl(&p, &q, EPS, true).unwrap();
        assert!(score.is_finite());
        assert!(score > 10.0);
    }

    #[test]
    fn test_jensen_shannon_bounds() {
        let p = [1.0, 0.0];
        let q = [0.0, 1.0];
        let js = jensen_shannon(&p, &q, EPS).unwrap();
        assert!(js > 0.0);
        assert!(js <= std::f64::consts::LN_2 + 1e-12);
    }

    #[test]
    fn test_hellinger_bounds() {
        let p = [1.0, 0.0, 0.0];
        let q = [0.0, 0.0, 1.0];
        let h = hellinger(&p, &q, EPS).unwrap();
        assert!(h > 0.99 && h <= 1.0);
        assert!(hellinger(&p, &p, EPS).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_score_dispatch() {
        let config = DivergenceConfig::default();
        let p = [0.4, 0.3, 0.2, 0.1];
        let q = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(
            score(Metric::W, &p, &q, &config).unwrap(),
            w(&p, &q, EPS, LAMBDA, true).unwrap()
        );
        assert_eq!(
            score(Metric::Kl, &p, &q, &config).unwrap(),
            kl(&p, &q, EPS, true).unwrap()
        );
        assert_eq!(
            score(Metric::Hellinger, &p, &q, &config).unwrap(),
            hellinger(&p, &q, EPS).unwrap()
        );
    }

    #[test]
    fn test_decomposition_matches_total() {
        let p = [0.4, 0.3, 0.2, 0.1];
        let q = [0.25, 0.25, 0.25, 0.25];
        let d = w_decomposition(&p, &q, EPS, LAMBDA).unwrap();
        let direct = w(&p, &q, EPS, LAMBDA, true).unwrap();
        assert!((d.total - direct).abs() < 1e-15);
        assert_eq!(d.contributions.len(), 4);
        assert!(matches!(d.dominant_bin(), Some(0) | Some(3)));
    }

    #[test]
    fn test_w_continuous_trapezoid() {
        // Constant integrand over 3 points with dx = 0.5 integrates over length 1.
        let p = [1.0, 1.0, 1.0];
        let q = [0.0, 0.0, 0.0];
        let term = 1.0 / (1.0 + EPS) * (-LAMBDA).exp();
        let got = w_continuous(&p, &q, 0.5, EPS, LAMBDA).unwrap();
        assert!((got - term).abs() < 1e-12);
    }

    #[test]
    fn test_w_continuous_clips_negative() {
        let p = [-1.0, -1.0];
        let q = [0.0, 0.0];
        assert_eq!(w_continuous(&p, &q, 1.0, EPS, LAMBDA).unwrap(), 0.0);
    }
}
