//! Resampling inference for the W divergence.
//!
//! All randomness comes from the caller's [`Rng`], so results are
//! reproducible with a seeded generator.

use divergence_api::{DivergenceConfig, DEFAULT_EPSILON};
use divergence_spi::{DivergenceError, ProbabilityVector, Result};
use rand::Rng;
use rand_distr::Exp1;

use crate::histogram::{data_range, BinEdges};
use crate::kernel::{self, check_finite};

/// Bootstrap distribution of W between two raw samples.
///
/// Each replicate resamples both inputs with replacement and histograms
/// them on `bins` bins over the pooled range of the original samples.
pub fn bootstrap_w<R: Rng>(
    sample_p: &[f64],
    sample_q: &[f64],
    n_boot: usize,
    bins: usize,
    config: &DivergenceConfig,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if sample_p.is_empty() || sample_q.is_empty() {
        return Err(DivergenceError::EmptyInput);
    }
    check_finite(sample_p)?;
    check_finite(sample_q)?;

    let (lo_p, hi_p) = data_range(sample_p).ok_or(DivergenceError::EmptyInput)?;
    let (lo_q, hi_q) = data_range(sample_q).ok_or(DivergenceError::EmptyInput)?;
    let edges = BinEdges::new(lo_p.min(lo_q), hi_p.max(hi_q), bins)?;

    let mut resample_p = vec![0.0; sample_p.len()];
    let mut resample_q = vec![0.0; sample_q.len()];
    let mut scores = Vec::with_capacity(n_boot);
    for _ in 0..n_boot {
        fill_resample(sample_p, &mut resample_p, rng);
        fill_resample(sample_q, &mut resample_q, rng);
        let p = edges.estimate(&resample_p);
        let q = edges.estimate(&resample_q);
        scores.push(kernel::w(
            p.as_slice(),
            q.as_slice(),
            config.epsilon,
            config.lambda,
            true,
        )?);
    }
    Ok(scores)
}

fn fill_resample<R: Rng>(source: &[f64], target: &mut [f64], rng: &mut R) {
    for slot in target.iter_mut() {
        *slot = source[rng.gen_range(0..source.len())];
    }
}

/// Percentile with linear interpolation between order statistics.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Two-sided percentile interval at level `1 − alpha`.
pub fn confidence_interval(values: &[f64], alpha: f64) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(DivergenceError::EmptyInput);
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(DivergenceError::InvalidParameter {
            name: "alpha".to_string(),
            reason: "must lie in (0, 1)".to_string(),
        });
    }
    check_finite(values)?;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok((
        percentile(&sorted, 100.0 * alpha / 2.0),
        percentile(&sorted, 100.0 * (1.0 - alpha / 2.0)),
    ))
}

/// Draw from the flat Dirichlet over `dim` outcomes.
fn flat_dirichlet<R: Rng>(dim: usize, rng: &mut R) -> ProbabilityVector {
    // Normalized Exp(1) variates.
    let draws: Vec<f64> = (0..dim).map(|_| rng.sample::<f64, _>(Exp1)).collect();
    ProbabilityVector::normalize(&draws, DEFAULT_EPSILON)
}

/// W between `n_sim` independent pairs of flat-Dirichlet distributions.
pub fn monte_carlo_null<R: Rng>(
    n_sim: usize,
    dim: usize,
    config: &DivergenceConfig,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if dim == 0 {
        return Err(DivergenceError::InvalidParameter {
            name: "dim".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    (0..n_sim)
        .map(|_| {
            let p = flat_dirichlet(dim, rng);
            let q = flat_dirichlet(dim, rng);
            kernel::w(p.as_slice(), q.as_slice(), config.epsilon, config.lambda, true)
        })
        .collect()
}

/// Fraction of the null scores at least as large as `observed`.
pub fn empirical_p_value(observed: f64, null_scores: &[f64]) -> Result<f64> {
    if null_scores.is_empty() {
        return Err(DivergenceError::EmptyInput);
    }
    let exceed = null_scores.iter().filter(|&&s| s >= observed).count();
    Ok(exceed as f64 / null_scores.len() as f64)
}
