//! Information measures derived from the W divergence.

use divergence_api::{DEFAULT_EPSILON, DEFAULT_LAMBDA};
use divergence_spi::{DivergenceError, ProbabilityVector, Result};

use crate::kernel::{self, check_finite};

/// Shannon entropy (nats) of the normalized, floored vector.
pub fn shannon_entropy(p: &[f64], epsilon: f64) -> Result<f64> {
    check_finite(p)?;
    if p.is_empty() {
        return Err(DivergenceError::EmptyInput);
    }
    let p = ProbabilityVector::normalize(p, epsilon);
    Ok(-p.iter().map(|&v| v * v.ln()).sum::<f64>())
}

/// W entropy: `1 − W(p, uniform)`.
///
/// Equals one for the uniform distribution and decreases as `p`
/// concentrates.
pub fn w_entropy(p: &[f64]) -> Result<f64> {
    if p.is_empty() {
        return Err(DivergenceError::EmptyInput);
    }
    let u = ProbabilityVector::uniform(p.len());
    Ok(1.0 - kernel::w(p, u.as_slice(), DEFAULT_EPSILON, DEFAULT_LAMBDA, true)?)
}

/// Cross entropy associated with W: `w_entropy(p) + KL(p || q)`.
pub fn cross_entropy_w(p: &[f64], q: &[f64]) -> Result<f64> {
    Ok(w_entropy(p)? + kernel::kl(p, q, DEFAULT_EPSILON, true)?)
}

/// Flatten a rectangular table, returning its row and column count.
fn rectangular(table: &[Vec<f64>]) -> Result<(usize, usize)> {
    let rows = table.len();
    let cols = table.first().map(Vec::len).ok_or(DivergenceError::EmptyInput)?;
    if cols == 0 {
        return Err(DivergenceError::EmptyInput);
    }
    for row in table {
        if row.len() != cols {
            return Err(DivergenceError::ShapeMismatch {
                left: cols,
                right: row.len(),
            });
        }
        check_finite(row)?;
    }
    Ok((rows, cols))
}

/// W between a table and the outer product of its marginals.
fn w_against_independence(table: &[Vec<f64>], total: f64) -> Result<f64> {
    let (_, cols) = rectangular(table)?;
    let row_marginal: Vec<f64> = table.iter().map(|r| r.iter().sum::<f64>() / total).collect();
    let col_marginal: Vec<f64> = (0..cols)
        .map(|j| table.iter().map(|r| r[j]).sum::<f64>() / total)
        .collect();

    let observed: Vec<f64> = table.iter().flatten().map(|&v| v / total).collect();
    let expected: Vec<f64> = row_marginal
        .iter()
        .flat_map(|&r| col_marginal.iter().map(move |&c| r * c))
        .collect();

    kernel::w(&observed, &expected, DEFAULT_EPSILON, DEFAULT_LAMBDA, true)
}

/// Mutual information measured with W on a joint distribution table.
pub fn mutual_information_w(joint: &[Vec<f64>]) -> Result<f64> {
    w_against_independence(joint, 1.0)
}

/// Independence statistic for a contingency table of counts.
///
/// Zero when the observed table factorizes into its marginals.
pub fn independence_w(table: &[Vec<f64>]) -> Result<f64> {
    rectangular(table)?;
    let total: f64 = table.iter().flatten().sum();
    if total <= 0.0 {
        return Err(DivergenceError::InvalidParameter {
            name: "table".to_string(),
            reason: "total count must be positive".to_string(),
        });
    }
    w_against_independence(table, total)
}
