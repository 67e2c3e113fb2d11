//! Probability vector type.

use serde::Serialize;

/// A discrete probability distribution.
///
/// The only way to build one is through [`ProbabilityVector::normalize`]
/// (or [`ProbabilityVector::uniform`]), so every entry is at least the
/// epsilon floor and the entries sum to one. Values are never mutated in
/// place; transformations produce a new vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityVector(Vec<f64>);

impl ProbabilityVector {
    /// Floor every entry at `epsilon` and rescale so the entries sum to one.
    ///
    /// No sign check is performed: negative raw entries are floored like
    /// zeros, which distorts the result for callers passing signed data.
    pub fn normalize(values: &[f64], epsilon: f64) -> Self {
        let floored: Vec<f64> = values.iter().map(|&v| v.max(epsilon)).collect();
        let total: f64 = floored.iter().sum();
        Self(floored.into_iter().map(|v| v / total).collect())
    }

    /// The uniform distribution over `n` outcomes.
    pub fn uniform(n: usize) -> Self {
        Self(vec![1.0 / n as f64; n])
    }

    /// Borrow the probabilities.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the distribution has no outcomes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the vector and return the probabilities.
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    /// Iterate over the probabilities.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }
}

impl AsRef<[f64]> for ProbabilityVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sums_to_one() {
        let p = ProbabilityVector::normalize(&[1.0, 2.0, 3.0, 4.0], 1e-10);
        let total: f64 = p.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((p.as_slice()[3] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_floors_zeros() {
        let p = ProbabilityVector::normalize(&[0.5, 0.5, 0.0, 0.0], 1e-10);
        assert!(p.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_normalize_floors_negative_values() {
        let p = ProbabilityVector::normalize(&[-3.0, 1.0], 1e-10);
        assert!(p.as_slice()[0] > 0.0);
        assert!(p.as_slice()[0] < 1e-9);
    }

    #[test]
    fn test_all_zero_input_becomes_uniform() {
        let p = ProbabilityVector::normalize(&[0.0; 4], 1e-10);
        for &v in p.iter() {
            assert!((v - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uniform() {
        let u = ProbabilityVector::uniform(5);
        assert_eq!(u.len(), 5);
        assert!(u.iter().all(|&v| (v - 0.2).abs() < 1e-15));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let p = ProbabilityVector::normalize(&[1.0, 1.0], 1e-10);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[0.5,0.5]");
    }
}
