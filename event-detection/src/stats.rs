//! Descriptive statistics used for default thresholds and step estimation.
use crate::Real;
use itertools::Itertools;

/// Arithmetic mean, `NaN` for an empty slice.
pub fn mean(x: &[Real]) -> Real {
    x.iter().sum::<Real>() / x.len() as Real
}

/// Population standard deviation, `NaN` for an empty slice.
pub fn std(x: &[Real]) -> Real {
    let mean = mean(x);
    (x.iter().map(|v| (v - mean).powi(2)).sum::<Real>() / x.len() as Real).sqrt()
}

/// Median, averaging the two central values for even lengths.
pub fn median(x: &[Real]) -> Option<Real> {
    let sorted = x.iter().copied().sorted_by(Real::total_cmp).collect::<Vec<_>>();
    let middle = sorted.len() / 2;
    if sorted.is_empty() {
        None
    } else if sorted.len() % 2 == 1 {
        sorted.get(middle).copied()
    } else {
        Some((sorted.get(middle - 1)? + sorted.get(middle)?) / 2.0)
    }
}

/// Consecutive differences `x[i+1] - x[i]`.
pub fn diff(x: &[Real]) -> Vec<Real> {
    x.iter().tuple_windows().map(|(a, b)| b - a).collect()
}
