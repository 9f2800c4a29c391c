//! Spatial tuning statistics of rate maps.
//!
//! A rate map has one row per unit and one column per spatial bin, holding the
//! firing rate of the unit in that bin. Occupancy holds the time spent in each bin.
use crate::{DetectionError, DetectionResult, Real};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

fn occupancy_probability(
    occupancy: ArrayView1<'_, Real>,
    ratemap: ArrayView2<'_, Real>,
) -> DetectionResult<Array1<Real>> {
    if occupancy.len() != ratemap.ncols() {
        return Err(DetectionError::LengthMismatch {
            expected: ratemap.ncols(),
            actual: occupancy.len(),
        });
    }
    Ok(&occupancy / occupancy.sum())
}

/// Spatial information, in bits per spike, of each unit.
///
/// Rates below the smallest positive rate in the map are raised to it first, so
/// that empty bins do not produce undefined logarithms. Units whose map is
/// entirely zero yield `NaN`.
pub fn spatial_information(
    occupancy: ArrayView1<'_, Real>,
    ratemap: ArrayView2<'_, Real>,
) -> DetectionResult<Array1<Real>> {
    let probability = occupancy_probability(occupancy, ratemap)?;

    let background = ratemap
        .iter()
        .copied()
        .filter(|&rate| rate > 0.0)
        .min_by(Real::total_cmp);
    let ratemap = match background {
        Some(background) => ratemap.mapv(|rate| rate.max(background)),
        None => ratemap.to_owned(),
    };

    Ok(ratemap
        .axis_iter(Axis(0))
        .map(|rates| {
            let mean = rates.mean().unwrap_or(Real::NAN);
            rates
                .iter()
                .zip(probability.iter())
                .map(|(rate, p)| {
                    let ratio = rate / mean;
                    p * ratio * ratio.log2()
                })
                .sum()
        })
        .collect())
}

/// Sparsity `Σ P_i R_i / R²` of each unit, where `R` is the unit's mean rate.
pub fn spatial_sparsity(
    occupancy: ArrayView1<'_, Real>,
    ratemap: ArrayView2<'_, Real>,
) -> DetectionResult<Array1<Real>> {
    let probability = occupancy_probability(occupancy, ratemap)?;
    Ok(ratemap
        .axis_iter(Axis(0))
        .map(|rates| {
            let mean = rates.mean().unwrap_or(Real::NAN);
            rates.dot(&probability) / mean.powi(2)
        })
        .collect())
}
