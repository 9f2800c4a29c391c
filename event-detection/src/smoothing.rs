//! Gaussian smoothing of sampled signals.
use crate::{DetectionError, DetectionResult, Real, signal::AnalogSignal};
use tracing::debug;

/// How samples beyond either end of the data are filled in.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Half-sample symmetric reflection, `d c b a | a b c d | d c b a`.
    #[default]
    Reflect,
    /// Zero padding.
    Constant,
}

/// Normalised Gaussian weights out to `floor(truncate * sigma + 0.5)` samples either side.
pub fn gaussian_kernel(sigma: Real, truncate: Real) -> Vec<Real> {
    let radius = (truncate * sigma + 0.5).floor().max(0.0) as isize;
    let weights = (-radius..=radius)
        .map(|offset| (-0.5 * (offset as Real / sigma).powi(2)).exp())
        .collect::<Vec<_>>();
    let total: Real = weights.iter().sum();
    weights.into_iter().map(|weight| weight / total).collect()
}

fn sample_at(data: &[Real], index: isize, boundary: BoundaryMode) -> Real {
    let length = data.len() as isize;
    let index = match boundary {
        BoundaryMode::Reflect => {
            let folded = index.rem_euclid(2 * length);
            if folded < length {
                folded
            } else {
                2 * length - 1 - folded
            }
        }
        BoundaryMode::Constant => index,
    };
    usize::try_from(index)
        .ok()
        .and_then(|index| data.get(index))
        .copied()
        .unwrap_or_default()
}

/// Convolves `data` with a Gaussian of standard deviation `sigma` samples.
///
/// A non-positive `sigma` returns the data unchanged.
pub fn gaussian_filter1d(
    data: &[Real],
    sigma: Real,
    truncate: Real,
    boundary: BoundaryMode,
) -> Vec<Real> {
    if data.is_empty() || sigma.is_nan() || sigma <= 0.0 {
        return data.to_vec();
    }
    let kernel = gaussian_kernel(sigma, truncate);
    let radius = (kernel.len() / 2) as isize;
    (0..data.len() as isize)
        .map(|index| {
            kernel
                .iter()
                .zip(-radius..=radius)
                .map(|(weight, offset)| weight * sample_at(data, index + offset, boundary))
                .sum()
        })
        .collect()
}

/// Gaussian smoothing expressed in the time domain.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingParameters {
    /// Standard deviation of the kernel, in seconds.
    pub sigma: Real,
    /// Number of standard deviations the kernel extends to either side.
    pub bandwidth: Real,
}

impl Default for SmoothingParameters {
    fn default() -> Self {
        Self {
            sigma: 0.05,
            bandwidth: 4.0,
        }
    }
}

/// Smooths each contiguous segment of `signal` independently.
#[tracing::instrument(skip_all, fields(sigma = parameters.sigma, num_samples = signal.len()))]
pub fn gaussian_filter(
    signal: &AnalogSignal,
    parameters: &SmoothingParameters,
) -> DetectionResult<AnalogSignal> {
    let fs = signal.fs().ok_or(DetectionError::MissingSampleRate)?;
    let sigma = parameters.sigma * fs;
    let support = signal.support()?;
    debug!("Smoothing {} segments with sigma {sigma} samples", support.len());

    let data = support
        .iter()
        .filter_map(|run| signal.data().get(run.start..=run.stop))
        .flat_map(|segment| {
            gaussian_filter1d(segment, sigma, parameters.bandwidth, BoundaryMode::Reflect)
        })
        .collect();
    signal.with_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let kernel = gaussian_kernel(2.0, 4.0);
        assert_eq!(kernel.len(), 17);
        assert_approx_eq!(kernel.iter().sum::<Real>(), 1.0);
        assert_approx_eq!(kernel[0], kernel[16]);
        assert_approx_eq!(kernel[3], kernel[13]);
    }

    #[test]
    fn impulse_response() {
        let mut data = vec![0.0; 21];
        data[10] = 1.0;
        let smoothed = gaussian_filter1d(&data, 1.0, 4.0, BoundaryMode::Reflect);
        assert_approx_eq!(smoothed[10], 0.398_942, 1e-4);
        assert_approx_eq!(smoothed[9], smoothed[11]);
        assert_approx_eq!(smoothed.iter().sum::<Real>(), 1.0);
    }

    #[test]
    fn reflect_preserves_constants() {
        let smoothed = gaussian_filter1d(&[3.0; 5], 2.0, 4.0, BoundaryMode::Reflect);
        for value in smoothed {
            assert_approx_eq!(value, 3.0);
        }
    }

    #[test]
    fn constant_pads_with_zeros() {
        let smoothed = gaussian_filter1d(&[3.0; 5], 1.0, 4.0, BoundaryMode::Constant);
        assert!(smoothed[0] < 3.0);
        assert!(smoothed[0] < smoothed[2]);
        assert_approx_eq!(smoothed[0], smoothed[4]);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let data = [1.0, 5.0, 2.0];
        assert_eq!(gaussian_filter1d(&data, 0.0, 4.0, BoundaryMode::Reflect), data);
        assert!(gaussian_filter1d(&[], 1.0, 4.0, BoundaryMode::Reflect).is_empty());
    }

    #[test]
    fn segments_are_smoothed_independently() {
        let signal = AnalogSignal::new(
            vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
            vec![1.0, 1.0, 1.0, 5.0, 5.0, 5.0],
            Some(1.0),
        )
        .expect("signal");
        let parameters = SmoothingParameters {
            sigma: 1.0,
            bandwidth: 4.0,
        };
        let smoothed = gaussian_filter(&signal, &parameters).expect("smoothed");
        assert_eq!(smoothed.time(), signal.time());
        for (value, expected) in smoothed.data().iter().zip(signal.data()) {
            assert_approx_eq!(*value, *expected);
        }
    }

    #[test]
    fn sample_rate_is_required() {
        let signal = AnalogSignal::new(vec![0.0, 1.0], vec![1.0, 2.0], None).expect("signal");
        assert_eq!(
            gaussian_filter(&signal, &SmoothingParameters::default()),
            Err(DetectionError::MissingSampleRate)
        );
    }
}
