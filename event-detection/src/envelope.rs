//! Amplitude envelopes via the analytic signal.
use crate::{
    DetectionError, DetectionResult, Real,
    signal::AnalogSignal,
    smoothing::{BoundaryMode, gaussian_filter1d},
    utils::next_fast_power,
};
use rustfft::{FftPlanner, num_complex::Complex};

/// Default standard deviation, in seconds, of the envelope smoothing kernel.
pub const DEFAULT_ENVELOPE_SIGMA: Real = 0.004;

/// Number of standard deviations covered by the envelope smoothing kernel.
const ENVELOPE_TRUNCATE: Real = 4.0;

/// Analytic signal of `data` zero padded to `length` samples.
fn analytic_signal(data: &[Real], length: usize) -> Vec<Complex<Real>> {
    let mut buffer = data
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(length)
        .collect::<Vec<_>>();

    let mut planner = FftPlanner::<Real>::new();
    planner.plan_fft_forward(length).process(&mut buffer);

    // Keep DC and Nyquist, double positive frequencies, drop negative ones.
    for (index, component) in buffer.iter_mut().enumerate() {
        let multiplier = if index == 0 || 2 * index == length {
            1.0
        } else if 2 * index < length {
            2.0
        } else {
            0.0
        };
        *component *= multiplier / length as Real;
    }

    planner.plan_fft_inverse(length).process(&mut buffer);
    buffer
}

/// Magnitude of the analytic signal of `data`, optionally smoothed.
///
/// `sigma` is in seconds and converted to samples with `fs`; zero disables smoothing.
#[tracing::instrument(skip_all, fields(num_samples = data.len(), padded_length))]
pub fn signal_envelope(data: &[Real], fs: Real, sigma: Real) -> Vec<Real> {
    if data.is_empty() {
        return Vec::new();
    }
    let length = next_fast_power(data.len());
    tracing::Span::current().record("padded_length", length);

    let envelope = analytic_signal(data, length)
        .into_iter()
        .take(data.len())
        .map(|z| z.norm())
        .collect::<Vec<_>>();
    if sigma > 0.0 {
        gaussian_filter1d(
            &envelope,
            sigma * fs,
            ENVELOPE_TRUNCATE,
            BoundaryMode::Constant,
        )
    } else {
        envelope
    }
}

impl AnalogSignal {
    /// Envelope of each contiguous segment, on the same time buffer.
    pub fn envelope(&self, sigma: Real) -> DetectionResult<AnalogSignal> {
        let fs = self.fs().ok_or(DetectionError::MissingSampleRate)?;
        let data = self
            .support()?
            .iter()
            .filter_map(|run| self.data().get(run.start..=run.stop))
            .flat_map(|segment| signal_envelope(segment, fs, sigma))
            .collect();
        self.with_data(data)
    }
}
