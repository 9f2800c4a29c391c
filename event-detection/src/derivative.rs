use crate::{
    DetectionError, DetectionResult, Real,
    signal::AnalogSignal,
    smoothing::{SmoothingParameters, gaussian_filter},
};
use itertools::Itertools;

/// Per sample first differences: central in the interior, one sided at either end.
pub fn gradient(data: &[Real]) -> Vec<Real> {
    match data {
        [] => Vec::new(),
        [_] => vec![0.0],
        [first, second, ..] => {
            let head = second - first;
            let interior = data.iter().tuple_windows().map(|(a, _, c)| (c - a) / 2.0);
            let tail = match data {
                [.., penultimate, last] => last - penultimate,
                _ => head,
            };
            std::iter::once(head)
                .chain(interior)
                .chain(std::iter::once(tail))
                .collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeOptions {
    /// Take the absolute value of the derivative.
    pub rectify: bool,
    /// Smooth the derivative with `smoothing`.
    pub smooth: bool,
    pub smoothing: SmoothingParameters,
}

impl Default for DerivativeOptions {
    fn default() -> Self {
        Self {
            rectify: true,
            smooth: false,
            smoothing: SmoothingParameters::default(),
        }
    }
}

/// Time derivative of `signal`, computed separately on each contiguous segment.
#[tracing::instrument(skip_all, fields(rectify = options.rectify, smooth = options.smooth))]
pub fn dxdt(signal: &AnalogSignal, options: &DerivativeOptions) -> DetectionResult<AnalogSignal> {
    let fs = signal.fs().ok_or(DetectionError::MissingSampleRate)?;
    let data = signal
        .support()?
        .iter()
        .filter_map(|run| signal.data().get(run.start..=run.stop))
        .flat_map(gradient)
        .map(|slope| slope * fs)
        .map(|slope| if options.rectify { slope.abs() } else { slope })
        .collect();
    let derivative = signal.with_data(data)?;
    if options.smooth {
        gaussian_filter(&derivative, &options.smoothing)
    } else {
        Ok(derivative)
    }
}
