//! Ready made detectors for multiunit activity and movement speed.
use crate::{
    DetectionError, DetectionResult, Diagnostic, Mode, Real,
    boundaries::{BoundaryCriteria, get_event_boundaries},
    signal::{AnalogSignal, EpochArray, Interval},
    smoothing::{SmoothingParameters, gaussian_filter},
};
use serde::Serialize;
use tracing::{debug, info};

/// Epochs found in a signal, with the peak value and thresholds behind them.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct DetectedEpochs {
    pub epochs: EpochArray,
    pub peaks: Vec<Real>,
    pub primary_threshold: Real,
    pub secondary_threshold: Real,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl DetectedEpochs {
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

/// Runs hysteresis detection on `signal` and reports the windows in the time domain.
pub fn detect_epochs(
    signal: &AnalogSignal,
    criteria: &BoundaryCriteria,
) -> DetectionResult<DetectedEpochs> {
    let boundaries = get_event_boundaries(signal.data(), criteria)?;
    Ok(DetectedEpochs {
        epochs: boundaries.epochs(signal.time())?,
        peaks: boundaries.peaks,
        primary_threshold: boundaries.primary_threshold,
        secondary_threshold: boundaries.secondary_threshold,
        diagnostics: boundaries.diagnostics,
    })
}

/// Binning and smoothing used to turn spike times into a multiunit rate.
#[derive(Debug, Clone, PartialEq)]
pub struct MuaBinning {
    /// Bin width in seconds.
    pub ds: Real,
    /// Standard deviation of the smoothing kernel in seconds, zero to disable.
    pub sigma: Real,
    /// Kernel extent in standard deviations, non-positive to disable.
    pub bandwidth: Real,
}

impl Default for MuaBinning {
    fn default() -> Self {
        Self {
            ds: 0.001,
            sigma: 0.01,
            bandwidth: 6.0,
        }
    }
}

/// Pools the spike times of all units into a multiunit firing rate, in Hz.
///
/// Bins cover `support` if given, otherwise the span of the observed spikes. The
/// returned signal is sampled at the bin centres with `fs = 1 / ds`.
#[tracing::instrument(skip_all, fields(num_units = units.len(), num_bins))]
pub fn mua_from_spike_times(
    units: &[Vec<Real>],
    binning: &MuaBinning,
    support: Option<Interval>,
) -> DetectionResult<AnalogSignal> {
    let ds = binning.ds;
    if !(ds.is_finite() && ds > 0.0) {
        return Err(DetectionError::NonPositiveStep(ds));
    }
    let spikes = || units.iter().flatten().copied();
    let span = support.or_else(|| {
        let first = spikes().min_by(Real::total_cmp)?;
        let last = spikes().max_by(Real::total_cmp)?;
        Some(Interval::new(first, last))
    });
    let Some(span) = span else {
        return AnalogSignal::new(Vec::new(), Vec::new(), Some(ds.recip()));
    };

    let num_bins = ((span.duration() / ds).ceil() as usize).max(1);
    tracing::Span::current().record("num_bins", num_bins);

    let mut counts = vec![0usize; num_bins];
    for spike in spikes().filter(|&t| span.start <= t && t <= span.stop) {
        let bin = (((spike - span.start) / ds).floor() as usize).min(num_bins - 1);
        if let Some(count) = counts.get_mut(bin) {
            *count += 1;
        }
    }

    let time = (0..num_bins)
        .map(|bin| span.start + (bin as Real + 0.5) * ds)
        .collect();
    let rate = counts.into_iter().map(|count| count as Real / ds).collect();
    let mua = AnalogSignal::new(time, rate, Some(ds.recip()))?;

    if binning.sigma != 0.0 && binning.bandwidth > 0.0 {
        debug!("Smoothing multiunit activity with sigma {}", binning.sigma);
        gaussian_filter(
            &mua,
            &SmoothingParameters {
                sigma: binning.sigma,
                bandwidth: binning.bandwidth,
            },
        )
    } else {
        Ok(mua)
    }
}

/// Criteria for high synchrony events in multiunit activity. Lengths are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MuaCriteria {
    /// Defaults to `mean + 3 * std` of the rate.
    pub primary: Option<Real>,
    /// Defaults to the mean rate.
    pub secondary: Option<Real>,
    pub min_length: Option<Real>,
    pub max_length: Option<Real>,
    pub min_threshold_length: Option<Real>,
}

impl Default for MuaCriteria {
    fn default() -> Self {
        Self {
            primary: None,
            secondary: None,
            min_length: Some(0.05),
            max_length: Some(0.75),
            min_threshold_length: Some(0.0),
        }
    }
}

/// Finds high synchrony events in a multiunit rate signal.
#[tracing::instrument(skip_all, fields(num_samples = mua.len(), num_events))]
pub fn mua_events(mua: &AnalogSignal, criteria: &MuaCriteria) -> DetectionResult<DetectedEpochs> {
    let fs = mua.fs().ok_or(DetectionError::MissingSampleRate)?;
    let detected = detect_epochs(
        mua,
        &BoundaryCriteria {
            primary: criteria.primary,
            secondary: criteria.secondary,
            min_threshold_length: criteria.min_threshold_length,
            min_length: criteria.min_length,
            max_length: criteria.max_length,
            sample_step: fs.recip(),
            mode: Mode::Above,
        },
    )?;
    tracing::Span::current().record("num_events", detected.len());
    info!("Found {} multiunit activity events", detected.len());
    Ok(detected)
}

/// Speed thresholds, in the units of the speed signal, for running and inactivity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedCriteria {
    pub primary: Real,
    pub secondary: Real,
    pub min_length: Option<Real>,
    pub max_length: Option<Real>,
    pub min_threshold_length: Option<Real>,
}

impl SpeedCriteria {
    /// Running is above 10, extending down to 8.
    pub fn running() -> Self {
        Self {
            primary: 10.0,
            secondary: 8.0,
            min_length: None,
            max_length: None,
            min_threshold_length: None,
        }
    }

    /// Inactivity is below 5, extending up to 7.
    pub fn inactive() -> Self {
        Self {
            primary: 5.0,
            secondary: 7.0,
            ..Self::running()
        }
    }

    fn boundary_criteria(
        &self,
        speed: &AnalogSignal,
        mode: Mode,
    ) -> DetectionResult<BoundaryCriteria> {
        Ok(BoundaryCriteria {
            primary: Some(self.primary),
            secondary: Some(self.secondary),
            min_threshold_length: self.min_threshold_length,
            min_length: self.min_length,
            max_length: self.max_length,
            sample_step: speed.step().ok_or(DetectionError::MissingSampleRate)?,
            mode,
        })
    }
}

impl Default for SpeedCriteria {
    fn default() -> Self {
        Self::running()
    }
}

/// Epochs in which `speed` rises above the running threshold.
#[tracing::instrument(skip_all, fields(num_samples = speed.len()))]
pub fn run_epochs(
    speed: &AnalogSignal,
    criteria: &SpeedCriteria,
) -> DetectionResult<DetectedEpochs> {
    detect_epochs(speed, &criteria.boundary_criteria(speed, Mode::Above)?)
}

/// Epochs in which `speed` falls below the inactivity threshold.
#[tracing::instrument(skip_all, fields(num_samples = speed.len()))]
pub fn inactive_epochs(
    speed: &AnalogSignal,
    criteria: &SpeedCriteria,
) -> DetectionResult<DetectedEpochs> {
    detect_epochs(speed, &criteria.boundary_criteria(speed, Mode::Below)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterStage;
    use assert_approx_eq::assert_approx_eq;

    fn unsmoothed() -> MuaBinning {
        MuaBinning {
            ds: 0.01,
            sigma: 0.0,
            bandwidth: 6.0,
        }
    }

    #[test]
    fn binning_pools_units() {
        let units = vec![vec![0.0, 0.005, 0.025], vec![0.012, 0.04]];
        let mua = mua_from_spike_times(&units, &unsmoothed(), None).expect("mua");
        assert_eq!(mua.len(), 4);
        assert_eq!(mua.fs(), Some(100.0));
        assert_approx_eq!(mua.time()[0], 0.005);
        assert_eq!(mua.data(), &[200.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn binning_within_support() {
        let units = vec![vec![0.5, 1.5, 2.5]];
        let support = Interval::new(1.0, 2.0);
        let mua = mua_from_spike_times(
            &units,
            &MuaBinning {
                ds: 0.5,
                ..unsmoothed()
            },
            Some(support),
        )
        .expect("mua");
        assert_eq!(mua.data(), &[0.0, 2.0]);
    }

    #[test]
    fn no_spikes() {
        let mua = mua_from_spike_times(&[], &MuaBinning::default(), None).expect("mua");
        assert!(mua.is_empty());
    }

    #[test]
    fn smoothing_preserves_length() {
        let units = vec![(0..100).map(|i| i as Real * 0.01).collect::<Vec<_>>()];
        let mua = mua_from_spike_times(&units, &MuaBinning::default(), None).expect("mua");
        assert_eq!(mua.len(), 990);
    }

    #[test]
    fn burst_is_detected() {
        let mut rate = vec![10.0; 1000];
        rate[500..560].fill(200.0);
        let mua = AnalogSignal::from_samples(rate, 1000.0, 0.0).expect("signal");
        let detected = mua_events(&mua, &MuaCriteria::default()).expect("events");
        assert_eq!(detected.len(), 1);
        let epoch = detected.epochs.intervals()[0];
        assert_approx_eq!(epoch.start, 0.5);
        assert_approx_eq!(epoch.stop, 0.559);
        assert_eq!(detected.peaks, vec![200.0]);
    }

    #[test]
    fn short_burst_is_rejected() {
        let mut rate = vec![10.0; 1000];
        rate[500..510].fill(200.0);
        let mua = AnalogSignal::from_samples(rate, 1000.0, 0.0).expect("signal");
        let detected = mua_events(&mua, &MuaCriteria::default()).expect("events");
        assert!(detected.is_empty());
        assert_eq!(
            detected.diagnostics,
            vec![Diagnostic::NoEventsSatisfiedCriteria(
                FilterStage::WindowDuration
            )]
        );
    }

    #[test]
    fn mua_requires_rate() {
        let mua = AnalogSignal::new(vec![0.0, 1.0], vec![0.0, 1.0], None).expect("signal");
        assert_eq!(
            mua_events(&mua, &MuaCriteria::default()),
            Err(DetectionError::MissingSampleRate)
        );
    }

    #[test]
    fn running_and_inactive() {
        let speed = AnalogSignal::from_samples(
            vec![0.0, 9.0, 12.0, 9.0, 6.0, 3.0, 6.0, 8.0],
            1.0,
            0.0,
        )
        .expect("signal");

        let running = run_epochs(&speed, &SpeedCriteria::running()).expect("running");
        assert_eq!(running.epochs.intervals(), &[Interval::new(1.0, 3.0)]);
        assert_eq!(running.peaks, vec![12.0]);

        let inactive = inactive_epochs(&speed, &SpeedCriteria::inactive()).expect("inactive");
        assert_eq!(
            inactive.epochs.intervals(),
            &[Interval::new(4.0, 6.0)]
        );
    }
}
