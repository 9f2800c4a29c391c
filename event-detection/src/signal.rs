//! Containers for sampled signals and the epochs detected in them.
use crate::{
    DetectionError, DetectionResult, Real,
    crossings::Run,
    segments::{SegmentOptions, Step, get_contiguous_segments},
    stats, utils,
};
use epochs_common::{PrettyDuration, PrettyInt};
use ndarray::ArrayViewD;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A closed interval in the time (or position) domain.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub start: Real,
    pub stop: Real,
}

impl Interval {
    pub fn new(start: Real, stop: Real) -> Self {
        Self { start, stop }
    }

    pub fn duration(&self) -> Real {
        self.stop - self.start
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.stop)
    }
}

/// Ordered collection of time-domain epochs.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct EpochArray {
    intervals: Vec<Interval>,
}

impl EpochArray {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// Translates inclusive index bounds into epochs using the aligned `time` buffer.
    pub fn from_bounds(time: &[Real], bounds: &[Run]) -> DetectionResult<Self> {
        bounds
            .iter()
            .map(|run| {
                let start = time.get(run.start);
                let stop = time.get(run.stop);
                start
                    .zip(stop)
                    .map(|(&start, &stop)| Interval::new(start, stop))
                    .ok_or(DetectionError::LengthMismatch {
                        expected: run.stop + 1,
                        actual: time.len(),
                    })
            })
            .collect::<DetectionResult<_>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn durations(&self) -> Vec<Real> {
        self.intervals.iter().map(Interval::duration).collect()
    }

    pub fn total_duration(&self) -> PrettyDuration {
        PrettyDuration(self.durations().iter().sum())
    }
}

impl Display for EpochArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "<EpochArray: {} epochs> of length {}",
            PrettyInt(self.len() as i64),
            self.total_duration()
        )?;
        for interval in &self.intervals {
            writeln!(f, "{interval} {}", PrettyDuration(interval.duration()))?;
        }
        Ok(())
    }
}

/// A single channel of regularly (or nearly regularly) sampled data.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct AnalogSignal {
    time: Vec<Real>,
    data: Vec<Real>,
    fs: Option<Real>,
}

impl AnalogSignal {
    /// Creates a signal from aligned time and sample buffers.
    pub fn new(time: Vec<Real>, data: Vec<Real>, fs: Option<Real>) -> DetectionResult<Self> {
        if time.len() != data.len() {
            return Err(DetectionError::LengthMismatch {
                expected: time.len(),
                actual: data.len(),
            });
        }
        if let Some(fs) = fs {
            if !(fs.is_finite() && fs > 0.0) {
                return Err(DetectionError::NonPositiveStep(fs));
            }
        }
        Ok(Self { time, data, fs })
    }

    /// Creates a signal sampled every `1/fs` seconds starting at `t0`.
    pub fn from_samples(data: Vec<Real>, fs: Real, t0: Real) -> DetectionResult<Self> {
        let time = (0..data.len()).map(|i| t0 + i as Real / fs).collect();
        Self::new(time, data, Some(fs))
    }

    /// Creates a signal from an array which must be flat once unit axes are removed.
    pub fn from_array(
        time: Vec<Real>,
        data: ArrayViewD<'_, Real>,
        fs: Option<Real>,
    ) -> DetectionResult<Self> {
        Self::new(time, utils::squeeze(data)?, fs)
    }

    /// Returns a signal with the same time buffer and sampling rate, but new samples.
    pub(crate) fn with_data(&self, data: Vec<Real>) -> DetectionResult<Self> {
        Self::new(self.time.clone(), data, self.fs)
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn data(&self) -> &[Real] {
        &self.data
    }

    pub fn fs(&self) -> Option<Real> {
        self.fs
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mean(&self) -> Real {
        stats::mean(&self.data)
    }

    pub fn std(&self) -> Real {
        stats::std(&self.data)
    }

    /// Sample period: `1/fs` if known, otherwise the median spacing of the time buffer.
    pub fn step(&self) -> Option<Real> {
        self.fs
            .map(Real::recip)
            .or_else(|| stats::median(&stats::diff(&self.time)))
    }

    /// Index ranges of the contiguous stretches of the time buffer.
    ///
    /// Filters and derivatives are applied to each of these independently.
    pub fn support(&self) -> DetectionResult<Vec<Run>> {
        let step = match self.fs {
            Some(fs) => Step::Fixed(fs.recip()),
            None => Step::Auto,
        };
        let segments = get_contiguous_segments(&self.time, &SegmentOptions { step, sort: false })?;
        Ok(segments.runs)
    }
}
