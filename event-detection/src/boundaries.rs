//! Dual threshold event boundary resolution.
//!
//! A primary (strict) threshold marks the core of each event and a secondary
//! (loose) threshold measures its full extent. Each primary run is widened to
//! the secondary run enclosing it, and windows are filtered by duration at two
//! scopes: the primary run and the final window.
use crate::{
    DetectionError, DetectionResult, Diagnostic, FilterStage, Mode, Real,
    crossings::{Crossings, Run, find_threshold_crossings},
    signal::EpochArray,
    stats,
};
use serde::Serialize;
use tracing::warn;

/// Thresholds and duration limits for [get_event_boundaries].
///
/// Durations are in the same unit as `sample_step` and count both bounds of a run,
/// so a run `(start, stop)` lasts `(stop - start + 1) * sample_step`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCriteria {
    /// Defaults to `mean + 3 * std` of the input.
    pub primary: Option<Real>,
    /// Defaults to the mean of the input.
    pub secondary: Option<Real>,
    /// Minimum duration of a primary run.
    pub min_threshold_length: Option<Real>,
    /// Minimum duration of an event window.
    pub min_length: Option<Real>,
    /// Maximum duration of an event window.
    pub max_length: Option<Real>,
    pub sample_step: Real,
    pub mode: Mode,
}

impl Default for BoundaryCriteria {
    fn default() -> Self {
        Self {
            primary: None,
            secondary: None,
            min_threshold_length: None,
            min_length: None,
            max_length: None,
            sample_step: 1.0,
            mode: Mode::Above,
        }
    }
}

/// Event windows in ascending order, with the values used to find them.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct EventBoundaries {
    /// Secondary threshold runs, one per event.
    pub bounds: Vec<Run>,
    /// Maximum sample value inside each window.
    pub peaks: Vec<Real>,
    /// First qualifying primary run inside each window.
    pub events: Vec<Run>,
    pub primary_threshold: Real,
    pub secondary_threshold: Real,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl EventBoundaries {
    fn empty(primary_threshold: Real, secondary_threshold: Real, stage: FilterStage) -> Self {
        let diagnostic = Diagnostic::NoEventsSatisfiedCriteria(stage);
        warn!("{diagnostic}");
        Self {
            primary_threshold,
            secondary_threshold,
            diagnostics: vec![diagnostic],
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Translates the windows to the time domain using the sample times of the input.
    pub fn epochs(&self, time: &[Real]) -> DetectionResult<EpochArray> {
        EpochArray::from_bounds(time, &self.bounds)
    }
}

struct Candidate {
    bound: Run,
    peak: Real,
    event: Run,
}

/// Finds the secondary run with the greatest start not after `primary.start`.
fn enclosing_run(secondary: &Crossings, primary: &Run) -> DetectionResult<(Run, Real)> {
    let index = secondary
        .runs
        .partition_point(|run| run.start <= primary.start)
        .checked_sub(1);
    index
        .and_then(|index| secondary.runs.get(index).zip(secondary.peaks.get(index)))
        .filter(|(run, _)| run.contains(primary))
        .map(|(&run, &peak)| (run, peak))
        .ok_or(DetectionError::UnalignedPrimaryRun {
            start: primary.start,
        })
}

/// Finds event windows in `x` by hysteresis thresholding.
///
/// Returns an empty result with a [Diagnostic::NoEventsSatisfiedCriteria] when no
/// primary run or no window survives the duration filters.
#[tracing::instrument(skip_all, fields(mode = %criteria.mode, num_samples = x.len(), num_events))]
pub fn get_event_boundaries(
    x: &[Real],
    criteria: &BoundaryCriteria,
) -> DetectionResult<EventBoundaries> {
    let primary = criteria
        .primary
        .unwrap_or_else(|| stats::mean(x) + 3.0 * stats::std(x));
    let secondary = criteria.secondary.unwrap_or_else(|| stats::mean(x));

    let step = criteria.sample_step;
    if !(step.is_finite() && step > 0.0) {
        return Err(DetectionError::NonPositiveStep(step));
    }

    // Defaulted thresholds are NaN without samples, so only a given pair is checked.
    if x.is_empty() {
        if let (Some(primary), Some(secondary)) = (criteria.primary, criteria.secondary) {
            criteria.mode.check_order(primary, secondary)?;
        }
        return Ok(EventBoundaries::empty(
            primary,
            secondary,
            FilterStage::PrimaryRuns,
        ));
    }
    criteria.mode.check_order(primary, secondary)?;

    let primary_runs = find_threshold_crossings(x, primary, criteria.mode)
        .runs
        .into_iter()
        .filter(|run| {
            criteria
                .min_threshold_length
                .is_none_or(|min| run.duration(step) >= min)
        })
        .collect::<Vec<_>>();
    if primary_runs.is_empty() {
        return Ok(EventBoundaries::empty(
            primary,
            secondary,
            FilterStage::PrimaryRuns,
        ));
    }

    let secondary_crossings = find_threshold_crossings(x, secondary, criteria.mode);

    let mut candidates = primary_runs
        .into_iter()
        .map(|event| {
            enclosing_run(&secondary_crossings, &event)
                .map(|(bound, peak)| Candidate { bound, peak, event })
        })
        .collect::<DetectionResult<Vec<_>>>()?;

    candidates.retain(|candidate| {
        let duration = candidate.bound.duration(step);
        criteria.min_length.is_none_or(|min| duration >= min)
            && criteria.max_length.is_none_or(|max| duration <= max)
    });
    if candidates.is_empty() {
        return Ok(EventBoundaries::empty(
            primary,
            secondary,
            FilterStage::WindowDuration,
        ));
    }

    // Candidates follow primary run order, so equal bounds are adjacent.
    candidates.dedup_by_key(|candidate| candidate.bound.start);

    tracing::Span::current().record("num_events", candidates.len());
    let mut boundaries = EventBoundaries {
        primary_threshold: primary,
        secondary_threshold: secondary,
        ..Default::default()
    };
    for candidate in candidates {
        boundaries.bounds.push(candidate.bound);
        boundaries.peaks.push(candidate.peak);
        boundaries.events.push(candidate.event);
    }
    Ok(boundaries)
}
