//! Partitioning of position sequences into contiguous segments.
use crate::{
    DetectionError, DetectionResult, Diagnostic, Real, crossings::Run, signal::Interval, stats,
    utils,
};
use itertools::Itertools;
use tracing::warn;

/// Relative slack applied when comparing gaps to the step, so that accumulated
/// floating point error in evenly spaced buffers is not reported.
pub(crate) const STEP_TOLERANCE: Real = 1e-6;

/// Nominal distance between consecutive positions.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Median of the consecutive differences.
    #[default]
    Auto,
    Fixed(Real),
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct SegmentOptions {
    pub step: Step,
    /// Sort a copy of the positions before segmenting.
    pub sort: bool,
}

/// Contiguous segments of a position sequence.
///
/// `runs` index into the positions (sorted, if sorting was requested) and
/// `intervals` hold the matching first and last positions.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Segments {
    pub intervals: Vec<Interval>,
    pub runs: Vec<Run>,
    /// The step actually used, `None` when it could not be inferred.
    pub step: Option<Real>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Segments {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

fn resolve_step(positions: &[Real], step: Step) -> DetectionResult<Option<Real>> {
    match step {
        Step::Fixed(step) if step.is_finite() && step > 0.0 => Ok(Some(step)),
        Step::Fixed(step) => Err(DetectionError::NonPositiveStep(step)),
        Step::Auto => Ok(stats::median(&stats::diff(positions))),
    }
}

/// Splits `positions` wherever two consecutive positions are at least twice the step apart.
#[tracing::instrument(skip_all, fields(num_positions = positions.len(), num_segments))]
pub fn get_contiguous_segments(
    positions: &[Real],
    options: &SegmentOptions,
) -> DetectionResult<Segments> {
    let mut diagnostics = Vec::new();

    let sorted;
    let positions = if options.sort {
        sorted = positions
            .iter()
            .copied()
            .sorted_by(Real::total_cmp)
            .collect::<Vec<_>>();
        sorted.as_slice()
    } else {
        if !utils::is_sorted(positions) {
            diagnostics.push(Diagnostic::UnsortedPositions);
        }
        positions
    };

    let step = resolve_step(positions, options.step)?;
    let Some(last) = positions.len().checked_sub(1) else {
        return Ok(Segments {
            step,
            diagnostics,
            ..Default::default()
        });
    };

    let mut runs = Vec::new();
    let mut start = 0;
    let mut gap_smaller_than_step = false;
    if let Some(step) = step {
        for (index, (previous, next)) in positions.iter().tuple_windows().enumerate() {
            let gap = next - previous;
            if gap >= 2.0 * step {
                runs.push(Run::new(start, index));
                start = index + 1;
            }
            gap_smaller_than_step |= gap < step * (1.0 - STEP_TOLERANCE);
        }
    }
    runs.push(Run::new(start, last));

    if let (Step::Fixed(step), true) = (options.step, gap_smaller_than_step) {
        diagnostics.push(Diagnostic::GapSmallerThanStep(step));
    }
    for diagnostic in &diagnostics {
        warn!("{diagnostic}");
    }

    let intervals = runs
        .iter()
        .filter_map(|run| {
            positions
                .get(run.start)
                .zip(positions.get(run.stop))
                .map(|(&start, &stop)| Interval::new(start, stop))
        })
        .collect();

    tracing::Span::current().record("num_segments", runs.len());
    Ok(Segments {
        intervals,
        runs,
        step,
        diagnostics,
    })
}
