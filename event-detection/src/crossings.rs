//! Single threshold crossing detection.
use crate::{
    Mode, Real, SampleIndex,
    detectors::{LowerThreshold, RunDetector, UpperThreshold},
    iterators::EventFilter,
};
use serde::Serialize;

/// A maximal span of samples satisfying a predicate. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Run {
    pub start: SampleIndex,
    pub stop: SampleIndex,
}

impl Run {
    pub fn new(start: SampleIndex, stop: SampleIndex) -> Self {
        debug_assert!(start <= stop);
        Self { start, stop }
    }

    /// Number of samples in the run.
    pub fn num_samples(&self) -> usize {
        self.stop - self.start + 1
    }

    /// Duration of the run when samples are `step` apart, counting both bounds.
    pub fn duration(&self, step: Real) -> Real {
        self.num_samples() as Real * step
    }

    /// True if `other` lies entirely within this run.
    pub fn contains(&self, other: &Run) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }
}

/// A run together with the largest sample value inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub run: Run,
    pub peak: Real,
}

/// Runs and peaks produced by one detector pass, in run order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Crossings {
    pub runs: Vec<Run>,
    pub peaks: Vec<Real>,
}

impl Crossings {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Run, &Real)> {
        self.runs.iter().zip(self.peaks.iter())
    }
}

impl FromIterator<Crossing> for Crossings {
    fn from_iter<T: IntoIterator<Item = Crossing>>(iter: T) -> Self {
        let (runs, peaks) = iter
            .into_iter()
            .map(|crossing| (crossing.run, crossing.peak))
            .unzip();
        Crossings { runs, peaks }
    }
}

/// Finds maximal runs where `x` is strictly above (or below) `threshold`.
///
/// The peak of each run is its maximum sample value in both modes.
#[tracing::instrument(
    skip_all,
    level = "trace",
    fields(threshold = threshold, mode = %mode, num_runs)
)]
pub fn find_threshold_crossings(x: &[Real], threshold: Real, mode: Mode) -> Crossings {
    let samples = x.iter().copied().enumerate();
    let crossings: Crossings = match mode {
        Mode::Above => samples
            .events(RunDetector::<UpperThreshold>::new(threshold))
            .collect(),
        Mode::Below => samples
            .events(RunDetector::<LowerThreshold>::new(threshold))
            .collect(),
    };
    tracing::Span::current().record("num_runs", crossings.len());
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let crossings = find_threshold_crossings(&[], 1.0, Mode::Above);
        assert!(crossings.is_empty());
        assert!(crossings.peaks.is_empty());
    }

    #[test]
    fn constant_above() {
        let crossings = find_threshold_crossings(&[1.0, 1.0, 1.0], 0.5, Mode::Above);
        assert_eq!(crossings.runs, vec![Run::new(0, 2)]);
        assert_eq!(crossings.peaks, vec![1.0]);
    }

    #[test]
    fn no_crossings() {
        let crossings = find_threshold_crossings(&[1.0, 2.0, 3.0], 3.0, Mode::Above);
        assert!(crossings.is_empty());
    }

    #[test]
    fn scenario_primary_and_secondary() {
        let x = [0.0, 2.0, 5.0, 2.0, 0.0, 0.0, 5.0, 0.0];
        let primary = find_threshold_crossings(&x, 4.0, Mode::Above);
        assert_eq!(primary.runs, vec![Run::new(2, 2), Run::new(6, 6)]);
        assert_eq!(primary.peaks, vec![5.0, 5.0]);

        let secondary = find_threshold_crossings(&x, 1.0, Mode::Above);
        assert_eq!(secondary.runs, vec![Run::new(1, 3), Run::new(6, 6)]);
        assert_eq!(secondary.peaks, vec![5.0, 5.0]);
    }

    #[test]
    fn below_reports_maximum() {
        let x = [10.0, 4.0, 1.0, 3.0, 10.0, 2.0];
        let crossings = find_threshold_crossings(&x, 5.0, Mode::Below);
        assert_eq!(crossings.runs, vec![Run::new(1, 3), Run::new(5, 5)]);
        assert_eq!(crossings.peaks, vec![4.0, 2.0]);
    }

    #[test]
    fn boundary_adjacent_runs() {
        let x = [3.0, 0.0, 3.0];
        let crossings = find_threshold_crossings(&x, 1.0, Mode::Above);
        assert_eq!(crossings.runs, vec![Run::new(0, 0), Run::new(2, 2)]);
    }

    #[test]
    fn run_duration_counts_both_bounds() {
        assert_eq!(Run::new(1, 3).num_samples(), 3);
        assert_eq!(Run::new(6, 6).duration(0.5), 0.5);
        assert!(Run::new(1, 3).contains(&Run::new(2, 2)));
        assert!(!Run::new(1, 3).contains(&Run::new(3, 4)));
    }
}
