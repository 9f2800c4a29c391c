//! Streaming counterpart of [get_contiguous_segments](crate::segments::get_contiguous_segments).
//!
//! The step cannot be inferred without buffering, so it must be supplied.
//! Positions are assumed sorted.
use crate::{Diagnostic, Real, segments::STEP_TOLERANCE, signal::Interval};
use tracing::warn;

#[derive(Clone)]
pub struct SegmentIter<I>
where
    I: Iterator<Item = Real>,
{
    source: I,
    step: Real,
    start: Option<Real>,
    previous: Option<Real>,
    gap_smaller_than_step: bool,
}

impl<I> SegmentIter<I>
where
    I: Iterator<Item = Real>,
{
    /// Returns [Diagnostic::GapSmallerThanStep] if any consumed gap was smaller than the step.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.gap_smaller_than_step
            .then_some(Diagnostic::GapSmallerThanStep(self.step))
    }
}

impl<I> Iterator for SegmentIter<I>
where
    I: Iterator<Item = Real>,
{
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        loop {
            let Some(position) = self.source.next() else {
                return self
                    .start
                    .take()
                    .zip(self.previous.take())
                    .map(|(start, stop)| Interval::new(start, stop));
            };
            match self.start.zip(self.previous) {
                Some((start, previous)) => {
                    let gap = position - previous;
                    if gap < self.step * (1.0 - STEP_TOLERANCE) && !self.gap_smaller_than_step {
                        warn!("{}", Diagnostic::GapSmallerThanStep(self.step));
                        self.gap_smaller_than_step = true;
                    }
                    self.previous = Some(position);
                    if gap >= 2.0 * self.step {
                        self.start = Some(position);
                        return Some(Interval::new(start, previous));
                    }
                }
                None => {
                    self.start = Some(position);
                    self.previous = Some(position);
                }
            }
        }
    }
}

/// Provides the `segments` method on iterators of positions.
pub trait SegmentFilter<I>
where
    I: Iterator<Item = Real>,
{
    /// Create a [SegmentIter], which splits positions into contiguous segments as it is consumed.
    ///
    /// # Parameters
    /// - step: nominal distance between consecutive positions.
    fn segments(self, step: Real) -> SegmentIter<I>;
}

impl<I> SegmentFilter<I> for I
where
    I: Iterator<Item = Real>,
{
    fn segments(self, step: Real) -> SegmentIter<I> {
        SegmentIter {
            source: self,
            step,
            start: None,
            previous: None,
            gap_smaller_than_step: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let positions: [Real; 0] = [];
        assert_eq!(positions.into_iter().segments(1.0).next(), None);
    }

    #[test]
    fn single_position() {
        let segments: Vec<_> = [4.0].into_iter().segments(1.0).collect();
        assert_eq!(segments, vec![Interval::new(4.0, 4.0)]);
    }

    #[test]
    fn breaks_on_double_step() {
        let segments: Vec<_> = [0.0, 1.0, 2.0, 5.0, 6.0, 10.0]
            .into_iter()
            .segments(1.0)
            .collect();
        assert_eq!(
            segments,
            vec![
                Interval::new(0.0, 2.0),
                Interval::new(5.0, 6.0),
                Interval::new(10.0, 10.0)
            ]
        );
    }

    #[test]
    fn jitter_below_double_step_is_contiguous() {
        let segments: Vec<_> = [0.0, 1.9, 2.5, 4.4].into_iter().segments(1.0).collect();
        assert_eq!(segments, vec![Interval::new(0.0, 4.4)]);
    }

    #[test]
    fn small_gaps_are_reported() {
        let mut iter = [0.0, 0.5, 1.5].into_iter().segments(1.0);
        assert_eq!(iter.next(), Some(Interval::new(0.0, 1.5)));
        assert_eq!(iter.diagnostic(), Some(Diagnostic::GapSmallerThanStep(1.0)));
    }
}
