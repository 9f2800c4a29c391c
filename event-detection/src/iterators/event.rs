//! Provides event iterators and traits for converting sample iterators into event iterators.
use crate::{Real, SampleIndex, detectors::Detector};
use tracing::trace;

/// Applies a detector to a source iterator.
#[derive(Clone)]
pub struct EventIter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    /// The data to apply the detector to.
    source: I,
    /// The detector to apply.
    detector: D,
    /// Set once the source is exhausted and the detector has been flushed.
    finished: bool,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    type Item = D::EventType;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.source.next() {
                Some((index, value)) => {
                    if let Some(event) = self.detector.signal(index, value) {
                        trace!("Event found {event:?}");
                        return Some(event);
                    }
                }
                None => {
                    self.finished = true;
                    return self.detector.finish();
                }
            }
        }
    }
}

/// Should be implemented for any iterator which supports the `events` method.
pub trait EventFilter<I, D>
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = (SampleIndex, Real)>,
    D: Detector,
{
    /// Create an [EventIter] iterator, which applies a detector to a sample source
    /// as it is consumed.
    ///
    /// # Parameters
    /// - detector: A detector which is to be applied as the iterator is consumed.
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
            finished: false,
        }
    }
}
