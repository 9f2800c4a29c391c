//! Detectors are applied by [EventIter](crate::iterators::EventIter) iterators to a
//! stream of samples.
//! They register detections in the form of a stream of events.
pub mod run_detector;

use crate::{Real, SampleIndex};
use std::fmt::Debug;

pub use run_detector::{LowerThreshold, RunDetector, ThresholdClass, UpperThreshold};

/// Implement for detectors, which take in indexed sample values and output events.
pub trait Detector: Clone {
    /// Event type for output.
    type EventType: Debug + Clone;

    /// Takes in a sample and possibly outputs an event.
    fn signal(&mut self, index: SampleIndex, value: Real) -> Option<Self::EventType>;

    /// Call when the signal has completed. If an event is in progress, it is dispatched.
    fn finish(&mut self) -> Option<Self::EventType>;
}
