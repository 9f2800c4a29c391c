use super::Detector;
use crate::{Real, SampleIndex, crossings::Crossing, crossings::Run};
use std::marker::PhantomData;

pub trait ThresholdClass: Default + Clone {
    fn test(value: Real, threshold: Real) -> bool;
}

#[derive(Default, Debug, Clone)]
pub struct UpperThreshold {}
impl ThresholdClass for UpperThreshold {
    fn test(value: Real, threshold: Real) -> bool {
        value > threshold
    }
}

#[derive(Default, Debug, Clone)]
pub struct LowerThreshold {}
impl ThresholdClass for LowerThreshold {
    fn test(value: Real, threshold: Real) -> bool {
        value < threshold
    }
}

#[derive(Debug, Clone)]
struct PartialRun {
    /// Index of the first sample to cross.
    start: SampleIndex,
    /// Index of the latest sample to cross.
    stop: SampleIndex,
    /// Largest value seen so far, regardless of the threshold class.
    peak: Real,
}

impl PartialRun {
    fn new(index: SampleIndex, value: Real) -> Self {
        Self {
            start: index,
            stop: index,
            peak: value,
        }
    }

    fn extend(&mut self, index: SampleIndex, value: Real) {
        self.stop = index;
        if self.peak < value {
            self.peak = value;
        }
    }

    fn into_crossing(self) -> Crossing {
        Crossing {
            run: Run::new(self.start, self.stop),
            peak: self.peak,
        }
    }
}

/// Registers maximal runs of consecutive samples that pass `Class::test` against a fixed threshold.
///
/// Samples must be signalled in order of increasing, consecutive index.
#[derive(Default, Debug, Clone)]
pub struct RunDetector<Class: ThresholdClass> {
    threshold: Real,
    partial_run: Option<PartialRun>,
    phantom: PhantomData<Class>,
}

impl<Class: ThresholdClass> RunDetector<Class> {
    pub fn new(threshold: Real) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }
}

impl<Class: ThresholdClass> Detector for RunDetector<Class> {
    type EventType = Crossing;

    fn signal(&mut self, index: SampleIndex, value: Real) -> Option<Crossing> {
        if Class::test(value, self.threshold) {
            match self.partial_run.as_mut() {
                Some(partial_run) => partial_run.extend(index, value),
                None => self.partial_run = Some(PartialRun::new(index, value)),
            }
            None
        } else {
            self.partial_run.take().map(PartialRun::into_crossing)
        }
    }

    fn finish(&mut self) -> Option<Crossing> {
        self.partial_run.take().map(PartialRun::into_crossing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterators::EventFilter;

    fn crossing(start: SampleIndex, stop: SampleIndex, peak: Real) -> Option<Crossing> {
        Some(Crossing {
            run: Run::new(start, stop),
            peak,
        })
    }

    #[test]
    fn zero_data() {
        let data: [Real; 0] = [];
        let detector = RunDetector::<UpperThreshold>::new(2.0);
        let mut iter = data.into_iter().enumerate().events(detector);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_positive_threshold() {
        let data = [4, 3, 2, 5, 6, 1, 5, 7, 2, 4];
        let detector = RunDetector::<UpperThreshold>::new(2.0);
        let mut iter = data
            .into_iter()
            .map(|v| v as Real)
            .enumerate()
            .events(detector);
        assert_eq!(iter.next(), crossing(0, 1, 4.0));
        assert_eq!(iter.next(), crossing(3, 4, 6.0));
        assert_eq!(iter.next(), crossing(6, 7, 7.0));
        assert_eq!(iter.next(), crossing(9, 9, 4.0));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_negative_threshold() {
        let data = [4, 3, 2, 5, 2, 1, 5, 7, 2, 2];
        let detector = RunDetector::<LowerThreshold>::new(2.5);
        let mut iter = data
            .into_iter()
            .map(|v| v as Real)
            .enumerate()
            .events(detector);
        // The peak is the largest value inside the run, even below threshold.
        assert_eq!(iter.next(), crossing(2, 2, 2.0));
        assert_eq!(iter.next(), crossing(4, 5, 2.0));
        assert_eq!(iter.next(), crossing(8, 9, 2.0));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn equality_does_not_cross() {
        let data = [2.0, 2.0, 3.0, 2.0];
        let detector = RunDetector::<UpperThreshold>::new(2.0);
        let crossings: Vec<_> = data.into_iter().enumerate().events(detector).collect();
        assert_eq!(crossings, vec![crossing(2, 2, 3.0).expect("crossing")]);
    }

    #[test]
    fn nan_breaks_run() {
        let data = [3.0, Real::NAN, 3.0];
        let detector = RunDetector::<UpperThreshold>::new(2.0);
        let crossings: Vec<_> = data.into_iter().enumerate().events(detector).collect();
        assert_eq!(crossings.len(), 2);
    }
}
