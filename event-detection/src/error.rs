use crate::{Mode, Real};
use thiserror::Error;

pub type DetectionResult<T> = Result<T, DetectionError>;

/// Caller errors. Any of these aborts the call without a partial result.
#[derive(Debug, Error, PartialEq)]
pub enum DetectionError {
    #[error(
        "Secondary threshold {secondary} must include more data than primary threshold {primary} in mode {mode}"
    )]
    ThresholdOrder {
        mode: Mode,
        primary: Real,
        secondary: Real,
    },
    #[error("Threshold is not a number")]
    InvalidThreshold,
    #[error("Step must be positive and finite, got {0}")]
    NonPositiveStep(Real),
    #[error("Primary run starting at sample {start} is not enclosed by any secondary run")]
    UnalignedPrimaryRun { start: usize },
    #[error("Buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Sampling rate must either be specified, or be contained in the signal")]
    MissingSampleRate,
    #[error("Multidimensional arrays not supported, got shape {0:?}")]
    NotFlat(Vec<usize>),
    #[error("Signal too short: at least {required} samples required, got {length}")]
    SignalTooShort { required: usize, length: usize },
}

/// Stage of event resolution at which every candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FilterStage {
    #[strum(to_string = "primary threshold runs")]
    PrimaryRuns,
    #[strum(to_string = "window duration")]
    WindowDuration,
}

/// Recoverable conditions reported alongside a well formed result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("no events satisfied criteria at {0}")]
    NoEventsSatisfiedCriteria(FilterStage),
    #[error("positions are not sorted, segments are computed on the unsorted order")]
    UnsortedPositions,
    #[error("some steps in the data are smaller than the requested step size {0}")]
    GapSmallerThanStep(Real),
}
