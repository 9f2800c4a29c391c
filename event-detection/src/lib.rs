//! Detection of events in sampled one dimensional signals.
//!
//! The core is a pair of single threshold passes ([find_threshold_crossings]) joined by
//! [get_event_boundaries], which widens each run above a strict primary threshold to the
//! run above a looser secondary threshold that encloses it. Around it sit containers for
//! signals and epochs, smoothing, differentiation, envelopes, spatial statistics and
//! presets for multiunit activity and speed.
pub mod boundaries;
pub mod crossings;
pub mod derivative;
pub mod detectors;
pub mod envelope;
mod error;
pub mod iterators;
mod mode;
pub mod presets;
pub mod segments;
pub mod signal;
pub mod smoothing;
pub mod spatial;
pub mod stats;
pub mod utils;

pub use boundaries::{BoundaryCriteria, EventBoundaries, get_event_boundaries};
pub use crossings::{Crossings, Run, find_threshold_crossings};
pub use epochs_common::{Real, SampleIndex};
pub use error::{DetectionError, DetectionResult, Diagnostic, FilterStage};
pub use iterators::{EventFilter, SegmentFilter};
pub use mode::Mode;
pub use segments::{SegmentOptions, Segments, Step, get_contiguous_segments};
pub use signal::{AnalogSignal, EpochArray, Interval};
