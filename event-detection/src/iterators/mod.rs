//! Provides iterators to convert raw sample streams into runs and segments.
pub mod event;
pub mod segment;

pub use event::{EventFilter, EventIter};
pub use segment::{SegmentFilter, SegmentIter};
