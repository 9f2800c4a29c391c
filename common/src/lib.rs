pub mod pretty;
pub mod tracer;

pub use pretty::{PrettyDuration, PrettyInt};
pub use tracer::{TracerEngine, TracerError, TracerOptions};

/// Scalar type used for samples, positions and durations throughout the workspace.
pub type Real = f64;

/// Index of a sample within a trace.
pub type SampleIndex = usize;
