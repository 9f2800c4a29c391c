use thiserror::Error;
use tracing::{level_filters::LevelFilter, subscriber::SetGlobalDefaultError};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Cannot install global tracing subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

/// Options for the stdout/stderr tracer.
#[derive(Debug, Clone)]
pub struct TracerOptions {
    /// Level used when `RUST_LOG` does not specify one.
    pub default_level: LevelFilter,
    /// Whether to emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self {
            default_level: LevelFilter::INFO,
            ansi: true,
        }
    }
}

/// This object initialises the tracer, given a [TracerOptions] struct.
///
/// Log lines are written to stderr so that stdout remains free for detection results.
pub struct TracerEngine {}

impl TracerEngine {
    /// Initialises the tracer for the calling component.
    /// # Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// # Returns
    /// An instance of TracerEngine, or an error if a global subscriber was already installed.
    pub fn new(options: TracerOptions) -> Result<Self, TracerError> {
        let stderr_tracer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(options.ansi);

        // This filter is applied to the stderr tracer
        let log_filter = EnvFilter::builder()
            .with_default_directive(options.default_level.into())
            .from_env_lossy();

        let subscriber =
            tracing_subscriber::Registry::default().with(stderr_tracer.with_filter(log_filter));

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(Self {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once() {
        assert!(TracerEngine::new(TracerOptions::default()).is_ok());
        assert!(matches!(
            TracerEngine::new(TracerOptions {
                default_level: LevelFilter::DEBUG,
                ansi: false,
            }),
            Err(TracerError::SetGlobalDefault(_))
        ));
    }
}
