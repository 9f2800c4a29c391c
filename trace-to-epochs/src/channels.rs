use crate::parameters::Detection;
use event_detection::{
    AnalogSignal, BoundaryCriteria, DetectionError, DetectionResult,
    presets::{DetectedEpochs, detect_epochs, inactive_epochs, mua_events, run_epochs},
};
use rayon::prelude::*;
use serde::Serialize;

/// Epochs found in one channel.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChannelEpochs {
    pub(crate) channel: String,
    #[serde(flatten)]
    pub(crate) detected: DetectedEpochs,
    pub(crate) diagnostics: Vec<String>,
}

#[tracing::instrument(skip_all, fields(channel = channel, num_epochs))]
pub(crate) fn find_channel_epochs(
    channel: &str,
    signal: &AnalogSignal,
    detection: &Detection,
) -> DetectionResult<ChannelEpochs> {
    let detected = match detection {
        Detection::Boundaries(criteria) => detect_epochs(
            signal,
            &BoundaryCriteria {
                sample_step: signal.step().ok_or(DetectionError::MissingSampleRate)?,
                ..criteria.clone()
            },
        )?,
        Detection::Mua(criteria) => mua_events(signal, criteria)?,
        Detection::Run(criteria) => run_epochs(signal, criteria)?,
        Detection::Inactive(criteria) => inactive_epochs(signal, criteria)?,
    };
    tracing::Span::current().record("num_epochs", detected.len());
    Ok(ChannelEpochs {
        channel: channel.to_owned(),
        diagnostics: detected
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect(),
        detected,
    })
}

/// Runs `detection` on every channel, in parallel.
#[tracing::instrument(skip_all, fields(num_channels = signals.len()))]
pub(crate) fn find_all_epochs(
    signals: &[(String, AnalogSignal)],
    detection: &Detection,
) -> DetectionResult<Vec<ChannelEpochs>> {
    signals
        .par_iter()
        .map(|(channel, signal)| find_channel_epochs(channel, signal, detection))
        .collect()
}
