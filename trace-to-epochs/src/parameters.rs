use clap::{Parser, Subcommand, ValueEnum};
use event_detection::{
    BoundaryCriteria, Real, SegmentOptions, Step,
    presets::{MuaCriteria, SpeedCriteria},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One line per epoch, grouped by channel.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct BoundaryParameters {
    /// Strict threshold marking the core of an event, defaults to mean + 3 std.
    #[clap(long)]
    pub(crate) primary: Option<Real>,

    /// Loose threshold defining the extent of an event, defaults to the mean.
    #[clap(long)]
    pub(crate) secondary: Option<Real>,

    /// Minimum duration of a run beyond the primary threshold, in seconds.
    #[clap(long)]
    pub(crate) min_threshold_length: Option<Real>,

    /// Minimum duration of an event, in seconds.
    #[clap(long)]
    pub(crate) min_length: Option<Real>,

    /// Maximum duration of an event, in seconds.
    #[clap(long)]
    pub(crate) max_length: Option<Real>,

    /// Direction of the crossing, either "above" or "below".
    #[clap(long, default_value = "above")]
    pub(crate) mode: event_detection::Mode,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct MuaParameters {
    /// Defaults to mean + 3 std of the rate.
    #[clap(long)]
    pub(crate) primary: Option<Real>,

    /// Defaults to the mean rate.
    #[clap(long)]
    pub(crate) secondary: Option<Real>,

    #[clap(long, default_value = "0.05")]
    pub(crate) min_length: Real,

    #[clap(long, default_value = "0.75")]
    pub(crate) max_length: Real,

    #[clap(long, default_value = "0")]
    pub(crate) min_threshold_length: Real,
}

#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct SpeedParameters {
    /// Defaults to 10 for running and 5 for inactivity.
    #[clap(long)]
    pub(crate) primary: Option<Real>,

    /// Defaults to 8 for running and 7 for inactivity.
    #[clap(long)]
    pub(crate) secondary: Option<Real>,

    #[clap(long)]
    pub(crate) min_length: Option<Real>,

    #[clap(long)]
    pub(crate) max_length: Option<Real>,
}

#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct SegmentParameters {
    /// Nominal spacing of the time column, inferred from the data if omitted.
    #[clap(long)]
    pub(crate) step: Option<Real>,

    /// Sort the time column before segmenting.
    #[clap(long, default_value = "false")]
    pub(crate) sort: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Mode {
    #[clap(about = "Detects events with explicit hysteresis thresholds and duration limits.")]
    Boundaries(BoundaryParameters),
    #[clap(about = "Detects high synchrony events in multiunit activity rates.")]
    Mua(MuaParameters),
    #[clap(about = "Detects running epochs in speed traces.")]
    Run(SpeedParameters),
    #[clap(about = "Detects inactive epochs in speed traces.")]
    Inactive(SpeedParameters),
    #[clap(about = "Splits the time column into contiguous segments.")]
    Segments(SegmentParameters),
}

/// Detection applied independently to every channel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Detection {
    /// The sample step is taken from each channel.
    Boundaries(BoundaryCriteria),
    Mua(MuaCriteria),
    Run(SpeedCriteria),
    Inactive(SpeedCriteria),
}

impl SpeedParameters {
    fn criteria(&self, defaults: SpeedCriteria) -> SpeedCriteria {
        SpeedCriteria {
            primary: self.primary.unwrap_or(defaults.primary),
            secondary: self.secondary.unwrap_or(defaults.secondary),
            min_length: self.min_length,
            max_length: self.max_length,
            ..defaults
        }
    }
}

impl Mode {
    /// Per channel detection, or `None` for modes that act on the time column only.
    pub(crate) fn detection(&self) -> Option<Detection> {
        match self {
            Mode::Boundaries(parameters) => Some(Detection::Boundaries(BoundaryCriteria {
                primary: parameters.primary,
                secondary: parameters.secondary,
                min_threshold_length: parameters.min_threshold_length,
                min_length: parameters.min_length,
                max_length: parameters.max_length,
                mode: parameters.mode,
                ..Default::default()
            })),
            Mode::Mua(parameters) => Some(Detection::Mua(MuaCriteria {
                primary: parameters.primary,
                secondary: parameters.secondary,
                min_length: Some(parameters.min_length),
                max_length: Some(parameters.max_length),
                min_threshold_length: Some(parameters.min_threshold_length),
            })),
            Mode::Run(parameters) => Some(Detection::Run(
                parameters.criteria(SpeedCriteria::running()),
            )),
            Mode::Inactive(parameters) => Some(Detection::Inactive(
                parameters.criteria(SpeedCriteria::inactive()),
            )),
            Mode::Segments(_) => None,
        }
    }
}

impl From<&SegmentParameters> for SegmentOptions {
    fn from(parameters: &SegmentParameters) -> Self {
        SegmentOptions {
            step: parameters.step.map(Step::Fixed).unwrap_or_default(),
            sort: parameters.sort,
        }
    }
}
