mod channels;
mod loader;
mod output;
mod parameters;

use anyhow::Result;
use clap::Parser;
use epochs_common::{TracerEngine, TracerOptions};
use event_detection::{Real, get_contiguous_segments};
use loader::load_trace_file;
use parameters::{Mode, OutputFormat};
use std::{io::Write, path::PathBuf};
use tracing::{info, level_filters::LevelFilter, warn};

// cargo run --bin trace-to-epochs -- --input mua.csv --time-column mua --min-length 0.05

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// CSV file holding one channel per column.
    #[clap(long)]
    input: PathBuf,

    /// Sampling rate in Hz. Required unless the first column holds sample times.
    #[clap(long)]
    sample_rate: Option<Real>,

    /// The first column holds sample times, in seconds.
    #[clap(long, default_value = "false")]
    time_column: bool,

    #[clap(long, value_enum, default_value_t)]
    output_format: OutputFormat,

    /// Log level used when RUST_LOG is not set.
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,

    /// Disable coloured log output.
    #[clap(long, default_value = "false")]
    no_ansi: bool,

    #[command(subcommand)]
    mode: Mode,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _tracer = TracerEngine::new(TracerOptions {
        default_level: args.log_level,
        ansi: !args.no_ansi,
    })?;

    let table = load_trace_file(&args.input, args.time_column, args.sample_rate)?;
    let mut stdout = std::io::stdout().lock();

    if let Mode::Segments(parameters) = &args.mode {
        let segments = get_contiguous_segments(&table.time, &parameters.into())?;
        output::write_segments(&mut stdout, args.output_format, &segments)?;
    } else if let Some(detection) = args.mode.detection() {
        let signals = table.signals()?;
        let epochs = channels::find_all_epochs(&signals, &detection)?;
        for channel in epochs.iter().filter(|channel| channel.detected.is_empty()) {
            warn!("No epochs found in {}", channel.channel);
        }
        info!(
            "Found {} epochs in {} channels",
            epochs.iter().map(|channel| channel.detected.len()).sum::<usize>(),
            table.num_channels()
        );
        output::write_epochs(&mut stdout, args.output_format, &epochs)?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Detection;

    #[test]
    fn parse_boundaries() {
        let cli = Cli::try_parse_from([
            "trace-to-epochs",
            "--input",
            "trace.csv",
            "--sample-rate",
            "1000",
            "boundaries",
            "--primary",
            "4",
            "--secondary",
            "1",
            "--mode",
            "below",
        ])
        .expect("arguments");
        assert_eq!(cli.sample_rate, Some(1000.0));
        assert_eq!(cli.output_format, OutputFormat::Text);
        let Some(Detection::Boundaries(criteria)) = cli.mode.detection() else {
            panic!("expected boundary detection");
        };
        assert_eq!(criteria.primary, Some(4.0));
        assert_eq!(criteria.mode, event_detection::Mode::Below);
    }

    #[test]
    fn unsupported_mode_is_rejected() {
        assert!(
            Cli::try_parse_from([
                "trace-to-epochs",
                "--input",
                "trace.csv",
                "boundaries",
                "--mode",
                "sideways",
            ])
            .is_err()
        );
    }

    #[test]
    fn parse_mua_defaults() {
        let cli = Cli::try_parse_from([
            "trace-to-epochs",
            "--input",
            "mua.csv",
            "--time-column",
            "--output-format",
            "json",
            "mua",
        ])
        .expect("arguments");
        assert!(cli.time_column);
        assert_eq!(cli.output_format, OutputFormat::Json);
        let Some(Detection::Mua(criteria)) = cli.mode.detection() else {
            panic!("expected multiunit activity detection");
        };
        assert_eq!(criteria.min_length, Some(0.05));
        assert_eq!(criteria.max_length, Some(0.75));
    }
}
