use crate::{channels::ChannelEpochs, parameters::OutputFormat};
use epochs_common::{PrettyDuration, PrettyInt};
use event_detection::{Interval, Real, Segments};
use serde::Serialize;
use std::io::{Error, Write};

/// Implement for items which are listed one per line in text output.
pub(crate) trait ListingLine {
    fn write_line<W: Write>(&self, out: &mut W) -> Result<(), Error>;
}

impl ListingLine for Interval {
    fn write_line<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        writeln!(out, "  {self} {}", PrettyDuration(self.duration()))
    }
}

impl ListingLine for (&Interval, &Real) {
    fn write_line<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        writeln!(
            out,
            "  {} {} peak {}",
            self.0,
            PrettyDuration(self.0.duration()),
            self.1
        )
    }
}

pub(crate) trait WriteListing<I>
where
    I: Iterator,
    I::Item: ListingLine,
{
    fn write_listing<W: Write>(self, out: &mut W) -> Result<(), Error>;
}

impl<I> WriteListing<I> for I
where
    I: Iterator,
    I::Item: ListingLine,
{
    fn write_listing<W: Write>(self, out: &mut W) -> Result<(), Error> {
        for item in self {
            item.write_line(out)?;
        }
        Ok(())
    }
}

pub(crate) fn write_epochs<W: Write>(
    out: &mut W,
    format: OutputFormat,
    channels: &[ChannelEpochs],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for channel in channels {
                let detected = &channel.detected;
                writeln!(
                    out,
                    "{}: {} epochs, primary threshold {}, secondary threshold {}",
                    channel.channel,
                    PrettyInt(detected.len() as i64),
                    detected.primary_threshold,
                    detected.secondary_threshold
                )?;
                detected
                    .epochs
                    .iter()
                    .zip(detected.peaks.iter())
                    .write_listing(out)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, channels)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct SegmentReport<'a> {
    step: Option<Real>,
    segments: &'a [Interval],
    diagnostics: Vec<String>,
}

pub(crate) fn write_segments<W: Write>(
    out: &mut W,
    format: OutputFormat,
    segments: &Segments,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(
                out,
                "{} segments, step {}",
                PrettyInt(segments.len() as i64),
                segments
                    .step
                    .map(|step| PrettyDuration(step).to_string())
                    .unwrap_or_else(|| "unknown".to_owned())
            )?;
            segments.intervals.iter().copied().write_listing(out)?;
        }
        OutputFormat::Json => {
            let report = SegmentReport {
                step: segments.step,
                segments: &segments.intervals,
                diagnostics: segments.diagnostics.iter().map(ToString::to_string).collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
