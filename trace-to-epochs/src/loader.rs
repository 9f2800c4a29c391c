use anyhow::{Context, Result, bail};
use event_detection::{AnalogSignal, Real};
use ndarray::Array2;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, info};

/// Samples read from a CSV file, one column per channel.
#[derive(Debug)]
pub(crate) struct TraceTable {
    pub(crate) time: Vec<Real>,
    pub(crate) fs: Option<Real>,
    pub(crate) names: Vec<String>,
    /// One row per sample, one column per channel.
    pub(crate) samples: Array2<Real>,
}

impl TraceTable {
    pub(crate) fn num_channels(&self) -> usize {
        self.samples.ncols()
    }

    /// Pairs each channel name with its signal.
    pub(crate) fn signals(&self) -> Result<Vec<(String, AnalogSignal)>> {
        self.names
            .iter()
            .zip(self.samples.columns())
            .map(|(name, column)| {
                let signal = AnalogSignal::new(self.time.clone(), column.to_vec(), self.fs)?;
                Ok((name.clone(), signal))
            })
            .collect()
    }
}

fn parse_record(record: &csv::StringRecord) -> Option<Vec<Real>> {
    record.iter().map(|field| field.parse().ok()).collect()
}

/// Reads a table of samples.
///
/// A first row that does not parse as numbers is taken as channel names. When
/// `time_column` is set the first column holds sample times, otherwise samples are
/// spaced `1/sample_rate` apart.
pub(crate) fn load_trace_table<R: Read>(
    source: R,
    time_column: bool,
    sample_rate: Option<Real>,
) -> Result<TraceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(source);

    let mut header = None;
    let mut rows = Vec::<Vec<Real>>::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        match parse_record(&record) {
            Some(row) => rows.push(row),
            None if line == 0 => {
                debug!("Using first row as header");
                header = Some(record.iter().map(str::to_owned).collect::<Vec<_>>());
            }
            None => bail!("Row {} contains a value that is not a number", line + 1),
        }
    }

    let num_columns = rows.first().map(Vec::len).unwrap_or_default();
    let num_channels = if time_column {
        num_columns.saturating_sub(1)
    } else {
        num_columns
    };
    let skip = num_columns - num_channels;

    let time = if time_column {
        rows.iter()
            .filter_map(|row| row.first().copied())
            .collect()
    } else {
        let fs = sample_rate.context("--sample-rate is required without a time column")?;
        (0..rows.len()).map(|i| i as Real / fs).collect()
    };

    let names = match header {
        Some(header) => header.into_iter().skip(skip).collect(),
        None => (0..num_channels).map(|i| format!("channel {i}")).collect(),
    };

    let samples = Array2::from_shape_vec(
        (rows.len(), num_channels),
        rows.into_iter().flat_map(|row| row.into_iter().skip(skip)).collect(),
    )?;
    info!(
        "Loaded {} samples in {} channels",
        samples.nrows(),
        samples.ncols()
    );

    Ok(TraceTable {
        time,
        fs: sample_rate,
        names,
        samples,
    })
}

pub(crate) fn load_trace_file(
    path: &Path,
    time_column: bool,
    sample_rate: Option<Real>,
) -> Result<TraceTable> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    load_trace_table(file, time_column, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn header_and_time_column() {
        let csv = "time,left,right\n0.0,1,2\n0.5,3,4\n1.0,5,6\n";
        let table = load_trace_table(csv.as_bytes(), true, None).expect("table");
        assert_eq!(table.time, vec![0.0, 0.5, 1.0]);
        assert_eq!(table.names, vec!["left", "right"]);
        assert_eq!(table.num_channels(), 2);
        assert_eq!(table.samples.column(1).to_vec(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn evenly_spaced_without_header() {
        let csv = "1, 2\n3, 4\n";
        let table = load_trace_table(csv.as_bytes(), false, Some(4.0)).expect("table");
        assert_eq!(table.names, vec!["channel 0", "channel 1"]);
        assert_approx_eq!(table.time[1], 0.25);
        let signals = table.signals().expect("signals");
        assert_eq!(signals[0].1.data(), &[1.0, 3.0]);
        assert_eq!(signals[1].1.fs(), Some(4.0));
    }

    #[test]
    fn sample_rate_is_required_without_time() {
        assert!(load_trace_table("1\n2\n".as_bytes(), false, None).is_err());
    }

    #[test]
    fn rejects_text_after_header() {
        assert!(load_trace_table("a\n1\nb\n".as_bytes(), true, None).is_err());
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(load_trace_table("1,2\n3\n".as_bytes(), false, Some(1.0)).is_err());
    }
}
