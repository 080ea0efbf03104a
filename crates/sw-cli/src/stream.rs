//! Running order statistics over a whitespace-separated stream of numbers.

use std::io::{BufRead, Write};

use anyhow::Context;
use serde::Serialize;
use sw_core::{SortedWindow, WindowStats};

/// Window of samples ordered by IEEE 754 total order, so NaN has a place.
pub type SampleWindow = SortedWindow<f64, fn(&f64, &f64) -> bool>;

pub fn total_less(a: &f64, b: &f64) -> bool {
    a.total_cmp(b).is_lt()
}

pub fn sample_window(capacity: usize) -> SampleWindow {
    SortedWindow::with_less(capacity, total_less)
}

/// Plain-mode placeholder for a statistic of an empty window.
const EMPTY_STAT: &str = "-";

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Plain { precision: usize },
    Json,
}

#[derive(Serialize)]
struct Sample {
    value: f64,
    #[serde(flatten)]
    stats: WindowStats<f64>,
}

/// Push every number read from `reader` and write one line of statistics
/// per sample. Returns the number of samples processed.
pub fn run<R, W>(reader: R, mut writer: W, window: &mut SampleWindow, format: Format) -> anyhow::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut samples = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .with_context(|| format!("line {}: {token:?} is not a number", line_no + 1))?;
            window.push_back(value);
            samples += 1;

            match format {
                Format::Plain { precision } => {
                    let stat = |found: Option<&f64>| match found {
                        Some(stat) => format!("{stat:.precision$}"),
                        None => EMPTY_STAT.to_owned(),
                    };
                    writeln!(
                        writer,
                        "{value:.precision$} {} {} {}",
                        stat(window.min().ok()),
                        stat(window.median().ok()),
                        stat(window.max().ok()),
                    )?;
                }
                Format::Json => {
                    let sample = Sample {
                        value,
                        stats: window.stats(),
                    };
                    serde_json::to_writer(&mut writer, &sample)?;
                    writeln!(writer)?;
                }
            }
        }
    }
    writer.flush()?;
    tracing::debug!(samples, len = window.len(), "stream finished");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_str(input: &str, capacity: usize, format: Format) -> anyhow::Result<String> {
        let mut window = sample_window(capacity);
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out, &mut window, format)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_plain_output_tracks_median() {
        let out = run_str("3 1\n2\n", 3, Format::Plain { precision: 1 }).unwrap();
        assert_eq!(out, "3.0 3.0 3.0 3.0\n1.0 1.0 1.0 3.0\n2.0 1.0 2.0 3.0\n");
    }

    #[test]
    fn test_json_output_flattens_stats() {
        let out = run_str("5", 2, Format::Json).unwrap();
        assert_eq!(
            out,
            "{\"value\":5.0,\"len\":1,\"capacity\":2,\"min\":5.0,\"median\":5.0,\"max\":5.0}\n"
        );
    }

    #[test]
    fn test_bad_token_reports_line() {
        let err = run_str("1 2\nthree\n", 4, Format::Json).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_zero_capacity_stream_prints_placeholders() {
        let plain = run_str("1 2", 0, Format::Plain { precision: 0 }).unwrap();
        assert_eq!(plain, "1 - - -\n2 - - -\n");

        let json = run_str("1", 0, Format::Json).unwrap();
        assert_eq!(
            json,
            "{\"value\":1.0,\"len\":0,\"capacity\":0,\"min\":null,\"median\":null,\"max\":null}\n"
        );
    }

    #[test]
    fn test_total_order_places_nan_last() {
        let mut window = sample_window(3);
        window.extend([f64::NAN, 1.0, -1.0]);
        assert_eq!(window.min(), Ok(&-1.0));
        assert_eq!(window.median(), Ok(&1.0));
        assert!(window.max().unwrap().is_nan());
    }
}
