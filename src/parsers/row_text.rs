//! # Row-oriented payload reader
//!
//! Ordinary-tier payloads are plain text, one native bin per line:
//!
//! ```text
//! # IJD            dt     counts
//! 6195.04587940    0.05   17412
//! 6195.04588000    0.05   17390
//! ```
//!
//! Column layout
//! -----------------
//! * column 0 – bin time stamp in **IJD** (fractional days)
//! * column 1 – ignored by the pipeline
//! * column 2 – counts recorded in the bin
//!
//! Blank lines and lines starting with `#` are skipped. Any other line must provide
//! the three columns above; the first offending line aborts the parse with
//! [`LightCurveError::Parse`].
use crate::spiacs_errors::LightCurveError;

use super::{ensure_min_rows, ParsedPayload, PayloadParser, RawSample};

const TIME_COLUMN: usize = 0;
const COUNTS_COLUMN: usize = 2;
const MIN_COLUMNS: usize = 3;

/// Parser for the ordinary-tier text format.
#[derive(Debug, Default, Clone, Copy)]
pub struct RowTextParser;

fn parse_field(field: &str, name: &str, line_number: usize) -> Result<f64, LightCurveError> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LightCurveError::Parse(format!(
            "line {line_number}: invalid {name} value {field:?}"
        ))),
    }
}

/// Parse a single data line into a [`RawSample`].
///
/// `line_number` is 1-based and only used in error messages.
fn parse_row(line: &str, line_number: usize) -> Result<RawSample, LightCurveError> {
    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() < MIN_COLUMNS {
        return Err(LightCurveError::Parse(format!(
            "line {line_number}: expected at least {MIN_COLUMNS} columns, found {}",
            columns.len()
        )));
    }

    let ijd = parse_field(columns[TIME_COLUMN], "time", line_number)?;
    let counts = parse_field(columns[COUNTS_COLUMN], "counts", line_number)?;
    if counts < 0.0 {
        return Err(LightCurveError::Parse(format!(
            "line {line_number}: negative counts {counts}"
        )));
    }

    Ok(RawSample::new(ijd, counts))
}

impl PayloadParser for RowTextParser {
    fn parse(&self, text: &str) -> Result<ParsedPayload, LightCurveError> {
        let samples = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line_number, line)| parse_row(line, line_number))
            .collect::<Result<Vec<RawSample>, LightCurveError>>()?;

        ensure_min_rows(samples.len())?;

        Ok(ParsedPayload {
            samples,
            data_quality_comment: None,
            raw_ephemeris_text: None,
        })
    }
}
