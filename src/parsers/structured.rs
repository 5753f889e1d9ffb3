//! # Structured (JSON) payload reader
//!
//! Realtime-tier payloads are JSON documents embedding a table as a list of column
//! names and a parallel array of rows:
//!
//! ```json
//! {
//!   "columns": ["ijd", "dt", "counts"],
//!   "data": [[6195.0458794, 0.05, 17412], [6195.0458800, 0.05, 17390]],
//!   "comment": "preliminary data, telemetry gaps possible",
//!   "ephs": "..."
//! }
//! ```
//!
//! The table may also be nested under an `"lc"` key. Columns are located **by name**
//! (`"ijd"` and `"counts"`), so the backend is free to add or reorder columns.
//! `"comment"` and `"ephs"` are optional and carried through verbatim.
use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::{COUNTS_COLUMN, IJD_COLUMN},
    spiacs_errors::LightCurveError,
};

use super::{ensure_min_rows, ParsedPayload, PayloadParser, RawSample};

const TABLE_KEY: &str = "lc";
const COMMENT_KEY: &str = "comment";
const EPHEMERIS_KEY: &str = "ephs";

/// Parser for the realtime-tier JSON format.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredParser;

#[derive(Debug, Deserialize)]
struct EmbeddedTable {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

impl EmbeddedTable {
    fn column_index(&self, name: &str) -> Result<usize, LightCurveError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| LightCurveError::MissingColumn(name.to_string()))
    }
}

fn cell_value(row: &[Value], column: usize, row_index: usize) -> Result<f64, LightCurveError> {
    let cell = row.get(column).ok_or_else(|| {
        LightCurveError::Parse(format!(
            "row {row_index}: expected at least {} cells, found {}",
            column + 1,
            row.len()
        ))
    })?;

    let value = match cell {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    value.filter(|v| v.is_finite()).ok_or_else(|| {
        LightCurveError::Parse(format!("row {row_index}: invalid numeric cell {cell}"))
    })
}

/// Optional free-text field: absent or `null` is `None`, anything but a string is an error.
fn optional_text(document: &Value, key: &str) -> Result<Option<String>, LightCurveError> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(LightCurveError::Parse(format!(
            "field {key:?} must be a string, found {other}"
        ))),
    }
}

impl PayloadParser for StructuredParser {
    fn parse(&self, text: &str) -> Result<ParsedPayload, LightCurveError> {
        let document: Value = serde_json::from_str(text)?;
        let table_value = document.get(TABLE_KEY).unwrap_or(&document);
        let table = EmbeddedTable::deserialize(table_value).map_err(|err| {
            LightCurveError::Parse(format!("embedded light curve table: {err}"))
        })?;

        let ijd_index = table.column_index(IJD_COLUMN)?;
        let counts_index = table.column_index(COUNTS_COLUMN)?;

        let samples = table
            .data
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                let ijd = cell_value(row, ijd_index, row_index)?;
                let counts = cell_value(row, counts_index, row_index)?;
                if counts < 0.0 {
                    return Err(LightCurveError::Parse(format!(
                        "row {row_index}: negative counts {counts}"
                    )));
                }
                Ok(RawSample::new(ijd, counts))
            })
            .collect::<Result<Vec<RawSample>, LightCurveError>>()?;

        ensure_min_rows(samples.len())?;

        Ok(ParsedPayload {
            samples,
            data_quality_comment: optional_text(&document, COMMENT_KEY)?,
            raw_ephemeris_text: optional_text(&document, EPHEMERIS_KEY)?,
        })
    }
}
