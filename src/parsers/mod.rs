//! # Payload parsers
//!
//! The SPI-ACS backend serves two data tiers with two different encodings:
//!
//! - [`DataTier::Ordinary`] – consolidated data as whitespace-delimited rows
//!   (see [`row_text::RowTextParser`]);
//! - [`DataTier::Realtime`] – near-real-time data as a JSON document embedding a
//!   table (see [`structured::StructuredParser`]).
//!
//! Both implement [`PayloadParser`] and produce the same [`ParsedPayload`], so the
//! stages downstream never know which encoding was read. The parser is chosen from
//! the tier the caller queried, never by looking at the payload.
pub mod row_text;
pub mod structured;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{IJD, MIN_ROWS},
    spiacs_errors::LightCurveError,
};

/// One native bin as delivered by the backend: IJD time stamp and raw counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub ijd: IJD,
    pub counts: f64,
}

impl RawSample {
    pub fn new(ijd: IJD, counts: f64) -> Self {
        RawSample { ijd, counts }
    }
}

/// Output shared by every parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedPayload {
    pub samples: Vec<RawSample>,
    /// Free-text data quality annotation, carried to the product unmodified
    pub data_quality_comment: Option<String>,
    /// Spacecraft ephemeris text, carried to the product unmodified
    pub raw_ephemeris_text: Option<String>,
}

/// Data tier requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataTier {
    #[default]
    Ordinary,
    Realtime,
}

impl DataTier {
    /// The parser able to read the payloads of this tier
    pub fn parser(&self) -> &'static dyn PayloadParser {
        match self {
            DataTier::Ordinary => &row_text::RowTextParser,
            DataTier::Realtime => &structured::StructuredParser,
        }
    }
}

impl fmt::Display for DataTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTier::Ordinary => write!(f, "ordinary"),
            DataTier::Realtime => write!(f, "realtime"),
        }
    }
}

impl FromStr for DataTier {
    type Err = LightCurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinary" => Ok(DataTier::Ordinary),
            "realtime" => Ok(DataTier::Realtime),
            other => Err(LightCurveError::InvalidQuery(format!(
                "unknown data tier {other:?}, expected \"ordinary\" or \"realtime\""
            ))),
        }
    }
}

/// Conversion of a raw payload into [`RawSample`]s.
pub trait PayloadParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedPayload, LightCurveError>;
}

/// Parse `text` with the parser of `tier`.
pub fn parse_payload(tier: DataTier, text: &str) -> Result<ParsedPayload, LightCurveError> {
    tier.parser().parse(text)
}

pub(crate) fn ensure_min_rows(rows: usize) -> Result<(), LightCurveError> {
    if rows < MIN_ROWS {
        return Err(LightCurveError::InsufficientData {
            rows,
            required: MIN_ROWS,
        });
    }
    Ok(())
}
