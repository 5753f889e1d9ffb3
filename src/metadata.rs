//! # Light-curve metadata
//!
//! Collects what the stages learned about a series ([`SeriesMetadata`]) into the
//! [`ProductMetadata`] shipped with the samples: the nominal resolution, the
//! exposure window, the reference epoch, and the OGIP-style timing header keys a
//! product writer needs (`TSTART`, `TSTOP`, `TIMEZERO`, `MJDREF`, ...).
//!
//! The start/stop offsets are always those of the **native** series: they describe
//! the exposure actually covered, whatever bin width the samples were rebinned to.
use serde::Serialize;

use crate::{
    constants::{Seconds, INTEGRAL_MJDREF, IJD},
    time::isot,
    time_reference::TimeReference,
};

pub const TIME_COLUMN_NAME: &str = "TIME";
pub const RATE_COLUMN_NAME: &str = "RATE";
pub const ERROR_COLUMN_NAME: &str = "ERROR";

const PRODUCT_NAME: &str = "spiacs_lc";
const INSTRUMENT_NAME: &str = "spiacs";

/// Everything the stages produced about one series, frozen before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMetadata {
    pub native_bin_seconds: Seconds,
    pub requested_bin_seconds: Option<Seconds>,
    pub effective_bin_seconds: Seconds,
    pub reference: TimeReference,
    pub data_quality_comment: Option<String>,
    pub raw_ephemeris_text: Option<String>,
}

/// Value of a header card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Text(String),
    Real(f64),
}

impl HeaderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Real(value) => Some(*value),
            HeaderValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(text) => Some(text),
            HeaderValue::Real(_) => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Real(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCard {
    pub key: String,
    pub value: HeaderValue,
}

/// Column name and physical unit of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnUnit {
    pub name: &'static str,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMetadata {
    pub product: String,
    pub instrument: String,
    pub src_name: String,
    /// Nominal time resolution of the samples (effective bin width)
    pub time_bin: Seconds,
    pub native_bin_seconds: Seconds,
    pub requested_bin_seconds: Option<Seconds>,
    pub series_start_offset_seconds: Seconds,
    pub series_stop_offset_seconds: Seconds,
    /// ISO-8601 reference epoch followed by its time scale, e.g. `2011-12-14T01:05:53.4 TT`
    pub reference_epoch: String,
    pub reference_ijd: IJD,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ephemeris_text: Option<String>,
    pub columns: Vec<ColumnUnit>,
    pub header: Vec<HeaderCard>,
}

impl ProductMetadata {
    /// Look a header card up by key
    pub fn header_value(&self, key: &str) -> Option<&HeaderValue> {
        self.header
            .iter()
            .find(|card| card.key == key)
            .map(|card| &card.value)
    }

    /// Unit of an output column
    pub fn unit_of(&self, column: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.unit)
    }
}

fn timing_header(series: &SeriesMetadata) -> Vec<HeaderCard> {
    let reference = &series.reference;
    let start = reference.series_start_offset_seconds;
    let stop = reference.series_stop_offset_seconds;
    let time_zero = reference.mission_offset_seconds();

    let cards: Vec<(&str, HeaderValue)> = vec![
        ("EXTNAME", RATE_COLUMN_NAME.into()),
        ("TIMESYS", reference.reference_epoch.time_scale.to_string().into()),
        ("TIMEREF", "LOCAL".into()),
        ("TASSIGN", "SATELLITE".into()),
        ("ONTIME", (stop - start).into()),
        ("TSTART", (time_zero + start).into()),
        ("TSTOP", (time_zero + stop).into()),
        // FITS dates are bare ISO strings, their scale is the TIMESYS card
        ("DATE-OBS", isot(reference.epoch_at(start)).into()),
        ("DATE-END", isot(reference.epoch_at(stop)).into()),
        ("TIMEDEL", series.effective_bin_seconds.into()),
        ("MJDREF", INTEGRAL_MJDREF.into()),
        ("TIMEZERO", time_zero.into()),
        ("TIMEUNIT", "s".into()),
        ("TELESCOP", "INTEGRAL".into()),
        ("INSTRUME", "SPIACS".into()),
    ];

    cards
        .into_iter()
        .map(|(key, value)| HeaderCard {
            key: key.to_string(),
            value,
        })
        .collect()
}

/// Build the product metadata of a series.
///
/// Arguments
/// -----------------
/// * `series` – frozen stage outputs
/// * `src_name` – name given to the product by the caller
pub fn assemble_metadata(series: SeriesMetadata, src_name: &str) -> ProductMetadata {
    let header = timing_header(&series);
    let reference = &series.reference;

    ProductMetadata {
        product: PRODUCT_NAME.to_string(),
        instrument: INSTRUMENT_NAME.to_string(),
        src_name: src_name.to_string(),
        time_bin: series.effective_bin_seconds,
        native_bin_seconds: series.native_bin_seconds,
        requested_bin_seconds: series.requested_bin_seconds,
        series_start_offset_seconds: reference.series_start_offset_seconds,
        series_stop_offset_seconds: reference.series_stop_offset_seconds,
        reference_epoch: reference.reference_isot(),
        reference_ijd: reference.reference_ijd,
        data_quality_comment: series.data_quality_comment,
        raw_ephemeris_text: series.raw_ephemeris_text,
        columns: vec![
            ColumnUnit {
                name: TIME_COLUMN_NAME,
                unit: "s",
            },
            ColumnUnit {
                name: RATE_COLUMN_NAME,
                unit: "count/s",
            },
            ColumnUnit {
                name: ERROR_COLUMN_NAME,
                unit: "count/s",
            },
        ],
        header,
    }
}
