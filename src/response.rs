//! # Data server response validation
//!
//! The SPI-ACS backend answers an empty interval with a short text containing a
//! sentinel (`ZeroData` or `NoData`) instead of an error status. [`validate_response`]
//! rejects such payloads before any parser sees them.
use serde::{Deserialize, Serialize};

use crate::{
    constants::{EMPTY_PAYLOAD_MARKER, NO_DATA_MARKERS, RAW_EXCERPT_MAX_CHARS},
    spiacs_errors::LightCurveError,
};

/// Raw answer of the data server: the body text and the HTTP status code.
///
/// The status is informational; the backend reports "no data" with a 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    pub text: String,
    pub status_code: u16,
}

impl RawResponse {
    pub fn new(text: impl Into<String>, status_code: u16) -> Self {
        RawResponse {
            text: text.into(),
            status_code,
        }
    }
}

/// First [`RAW_EXCERPT_MAX_CHARS`] characters of `text`, cut on a char boundary
pub(crate) fn raw_excerpt(text: &str) -> String {
    text.chars().take(RAW_EXCERPT_MAX_CHARS).collect()
}

/// Reject payloads that announce an empty interval.
///
/// Return
/// ------
/// * `Ok(())` when the text carries data
/// * [`LightCurveError::NoData`] when a sentinel is found anywhere in the text, or when
///   the text is blank
pub fn validate_response(response: &RawResponse) -> Result<(), LightCurveError> {
    let no_data = |marker: &str| LightCurveError::NoData {
        marker: marker.to_string(),
        raw_excerpt: raw_excerpt(&response.text),
        status_code: response.status_code,
    };

    if response.text.trim().is_empty() {
        return Err(no_data(EMPTY_PAYLOAD_MARKER));
    }

    match NO_DATA_MARKERS
        .iter()
        .find(|marker| response.text.contains(*marker))
    {
        Some(marker) => Err(no_data(*marker)),
        None => Ok(()),
    }
}
