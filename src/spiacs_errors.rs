use thiserror::Error;

/// Stage-level failures of the light-curve pipeline.
///
/// Every variant describes a problem with the data returned for one query; none of
/// them is transient, so nothing in the crate retries on them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightCurveError {
    #[error("no data found for this time interval (backend marker {marker:?}, status {status_code})")]
    NoData {
        marker: String,
        raw_excerpt: String,
        status_code: u16,
    },

    #[error("insufficient data: {rows} rows parsed, at least {required} are required")]
    InsufficientData { rows: usize, required: usize },

    #[error("missing column in structured payload: {0}")]
    MissingColumn(String),

    #[error("malformed payload: {0}")]
    Parse(String),

    #[error("unable to estimate the native cadence: {0}")]
    CadenceEstimation(String),

    #[error("rebinning failed: {0}")]
    Rebin(String),

    #[error("data server transport error: {0}")]
    UpstreamTransport(String),

    #[error("SPI-ACS backend refuses to process this request, due to resource constraint: {0}")]
    BackendRefused(String),

    #[error("invalid light curve query: {0}")]
    InvalidQuery(String),

    #[error("invalid data server configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse-grained analysis error handed to the hosting framework.
///
/// `message` is stable and meant for the end user, `debug_message` carries the full
/// rendering of the stage error for the logs, and `kind` keeps the typed cause.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct SpiacsAnalysisError {
    pub message: String,
    pub debug_message: String,
    #[source]
    pub kind: LightCurveError,
}

impl SpiacsAnalysisError {
    pub fn kind(&self) -> &LightCurveError {
        &self.kind
    }
}

impl From<LightCurveError> for SpiacsAnalysisError {
    fn from(err: LightCurveError) -> Self {
        SpiacsAnalysisError {
            message: format!("spiacs light curve failed: {err}"),
            debug_message: format!("{err:?}"),
            kind: err,
        }
    }
}

// Two analysis errors are the same failure when their causes match; the rendered
// messages are derived from the cause.
impl PartialEq for SpiacsAnalysisError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<reqwest::Error> for LightCurveError {
    fn from(err: reqwest::Error) -> Self {
        LightCurveError::UpstreamTransport(err.to_string())
    }
}

impl From<serde_json::Error> for LightCurveError {
    fn from(err: serde_json::Error) -> Self {
        LightCurveError::Parse(format!("invalid JSON document: {err}"))
    }
}

#[cfg(test)]
mod spiacs_errors_test {
    use super::*;

    #[test]
    fn test_analysis_error_wraps_stage_error() {
        let err: SpiacsAnalysisError = LightCurveError::MissingColumn("counts".into()).into();

        assert_eq!(
            err.message,
            "spiacs light curve failed: missing column in structured payload: counts"
        );
        assert_eq!(err.debug_message, "MissingColumn(\"counts\")");
        assert_eq!(err.kind(), &LightCurveError::MissingColumn("counts".into()));
    }

    #[test]
    fn test_no_data_message_names_marker() {
        let err = LightCurveError::NoData {
            marker: "ZeroData".into(),
            raw_excerpt: "ZeroData".into(),
            status_code: 200,
        };
        assert_eq!(
            err.to_string(),
            "no data found for this time interval (backend marker \"ZeroData\", status 200)"
        );
    }
}
