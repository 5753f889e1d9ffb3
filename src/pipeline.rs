//! # Light-curve pipeline
//!
//! [`LightCurvePipeline`] turns one raw backend answer into a [`TimeSeriesProduct`]:
//!
//! ```text
//! RawResponse ─► validate ─► parse (tier) ─► cadence ─► time reference
//!             ─► counts → rates ─► rebin ─► metadata ─► TimeSeriesProduct
//! ```
//!
//! The pipeline holds no state between calls. Intermediate results are reported to
//! the [`DiagnosticsSink`] it was built with, and any stage failure comes back as a
//! [`SpiacsAnalysisError`] wrapping the stage's [`LightCurveError`].
//!
//! ## Usage
//!
//! ```rust, no_run
//! use spiacs::diagnostics::TracingSink;
//! use spiacs::parsers::DataTier;
//! use spiacs::pipeline::LightCurvePipeline;
//! use spiacs::query::PipelineParams;
//! use spiacs::response::RawResponse;
//!
//! let text = std::fs::read_to_string("spiacs_lc.txt").unwrap();
//! let pipeline = LightCurvePipeline::with_sink(TracingSink);
//! let product = pipeline
//!     .run(
//!         &RawResponse::new(text, 200),
//!         &PipelineParams {
//!             data_tier: DataTier::Ordinary,
//!             requested_bin_seconds: Some(1.0),
//!         },
//!     )
//!     .unwrap();
//! println!("{} bins of {} s", product.len(), product.metadata.time_bin);
//! ```
use tracing::debug;

use crate::{
    cadence::estimate_cadence,
    data_server::DataServer,
    diagnostics::{DiagnosticEvent, DiagnosticsSink, NullSink},
    light_curve::TimeSeriesProduct,
    metadata::{assemble_metadata, SeriesMetadata},
    parsers::parse_payload,
    query::{LightCurveQuery, PipelineParams},
    rate::to_rates,
    rebin::{rebin, BinPlan},
    response::{validate_response, RawResponse},
    spiacs_errors::{LightCurveError, SpiacsAnalysisError},
    time_reference::resolve_time_reference,
};

const DEFAULT_SRC_NAME: &str = "query";

#[derive(Debug, Clone)]
pub struct LightCurvePipeline<S: DiagnosticsSink = NullSink> {
    src_name: String,
    sink: S,
}

impl LightCurvePipeline<NullSink> {
    pub fn new() -> Self {
        Self::with_sink(NullSink)
    }
}

impl Default for LightCurvePipeline<NullSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticsSink> LightCurvePipeline<S> {
    pub fn with_sink(sink: S) -> Self {
        LightCurvePipeline {
            src_name: DEFAULT_SRC_NAME.to_string(),
            sink,
        }
    }

    /// Name written in the `src_name` field of the products
    pub fn with_src_name(mut self, src_name: impl Into<String>) -> Self {
        self.src_name = src_name.into();
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Compute the light curve contained in `response`.
    ///
    /// Arguments
    /// -----------------
    /// * `response` – raw backend answer
    /// * `params` – data tier the answer comes from, and the requested bin width
    ///
    /// Return
    /// ----------
    /// * The samples, sorted by time, and their metadata.
    ///
    /// Errors
    /// ----------
    /// * [`SpiacsAnalysisError`] whose `kind` is the error of the first failing stage.
    pub fn run(
        &self,
        response: &RawResponse,
        params: &PipelineParams,
    ) -> Result<TimeSeriesProduct, SpiacsAnalysisError> {
        self.run_stages(response, params).map_err(|err| {
            debug!(error = ?err, "light curve computation failed");
            SpiacsAnalysisError::from(err)
        })
    }

    /// Fetch the payload answering `query` from `server`, then [`run`](Self::run) it.
    pub async fn run_query(
        &self,
        server: &DataServer,
        query: &LightCurveQuery,
    ) -> Result<TimeSeriesProduct, SpiacsAnalysisError> {
        let response = server.fetch(query).await?;
        self.run(&response, &query.pipeline_params())
    }

    fn run_stages(
        &self,
        response: &RawResponse,
        params: &PipelineParams,
    ) -> Result<TimeSeriesProduct, LightCurveError> {
        validate_response(response)?;
        self.sink.emit(&DiagnosticEvent::ResponseAccepted {
            status_code: response.status_code,
            text_len: response.text.len(),
        });

        let payload = parse_payload(params.data_tier, &response.text)?;
        self.sink.emit(&DiagnosticEvent::PayloadParsed {
            rows: payload.samples.len(),
            has_comment: payload.data_quality_comment.is_some(),
        });

        let cadence = estimate_cadence(&payload.samples)?;
        let native_bin_seconds = cadence.native_bin_seconds;
        self.sink.emit(&DiagnosticEvent::CadenceEstimated {
            cadence_seconds: native_bin_seconds,
            mode_fraction: cadence.mode_fraction,
            deltas: cadence.deltas,
        });

        let (reference, offsets) = resolve_time_reference(&payload.samples, native_bin_seconds)?;
        self.sink.emit(&DiagnosticEvent::ReferenceResolved {
            reference_isot: reference.reference_isot(),
            start_offset_seconds: reference.series_start_offset_seconds,
            stop_offset_seconds: reference.series_stop_offset_seconds,
        });

        let native = to_rates(&payload.samples, &offsets, native_bin_seconds);

        let plan = BinPlan::new(native_bin_seconds, params.requested_bin_seconds)?;
        if let Some(requested_seconds) = plan.requested_bin_seconds.filter(|_| plan.is_snapped()) {
            self.sink.emit(&DiagnosticEvent::BinSnapped {
                requested_seconds,
                effective_seconds: plan.effective_bin_seconds,
            });
        }

        let samples = rebin(&native, &plan)?;
        self.sink.emit(&DiagnosticEvent::Rebinned {
            input_len: native.len(),
            output_len: samples.len(),
            effective_bin_seconds: plan.effective_bin_seconds,
        });

        let metadata = assemble_metadata(
            SeriesMetadata {
                native_bin_seconds,
                requested_bin_seconds: params.requested_bin_seconds,
                effective_bin_seconds: plan.effective_bin_seconds,
                reference,
                data_quality_comment: payload.data_quality_comment,
                raw_ephemeris_text: payload.raw_ephemeris_text,
            },
            &self.src_name,
        );

        Ok(TimeSeriesProduct { samples, metadata })
    }
}
