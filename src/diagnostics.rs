//! # Pipeline diagnostics
//!
//! Intermediate results of a light-curve computation are reported as
//! [`DiagnosticEvent`]s to a caller-provided [`DiagnosticsSink`]. The stages themselves
//! hold no logger state: a host that wants the events in its logs passes a
//! [`TracingSink`], a test that wants to inspect them passes a [`RecordingSink`], and
//! everybody else gets the [`NullSink`].
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::constants::Seconds;

/// One observation made by a pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// The raw payload passed validation.
    ResponseAccepted { status_code: u16, text_len: usize },

    /// The format parser produced `rows` raw samples.
    PayloadParsed { rows: usize, has_comment: bool },

    /// The native cadence was chosen as the mode of the rounded deltas.
    CadenceEstimated {
        cadence_seconds: Seconds,
        mode_fraction: f64,
        deltas: Vec<Seconds>,
    },

    /// The series was re-expressed relative to its midpoint.
    ReferenceResolved {
        reference_isot: String,
        start_offset_seconds: Seconds,
        stop_offset_seconds: Seconds,
    },

    /// The requested bin width could not be honoured exactly.
    BinSnapped {
        requested_seconds: Seconds,
        effective_seconds: Seconds,
    },

    /// The rebinner ran (or passed the native series through).
    Rebinned {
        input_len: usize,
        output_len: usize,
        effective_bin_seconds: Seconds,
    },
}

/// Receiver of [`DiagnosticEvent`]s.
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, event: &DiagnosticEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn emit(&self, _event: &DiagnosticEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn emit(&self, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::ResponseAccepted {
                status_code,
                text_len,
            } => debug!(status_code, text_len, "data server response accepted"),
            DiagnosticEvent::PayloadParsed { rows, has_comment } => {
                debug!(rows, has_comment, "payload parsed")
            }
            DiagnosticEvent::CadenceEstimated {
                cadence_seconds,
                mode_fraction,
                deltas,
            } => info!(
                cadence_seconds,
                mode_fraction,
                n_deltas = deltas.len(),
                "native cadence estimated"
            ),
            DiagnosticEvent::ReferenceResolved {
                reference_isot,
                start_offset_seconds,
                stop_offset_seconds,
            } => debug!(
                reference = %reference_isot,
                start_offset_seconds,
                stop_offset_seconds,
                "time reference resolved"
            ),
            DiagnosticEvent::BinSnapped {
                requested_seconds,
                effective_seconds,
            } => warn!(
                requested_seconds,
                effective_seconds,
                "requested time bin snapped to a multiple of the native cadence"
            ),
            DiagnosticEvent::Rebinned {
                input_len,
                output_len,
                effective_bin_seconds,
            } => debug!(input_len, output_len, effective_bin_seconds, "light curve rebinned"),
        }
    }
}

/// Keeps a copy of every event, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticsSink for RecordingSink {
    fn emit(&self, event: &DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
