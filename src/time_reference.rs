//! # Time reference of a light curve
//!
//! Time stamps come as IJD (days since 2000-01-01 TT). Kept as is, a sub-second
//! bin width is a tiny difference between two numbers around 6000 days, and the
//! rebinning arithmetic would lose precision. The series is instead re-expressed as
//! seconds relative to its **midpoint**, `(first + last) / 2`, which stays close to
//! zero over the short windows served by the backend.
//!
//! The absolute position of that reference is kept twice: as an [`Epoch`] (TT), and
//! as seconds since the mission reference `MJDREF = 51544.0`, which is what the
//! `TSTART`/`TSTOP`/`TIMEZERO` header keys are based on.
use hifitime::{Epoch, Unit};

use crate::{
    constants::{Seconds, IJD, MIN_ROWS, SECONDS_PER_DAY},
    parsers::RawSample,
    spiacs_errors::LightCurveError,
    time::{ijd_to_epoch, isot_with_scale, mission_offset_seconds},
};

#[derive(Debug, Clone, PartialEq)]
pub struct TimeReference {
    /// Midpoint of the series, in IJD
    pub reference_ijd: IJD,
    /// Midpoint of the series as an absolute epoch (TT)
    pub reference_epoch: Epoch,
    /// Offset of the first sample
    pub series_start_offset_seconds: Seconds,
    /// Offset of the last sample plus one native bin, closing the last exposure window
    pub series_stop_offset_seconds: Seconds,
}

impl TimeReference {
    /// Seconds between `MJDREF` and the reference epoch (`TIMEZERO`)
    pub fn mission_offset_seconds(&self) -> Seconds {
        mission_offset_seconds(self.reference_ijd)
    }

    /// Offset in seconds of an IJD time stamp from the reference
    pub fn offset_of(&self, ijd: IJD) -> Seconds {
        (ijd - self.reference_ijd) * SECONDS_PER_DAY
    }

    /// Absolute epoch of an offset expressed relative to the reference
    pub fn epoch_at(&self, offset_seconds: Seconds) -> Epoch {
        self.reference_epoch + Unit::Second * offset_seconds
    }

    /// Reference epoch as ISO-8601 followed by its time scale (`... TT`)
    pub fn reference_isot(&self) -> String {
        isot_with_scale(self.reference_epoch)
    }

    /// Duration covered by the series, from the first bin start to the last bin end
    pub fn exposure_window_seconds(&self) -> Seconds {
        self.series_stop_offset_seconds - self.series_start_offset_seconds
    }
}

/// Compute the midpoint reference of `samples` and their offsets from it.
///
/// Arguments
/// -----------------
/// * `samples` – raw samples sorted by time
/// * `native_bin_seconds` – native cadence, used to close the last bin
///
/// Return
/// ----------
/// * The [`TimeReference`] and one offset (seconds) per sample, in input order.
pub fn resolve_time_reference(
    samples: &[RawSample],
    native_bin_seconds: Seconds,
) -> Result<(TimeReference, Vec<Seconds>), LightCurveError> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(LightCurveError::InsufficientData {
            rows: 0,
            required: MIN_ROWS,
        });
    };

    let reference_ijd = (first.ijd + last.ijd) * 0.5;
    let offsets: Vec<Seconds> = samples
        .iter()
        .map(|sample| (sample.ijd - reference_ijd) * SECONDS_PER_DAY)
        .collect();

    let reference = TimeReference {
        reference_ijd,
        reference_epoch: ijd_to_epoch(reference_ijd),
        series_start_offset_seconds: offsets[0],
        series_stop_offset_seconds: offsets[offsets.len() - 1] + native_bin_seconds,
    };

    Ok((reference, offsets))
}
