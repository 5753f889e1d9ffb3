use hifitime::{Epoch, TimeScale, Unit};

use crate::constants::{Seconds, INTEGRAL_MJDREF, IJD, SECONDS_PER_DAY};

/// Origin of the INTEGRAL Julian Date scale: 2000-01-01T00:00:00 TT (MJD 51544.0)
pub fn ijd_origin() -> Epoch {
    Epoch::from_gregorian(2000, 1, 1, 0, 0, 0, 0, TimeScale::TT)
}

/// Transformation from INTEGRAL Julian Date to an absolute epoch (TT frame)
///
/// Argument
/// --------
/// * `ijd`: days since [`ijd_origin`]
///
/// Return
/// ------
/// * the corresponding [`Epoch`], expressed in the TT time scale
pub fn ijd_to_epoch(ijd: IJD) -> Epoch {
    ijd_origin() + Unit::Day * ijd
}

/// Transformation from an absolute epoch (any time scale) to INTEGRAL Julian Date
pub fn epoch_to_ijd(epoch: Epoch) -> IJD {
    (epoch - ijd_origin()).to_seconds() / SECONDS_PER_DAY
}

/// Transformation from INTEGRAL Julian Date to modified julian date (MJD, TT)
pub fn ijd_to_mjd(ijd: IJD) -> f64 {
    ijd + INTEGRAL_MJDREF
}

/// Seconds elapsed between the mission reference (`MJDREF`) and `ijd`
pub fn mission_offset_seconds(ijd: IJD) -> Seconds {
    ijd * SECONDS_PER_DAY
}

/// ISO-8601 rendering (`YYYY-MM-DDTHH:MM:SS...`) of an epoch in its own time scale
pub fn isot(epoch: Epoch) -> String {
    epoch.to_isoformat()
}

/// ISO-8601 rendering followed by the name of the time scale, e.g.
/// `2000-01-02T12:00:00.000000 TT`
pub fn isot_with_scale(epoch: Epoch) -> String {
    format!("{} {}", epoch.to_isoformat(), epoch.time_scale)
}
