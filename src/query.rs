//! # Light-curve query
//!
//! A user asks for the SPI-ACS light curve between two instants `T1` and `T2`, at an
//! optional time resolution, from one [`DataTier`]. The backend expects the window
//! **centred**: a reference time `t0 = (T1 + T2) / 2` and a half width
//! `dt = (T2 − T1) / 2` in seconds.
use std::str::FromStr;

use hifitime::{Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::{
    constants::Seconds,
    parsers::DataTier,
    spiacs_errors::LightCurveError,
    time::isot,
};

/// Parameters consumed by the light-curve pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineParams {
    pub data_tier: DataTier,
    /// `None` keeps the native cadence
    pub requested_bin_seconds: Option<Seconds>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCurveQuery {
    pub t1: Epoch,
    pub t2: Epoch,
    pub time_bin: Option<Seconds>,
    pub data_tier: DataTier,
}

impl LightCurveQuery {
    /// Create a query over `[t1, t2]`.
    ///
    /// Errors
    /// ----------
    /// * [`LightCurveError::InvalidQuery`] if `t2` is not after `t1`, or if `time_bin`
    ///   is not a positive number of seconds.
    pub fn new(
        t1: Epoch,
        t2: Epoch,
        time_bin: Option<Seconds>,
        data_tier: DataTier,
    ) -> Result<Self, LightCurveError> {
        if t2 <= t1 {
            return Err(LightCurveError::InvalidQuery(format!(
                "T2 ({}) must be after T1 ({})",
                isot(t2),
                isot(t1)
            )));
        }
        if let Some(bin) = time_bin {
            if !(bin.is_finite() && bin > 0.0) {
                return Err(LightCurveError::InvalidQuery(format!(
                    "time bin must be a positive number of seconds, got {bin}"
                )));
            }
        }

        Ok(LightCurveQuery {
            t1,
            t2,
            time_bin,
            data_tier,
        })
    }

    /// Create a query from ISO-8601 strings (UTC), e.g. `"2003-03-15T23:27:40.0"`
    pub fn from_isot(
        t1: &str,
        t2: &str,
        time_bin: Option<Seconds>,
        data_tier: DataTier,
    ) -> Result<Self, LightCurveError> {
        let parse = |value: &str| {
            Epoch::from_str(value).map_err(|err| {
                LightCurveError::InvalidQuery(format!("invalid date {value:?}: {err}"))
            })
        };
        Self::new(parse(t1)?, parse(t2)?, time_bin, data_tier)
    }

    /// Half width of the window, in seconds
    pub fn half_span_seconds(&self) -> Seconds {
        (self.t2 - self.t1).to_seconds() * 0.5
    }

    /// Centre of the window
    pub fn reference_time(&self) -> Epoch {
        self.t1 + Unit::Second * self.half_span_seconds()
    }

    pub fn reference_isot(&self) -> String {
        isot(self.reference_time())
    }

    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams {
            data_tier: self.data_tier,
            requested_bin_seconds: self.time_bin,
        }
    }
}
