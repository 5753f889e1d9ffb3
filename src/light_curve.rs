use serde::Serialize;

use crate::{
    constants::{CountRate, Seconds},
    metadata::ProductMetadata,
};

/// One bin of the light curve.
///
/// # Fields
///
/// * `time` - Centre of mass of the bin, in seconds relative to the reference epoch
/// * `rate` - Count rate in counts/s
/// * `error` - One-sigma Poisson uncertainty of `rate`, in counts/s
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: Seconds,
    pub rate: CountRate,
    pub error: CountRate,
}

impl Sample {
    pub fn new(time: Seconds, rate: CountRate, error: CountRate) -> Self {
        Sample { time, rate, error }
    }
}

/// Light curve handed back to the caller: the samples, ordered by time, and the
/// metadata describing their time system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesProduct {
    pub samples: Vec<Sample>,
    pub metadata: ProductMetadata,
}

impl TimeSeriesProduct {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<Seconds> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn rates(&self) -> Vec<CountRate> {
        self.samples.iter().map(|s| s.rate).collect()
    }

    pub fn errors(&self) -> Vec<CountRate> {
        self.samples.iter().map(|s| s.error).collect()
    }
}
