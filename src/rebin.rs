//! # Light-curve rebinning
//!
//! A caller may ask for a coarser time resolution than the native cadence. The
//! requested width is first snapped **down** to a whole multiple `k` of the native
//! cadence (the instrument bins cannot be split), then native samples are grouped in
//! half-open buckets `[t₁ + j·w, t₁ + (j+1)·w)` starting at the first sample.
//!
//! For a bucket holding `n` native samples:
//!
//! ```text
//! rate     = mean(rate_i)
//! time     = mean(time_i)
//! exposure = n · Δt_native
//! error    = √(rate · exposure) / exposure
//! ```
//!
//! i.e. the Poisson error is derived again from the total counts collected over the
//! bucket exposure, instead of combining the native errors. Buckets without samples
//! (telemetry gaps) are dropped.
//!
//! When no rebinning is requested, or when the snapped factor `k` is 1 or less, the
//! native light curve is returned untouched.
use itertools::Itertools;

use crate::{
    constants::{Seconds, BIN_RATIO_TOLERANCE, EDGE_TOLERANCE_SECONDS},
    light_curve::Sample,
    spiacs_errors::LightCurveError,
};

/// Bin width actually used for a light curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinPlan {
    pub native_bin_seconds: Seconds,
    pub requested_bin_seconds: Option<Seconds>,
    /// Number of native bins per output bin (1 when passing through)
    pub factor: usize,
    pub effective_bin_seconds: Seconds,
}

impl BinPlan {
    /// Snap the requested width down to a whole multiple of the native cadence.
    ///
    /// Arguments
    /// -----------------
    /// * `native_bin_seconds` – native cadence
    /// * `requested_bin_seconds` – caller request, `None` for native resolution
    ///
    /// Errors
    /// ----------
    /// * [`LightCurveError::InvalidQuery`] if the request is NaN or infinite.
    pub fn new(
        native_bin_seconds: Seconds,
        requested_bin_seconds: Option<Seconds>,
    ) -> Result<Self, LightCurveError> {
        let native = BinPlan {
            native_bin_seconds,
            requested_bin_seconds,
            factor: 1,
            effective_bin_seconds: native_bin_seconds,
        };

        let Some(requested) = requested_bin_seconds else {
            return Ok(native);
        };
        if !requested.is_finite() {
            return Err(LightCurveError::InvalidQuery(format!(
                "requested time bin must be finite, got {requested}"
            )));
        }

        let ratio = requested / native_bin_seconds;
        if !ratio.is_finite() {
            return Err(LightCurveError::InvalidQuery(format!(
                "requested time bin {requested} s is out of range for a {native_bin_seconds} s cadence"
            )));
        }
        let factor = (ratio * (1.0 + BIN_RATIO_TOLERANCE)).floor();
        if factor <= 1.0 {
            return Ok(native);
        }

        Ok(BinPlan {
            factor: factor as usize,
            effective_bin_seconds: factor * native_bin_seconds,
            ..native
        })
    }

    /// `true` when the output keeps the native resolution
    pub fn is_identity(&self) -> bool {
        self.factor <= 1
    }

    /// `true` when the effective width differs from an explicit request
    pub fn is_snapped(&self) -> bool {
        match self.requested_bin_seconds {
            Some(requested) => {
                (requested - self.effective_bin_seconds).abs() > BIN_RATIO_TOLERANCE * requested
            }
            None => false,
        }
    }
}

fn aggregate(members: &[Sample], native_bin_seconds: Seconds) -> Sample {
    let n = members.len() as f64;
    let rate = members.iter().map(|s| s.rate).sum::<f64>() / n;
    let time = members.iter().map(|s| s.time).sum::<f64>() / n;
    let exposure = n * native_bin_seconds;
    let error = (rate * exposure).sqrt() / exposure;
    Sample::new(time, rate, error)
}

/// Rebin a native-cadence light curve according to `plan`.
///
/// Arguments
/// -----------------
/// * `samples` – native light curve, sorted by time
/// * `plan` – bin width computed by [`BinPlan::new`]
///
/// Return
/// ----------
/// * The rebinned light curve, one sample per populated bucket, or a copy of `samples`
///   when [`BinPlan::is_identity`] holds.
///
/// Errors
/// ----------
/// * [`LightCurveError::Rebin`] if no bucket ends up populated.
pub fn rebin(samples: &[Sample], plan: &BinPlan) -> Result<Vec<Sample>, LightCurveError> {
    if plan.is_identity() {
        return Ok(samples.to_vec());
    }

    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(LightCurveError::Rebin("no sample to rebin".into()));
    };

    let width = plan.effective_bin_seconds;
    let t_start = first.time;
    let t_stop = last.time + plan.native_bin_seconds;
    let n_buckets = ((t_stop - t_start) / width).ceil().max(1.0) as usize;

    let bucket_of = |sample: &Sample| -> usize {
        let index = ((sample.time - t_start + EDGE_TOLERANCE_SECONDS) / width).floor();
        (index.max(0.0) as usize).min(n_buckets - 1)
    };

    let binned: Vec<Sample> = samples
        .iter()
        .chunk_by(|sample| bucket_of(*sample))
        .into_iter()
        .map(|(_, members)| {
            let members: Vec<Sample> = members.copied().collect();
            aggregate(&members, plan.native_bin_seconds)
        })
        .collect();

    if binned.is_empty() {
        return Err(LightCurveError::Rebin(format!(
            "no populated bucket for a {width} s bin width"
        )));
    }

    Ok(binned)
}

#[cfg(test)]
mod rebin_test {
    use super::*;
    use crate::rate::counts_to_rate;
    use approx::assert_relative_eq;

    fn native_curve(counts: &[f64], native: f64) -> Vec<Sample> {
        let half_span = (counts.len() - 1) as f64 * native / 2.0;
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let (rate, error) = counts_to_rate(c, native);
                Sample::new(i as f64 * native - half_span, rate, error)
            })
            .collect()
    }

    #[test]
    fn test_plan_without_request() {
        let plan = BinPlan::new(0.05, None).unwrap();
        assert!(plan.is_identity());
        assert!(!plan.is_snapped());
        assert_eq!(plan.effective_bin_seconds, 0.05);
    }

    #[test]
    fn test_plan_snaps_down() {
        let plan = BinPlan::new(0.1, Some(0.35)).unwrap();
        assert_eq!(plan.factor, 3);
        assert_relative_eq!(plan.effective_bin_seconds, 0.3, epsilon = 1e-12);
        assert!(plan.is_snapped());
    }

    #[test]
    fn test_plan_exact_multiples_survive_float_noise() {
        // 0.3 / 0.1 evaluates to 2.9999999999999996
        let plan = BinPlan::new(0.1, Some(0.3)).unwrap();
        assert_eq!(plan.factor, 3);
        assert!(!plan.is_snapped());

        let plan = BinPlan::new(0.1, Some(1.0)).unwrap();
        assert_eq!(plan.factor, 10);
    }

    #[test]
    fn test_plan_below_native_falls_back() {
        for requested in [0.0, -3.0, 0.05, 0.1, 0.19] {
            let plan = BinPlan::new(0.1, Some(requested)).unwrap();
            assert!(plan.is_identity(), "request {requested} should not rebin");
            assert_eq!(plan.effective_bin_seconds, 0.1);
        }
    }

    #[test]
    fn test_plan_small_excess_is_snapped() {
        let plan = BinPlan::new(0.1, Some(1.0004)).unwrap();
        assert_eq!(plan.factor, 10);
        assert_relative_eq!(plan.effective_bin_seconds, 1.0, epsilon = 1e-12);
        assert!(plan.is_snapped());
    }

    #[test]
    fn test_plan_rejects_overflowing_request() {
        assert!(matches!(
            BinPlan::new(0.001, Some(f64::MAX)),
            Err(LightCurveError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_plan_rejects_nan() {
        assert!(matches!(
            BinPlan::new(0.1, Some(f64::NAN)),
            Err(LightCurveError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_identity_law() {
        let counts: Vec<f64> = (0..150).map(|i| (i % 7) as f64 * 3.0).collect();
        let native = native_curve(&counts, 0.1);
        for requested in [None, Some(0.1), Some(0.05), Some(0.15)] {
            let plan = BinPlan::new(0.1, requested).unwrap();
            assert_eq!(rebin(&native, &plan).unwrap(), native);
        }
    }

    #[test]
    fn test_aggregation_law() {
        let counts: Vec<f64> = (0..120).map(|i| (i * 13 % 29) as f64).collect();
        let native = native_curve(&counts, 0.05);

        let plan = BinPlan::new(0.05, Some(0.2)).unwrap();
        let binned = rebin(&native, &plan).unwrap();

        assert_eq!(binned.len(), 30);
        let mean_rate = native[..4].iter().map(|s| s.rate).sum::<f64>() / 4.0;
        assert_relative_eq!(binned[0].rate, mean_rate, epsilon = 1e-9);
        let mean_time = native[..4].iter().map(|s| s.time).sum::<f64>() / 4.0;
        assert_relative_eq!(binned[0].time, mean_time, epsilon = 1e-9);

        let exposure = 4.0 * 0.05;
        assert_relative_eq!(
            binned[0].error,
            (mean_rate * exposure).sqrt() / exposure,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_partial_last_bucket() {
        let native = native_curve(&[10.0; 25], 0.1);
        let plan = BinPlan::new(0.1, Some(1.0)).unwrap();
        let binned = rebin(&native, &plan).unwrap();

        assert_eq!(binned.len(), 3);
        assert_relative_eq!(binned[2].rate, 100.0);
        // 5 native bins in the last bucket
        let exposure: f64 = 0.5;
        assert_relative_eq!(binned[2].error, (100.0 * exposure).sqrt() / exposure);
    }

    #[test]
    fn test_gaps_produce_no_empty_buckets() {
        let mut native = native_curve(&[10.0; 40], 0.1);
        // telemetry gap of 3 s after the 20th sample
        for sample in native.iter_mut().skip(20) {
            sample.time += 3.0;
        }
        let plan = BinPlan::new(0.1, Some(1.0)).unwrap();
        let binned = rebin(&native, &plan).unwrap();

        assert_eq!(binned.len(), 4);
        assert!(binned.windows(2).all(|pair| pair[0].time < pair[1].time));
        assert!(binned.iter().all(|s| (s.rate - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_zero_rate_bucket_has_zero_error() {
        let native = native_curve(&[0.0; 20], 0.1);
        let plan = BinPlan::new(0.1, Some(0.5)).unwrap();
        let binned = rebin(&native, &plan).unwrap();
        assert_eq!(binned.len(), 4);
        assert!(binned.iter().all(|s| s.rate == 0.0 && s.error == 0.0));
    }

    #[test]
    fn test_empty_input() {
        let plan = BinPlan::new(0.1, Some(1.0)).unwrap();
        assert!(matches!(rebin(&[], &plan), Err(LightCurveError::Rebin(_))));
    }
}
