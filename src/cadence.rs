//! # Native cadence estimation
//!
//! SPI-ACS does not report its integration time in the payload, and the time stamps
//! are not perfectly regular: telemetry gaps and dead time produce a few larger or
//! smaller steps. The native cadence is therefore taken as the **mode** of the
//! consecutive time differences, each rounded to the millisecond
//! ([`CADENCE_ROUNDING_DIGITS`]).
use itertools::Itertools;

use crate::{
    constants::{Seconds, CADENCE_ROUNDING_DIGITS, SECONDS_PER_DAY},
    parsers::RawSample,
    spiacs_errors::LightCurveError,
};

/// Result of [`estimate_cadence`].
#[derive(Debug, Clone, PartialEq)]
pub struct CadenceEstimate {
    /// Most frequent rounded time step, in seconds
    pub native_bin_seconds: Seconds,
    /// Fraction of the time steps equal to the mode
    pub mode_fraction: f64,
    /// All rounded time steps, in seconds
    pub deltas: Vec<Seconds>,
}

/// Estimate the native integration time of a series.
///
/// Arguments
/// -----------------
/// * `samples` – raw samples sorted by time
///
/// Return
/// ----------
/// * The [`CadenceEstimate`]; when several deltas share the highest count the smallest
///   one is chosen.
///
/// Errors
/// ----------
/// * [`LightCurveError::CadenceEstimation`] if there are fewer than two samples, if the
///   time stamps decrease somewhere, or if the most frequent step is zero.
pub fn estimate_cadence(samples: &[RawSample]) -> Result<CadenceEstimate, LightCurveError> {
    if samples.len() < 2 {
        return Err(LightCurveError::CadenceEstimation(format!(
            "at least 2 samples are required, got {}",
            samples.len()
        )));
    }

    if let Some(row) = samples.windows(2).position(|pair| pair[1].ijd < pair[0].ijd) {
        return Err(LightCurveError::CadenceEstimation(format!(
            "time stamps are not sorted (sample {} precedes sample {})",
            row,
            row + 1
        )));
    }

    // deltas counted in units of 10^-CADENCE_ROUNDING_DIGITS seconds
    let scale = 10f64.powi(CADENCE_ROUNDING_DIGITS);
    let rounded_deltas: Vec<i64> = samples
        .windows(2)
        .map(|pair| ((pair[1].ijd - pair[0].ijd) * SECONDS_PER_DAY * scale).round() as i64)
        .collect();

    let (mode, occurrences) = rounded_deltas
        .iter()
        .copied()
        .counts()
        .into_iter()
        .max_by(|(delta_a, count_a), (delta_b, count_b)| {
            count_a.cmp(count_b).then(delta_b.cmp(delta_a))
        })
        .ok_or_else(|| LightCurveError::CadenceEstimation("no time step found".into()))?;

    if mode <= 0 {
        return Err(LightCurveError::CadenceEstimation(format!(
            "most frequent time step is {} s, time stamps are duplicated",
            mode as f64 / scale
        )));
    }

    Ok(CadenceEstimate {
        native_bin_seconds: mode as f64 / scale,
        mode_fraction: occurrences as f64 / rounded_deltas.len() as f64,
        deltas: rounded_deltas
            .into_iter()
            .map(|delta| delta as f64 / scale)
            .collect(),
    })
}

#[cfg(test)]
mod cadence_test {
    use super::*;
    use approx::assert_relative_eq;

    fn series_from_deltas(deltas_seconds: &[f64]) -> Vec<RawSample> {
        let mut ijd = 6195.0;
        let mut samples = vec![RawSample::new(ijd, 1.0)];
        for delta in deltas_seconds {
            ijd += delta / SECONDS_PER_DAY;
            samples.push(RawSample::new(ijd, 1.0));
        }
        samples
    }

    #[test]
    fn test_regular_series() {
        let samples = series_from_deltas(&[0.05; 200]);
        let estimate = estimate_cadence(&samples).unwrap();
        assert_relative_eq!(estimate.native_bin_seconds, 0.05);
        assert_eq!(estimate.mode_fraction, 1.0);
        assert_eq!(estimate.deltas.len(), 200);
    }

    #[test]
    fn test_single_outlier_does_not_move_the_mode() {
        for outlier in [0.001, 0.3, 12.0] {
            let mut deltas = vec![0.05; 2];
            deltas.push(outlier);
            let estimate = estimate_cadence(&series_from_deltas(&deltas)).unwrap();
            assert_relative_eq!(estimate.native_bin_seconds, 0.05);
            assert_relative_eq!(estimate.mode_fraction, 2.0 / 3.0);
        }
    }

    #[test]
    fn test_sub_millisecond_jitter_is_rounded_away() {
        let deltas: Vec<f64> = (0..150)
            .map(|i| if i % 2 == 0 { 0.0501 } else { 0.0499 })
            .collect();
        let estimate = estimate_cadence(&series_from_deltas(&deltas)).unwrap();
        assert_relative_eq!(estimate.native_bin_seconds, 0.05);
        assert_eq!(estimate.mode_fraction, 1.0);
    }

    #[test]
    fn test_tie_picks_smallest_step() {
        let estimate = estimate_cadence(&series_from_deltas(&[0.1, 0.05, 0.1, 0.05])).unwrap();
        assert_relative_eq!(estimate.native_bin_seconds, 0.05);
        assert_eq!(estimate.mode_fraction, 0.5);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(matches!(
            estimate_cadence(&[RawSample::new(6195.0, 3.0)]),
            Err(LightCurveError::CadenceEstimation(_))
        ));
        assert!(matches!(
            estimate_cadence(&[]),
            Err(LightCurveError::CadenceEstimation(_))
        ));
    }

    #[test]
    fn test_unsorted_series() {
        let samples = vec![
            RawSample::new(6195.0, 1.0),
            RawSample::new(6195.1, 1.0),
            RawSample::new(6195.05, 1.0),
        ];
        assert!(matches!(
            estimate_cadence(&samples),
            Err(LightCurveError::CadenceEstimation(msg)) if msg.contains("not sorted")
        ));
    }

    #[test]
    fn test_duplicated_time_stamps() {
        let samples = vec![RawSample::new(6195.0, 1.0); 5];
        assert!(matches!(
            estimate_cadence(&samples),
            Err(LightCurveError::CadenceEstimation(msg)) if msg.contains("duplicated")
        ));
    }
}
