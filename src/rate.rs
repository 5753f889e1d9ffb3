//! # Counts to count-rate conversion
//!
//! Each native bin holds a Poisson count `N` collected over the native integration time
//! `Δt`. The rate is `N / Δt` and, the variance of a Poisson count being `N`, its
//! uncertainty is `√N / Δt`.
use crate::{constants::Seconds, light_curve::Sample, parsers::RawSample};

/// Rate and rate uncertainty of a single bin of `counts` over `bin_seconds`
pub fn counts_to_rate(counts: f64, bin_seconds: Seconds) -> (f64, f64) {
    if counts == 0.0 {
        return (0.0, 0.0);
    }
    (counts / bin_seconds, counts.sqrt() / bin_seconds)
}

/// Native-cadence light curve from raw samples and their time offsets.
///
/// Arguments
/// -----------------
/// * `samples` – raw samples
/// * `offsets` – time offsets (seconds) of `samples`, same length and order
/// * `native_bin_seconds` – native integration time
pub fn to_rates(samples: &[RawSample], offsets: &[Seconds], native_bin_seconds: Seconds) -> Vec<Sample> {
    samples
        .iter()
        .zip(offsets)
        .map(|(sample, &time)| {
            let (rate, error) = counts_to_rate(sample.counts, native_bin_seconds);
            Sample::new(time, rate, error)
        })
        .collect()
}

#[cfg(test)]
mod rate_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts_to_rate() {
        let (rate, error) = counts_to_rate(10.0, 0.1);
        assert_relative_eq!(rate, 100.0);
        assert_relative_eq!(error, 10f64.sqrt() / 0.1);
        assert_relative_eq!(error, 31.622776601683793, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_counts() {
        assert_eq!(counts_to_rate(0.0, 0.05), (0.0, 0.0));
    }

    #[test]
    fn test_to_rates_is_pure() {
        let samples: Vec<RawSample> = (0..5)
            .map(|i| RawSample::new(6195.0 + i as f64, (i * 4) as f64))
            .collect();
        let offsets = vec![-2.0, -1.0, 0.0, 1.0, 2.0];

        let first = to_rates(&samples, &offsets, 0.05);
        let second = to_rates(&samples, &offsets, 0.05);

        assert_eq!(first, second);
        assert_eq!(first[0], Sample::new(-2.0, 0.0, 0.0));
        assert_relative_eq!(first[1].rate, 80.0);
        assert_relative_eq!(first[1].error, 2.0 / 0.05);
        assert_eq!(first[4].time, 2.0);
    }
}
