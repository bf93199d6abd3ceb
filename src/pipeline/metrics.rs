//! Metric Aggregator (component I).
//!
//! Ported from `metric_utils.py`'s `calculate_metrics` and
//! `round_to_sigfigs`: F1@K from the Supported/Not-Supported/Irrelevant
//! histogram, plus batch-level mean/standard-deviation aggregation across a
//! set of per-prompt metric values.

use crate::error::InputError;
use crate::model::Counts;

/// One response's F1@K score plus the precision/recall it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct F1Score {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Computes F1@K from a supported/not-supported/irrelevant histogram and a
/// claim budget `k`.
///
/// # Errors
/// Returns [`InputError::InvalidMaxClaims`] if `k <= 0`, or
/// [`InputError::NegativeCount`] if `counts` somehow carries a value that
/// would make `supported + not_supported` negative (unreachable for `u32`
/// counts but checked at the `i64` boundary the caller may pass in).
pub fn calculate_metrics(counts: Counts, k: i64) -> Result<F1Score, InputError> {
    if k <= 0 {
        return Err(InputError::InvalidMaxClaims { value: k });
    }

    let supported = f64::from(counts.supported);
    let not_supported = f64::from(counts.not_supported);
    let denominator = supported + not_supported;

    let precision = if denominator > 0.0 { supported / denominator } else { 0.0 };
    let recall = (supported / k as f64).min(1.0);

    let f1 = if counts.supported > 0 && (precision + recall) > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Ok(F1Score { precision, recall, f1 })
}

/// Rounds a nonzero float to `sigfigs` significant figures; zero is returned
/// unchanged.
#[must_use]
pub fn round_to_sigfigs(value: f64, sigfigs: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(sigfigs - 1 - magnitude);
    (value * factor).round() / factor
}

/// Population mean and standard deviation (`ddof=0`, matching
/// `numpy.mean`/`numpy.std` defaults) of a set of per-prompt metric values.
#[must_use]
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts_of(supported: u32, not_supported: u32, irrelevant: u32) -> Counts {
        Counts { supported, not_supported, irrelevant }
    }

    #[test]
    fn test_zero_supported_yields_zero_f1() {
        let score = calculate_metrics(counts_of(0, 5, 2), 100).unwrap_or_else(|e| unreachable!("{e:?}"));
        assert_eq!(score.f1, 0.0);
    }

    #[test]
    fn test_rejects_nonpositive_k() {
        assert!(calculate_metrics(counts_of(1, 0, 0), 0).is_err());
        assert!(calculate_metrics(counts_of(1, 0, 0), -1).is_err());
    }

    #[test]
    fn test_recall_caps_at_one() {
        let score = calculate_metrics(counts_of(200, 0, 0), 100).unwrap_or_else(|e| unreachable!("{e:?}"));
        assert_eq!(score.recall, 1.0);
    }

    #[test]
    fn test_lanny_flaherty_scenario() {
        let score = calculate_metrics(counts_of(2, 0, 1), 100).unwrap_or_else(|e| unreachable!("{e:?}"));
        assert!((score.f1 - 0.0392).abs() < 1e-3);
    }

    #[test]
    fn test_round_to_sigfigs_zero_stays_zero() {
        assert_eq!(round_to_sigfigs(0.0, 3), 0.0);
    }

    #[test]
    fn test_round_to_sigfigs_three_figures() {
        assert!((round_to_sigfigs(0.039_245, 3) - 0.0392).abs() < 1e-6);
    }

    #[test]
    fn test_mean_std_of_uniform_values_is_zero_stddev() {
        let (mean, std) = mean_std(&[2.0, 2.0, 2.0]);
        assert_eq!(mean, 2.0);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn test_mean_std_of_empty_is_nan() {
        let (mean, std) = mean_std(&[]);
        assert!(mean.is_nan());
        assert!(std.is_nan());
    }

    proptest! {
        #[test]
        fn prop_f1_bounded_and_monotonic(
            supported in 0u32..50,
            extra_supported in 0u32..50,
            not_supported in 0u32..50,
            k in 1i64..200,
        ) {
            let low = calculate_metrics(counts_of(supported, not_supported, 0), k).unwrap_or_else(|e| unreachable!("{e:?}"));
            let high = calculate_metrics(counts_of(supported + extra_supported, not_supported, 0), k).unwrap_or_else(|e| unreachable!("{e:?}"));
            prop_assert!(low.f1 <= 1.0 + 1e-9);
            prop_assert!(high.f1 <= 1.0 + 1e-9);
            prop_assert!(high.f1 + 1e-9 >= low.f1);
        }
    }
}
