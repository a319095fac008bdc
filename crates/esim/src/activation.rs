//! Activation cutoff for continuous fingerprints.
//!
//! The counter engine works on column sums, so a per-value cutoff has to be
//! applied to the member rows before they are summed. [`binarize`] maps every
//! value `>= threshold` to 1 and the rest to 0; NaN stays NaN so the column
//! is still skipped by the counters.

use ndarray::{Array2, ArrayView2};

use crate::config::EsimError;

/// Check that `threshold` can be used as an activation cutoff.
pub fn validate_activation_threshold(threshold: f64) -> Result<(), EsimError> {
    if threshold.is_finite() {
        Ok(())
    } else {
        Err(EsimError::InvalidActivationThreshold(threshold))
    }
}

/// Replace every value with its activity under `threshold`.
pub fn binarize(data: ArrayView2<'_, f64>, threshold: f64) -> Result<Array2<f64>, EsimError> {
    validate_activation_threshold(threshold)?;
    Ok(data.mapv(|v| {
        if v.is_nan() {
            v
        } else if v >= threshold {
            1.0
        } else {
            0.0
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::calculate_counters;
    use crate::{CThreshold, WFactor};
    use ndarray::{array, Axis};

    #[test]
    fn values_at_or_above_cutoff_are_active() {
        let rows = array![[0.2, 0.7], [0.5, 0.49]];
        let active = binarize(rows.view(), 0.5).unwrap();
        assert_eq!(active, array![[0.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    fn nan_survives_binarization() {
        let rows = array![[f64::NAN, 0.9]];
        let active = binarize(rows.view(), 0.5).unwrap();
        assert!(active[[0, 0]].is_nan());
        assert_eq!(active[[0, 1]], 1.0);
    }

    #[test]
    fn non_finite_cutoff_is_rejected() {
        let rows = array![[0.2, 0.7]];
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                binarize(rows.view(), bad),
                Err(EsimError::InvalidActivationThreshold(_))
            ));
        }
    }

    #[test]
    fn cutoff_changes_counters_of_continuous_rows() {
        let rows = array![[0.2, 0.7, 0.9], [0.3, 0.6, 0.4]];

        // Raw sums [0.5, 1.3, 1.3]: margins -1.0, 0.6, 0.6.
        let raw = rows.sum_axis(Axis(0));
        let c = calculate_counters(raw.view(), 2, CThreshold::Auto, WFactor::Unweighted).unwrap();
        assert_eq!((c.a, c.d, c.total_dis), (2, 1, 0));

        // Active at 0.5: [0,1,1] + [0,1,0] -> sums [0, 2, 1].
        let active = binarize(rows.view(), 0.5).unwrap().sum_axis(Axis(0));
        assert_eq!(active, array![0.0, 2.0, 1.0]);
        let c = calculate_counters(active.view(), 2, CThreshold::Auto, WFactor::Fraction).unwrap();
        assert_eq!((c.a, c.d, c.total_dis), (1, 1, 1));
        assert_eq!(c.w_a, 1.0);
        assert_eq!(c.w_d, 1.0);
        assert_eq!(c.total_w_dis, 1.0);
    }
}
