//! Error and fit statistics between a simulated monthly series and
//! partially-observed measured data.

use serde::{Deserialize, Serialize};

use crate::model::MonthlyResult;

use super::{ActualDataPoint, CalibError, ComparisonTarget};

/// One calendar month paired with its simulated value and, when the operator
/// recorded one, the metered value.
#[derive(Debug, Clone, Copy)]
pub struct MonthSample {
    pub month: u32,
    pub simulated: f64,
    pub observed: Option<f64>,
}

/// Scalar comparison metrics computed over matched months only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Root mean square error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Mean absolute percentage error (%). Pairs with a zero observation are
    /// excluded from this average only.
    pub mape: f64,
    /// Coefficient of determination. Zero by convention when the matched
    /// observations carry no variance.
    pub r_squared: f64,
    /// Largest absolute error across matched months.
    pub max_error: f64,
    /// Calendar month of the largest error; ties go to the earliest month.
    pub max_error_month: u32,
}

/// Pairs each actual data point with the simulated value for its month,
/// reading the field selected by `target`.
///
/// Months without a simulation record are skipped; months without an
/// observation are kept as unmatched samples.
pub fn align(
    results: &[MonthlyResult],
    actual: &[ActualDataPoint],
    target: ComparisonTarget,
) -> Vec<MonthSample> {
    actual
        .iter()
        .filter_map(|point| {
            let result = results.iter().find(|r| r.month == point.month)?;
            Some(MonthSample {
                month: point.month,
                simulated: target.value_of(result),
                observed: point.value_for(target),
            })
        })
        .collect()
}

/// Computes all comparison metrics over the matched samples.
///
/// # Errors
///
/// Returns `CalibError::InsufficientData` when no sample has an observation.
pub fn compute_metrics(samples: &[MonthSample]) -> Result<ComparisonMetrics, CalibError> {
    let matched: Vec<(u32, f64, f64)> = samples
        .iter()
        .filter_map(|s| s.observed.map(|obs| (s.month, s.simulated, obs)))
        .collect();

    if matched.is_empty() {
        return Err(CalibError::InsufficientData);
    }

    let n = matched.len() as f64;

    let mut sq_sum = 0.0;
    let mut abs_sum = 0.0;
    let mut mape_sum = 0.0;
    let mut mape_count = 0_usize;
    let mut max_error = f64::NEG_INFINITY;
    let mut max_error_month = 0_u32;

    for &(month, sim, obs) in &matched {
        let err = sim - obs;
        sq_sum += err * err;
        abs_sum += err.abs();

        if obs != 0.0 {
            mape_sum += (err / obs).abs() * 100.0;
            mape_count += 1;
        }

        // Ties break to the earliest calendar month, independent of the
        // order the caller supplied the data in
        if err.abs() > max_error || (err.abs() == max_error && month < max_error_month) {
            max_error = err.abs();
            max_error_month = month;
        }
    }

    let rmse = (sq_sum / n).sqrt();
    let mae = abs_sum / n;
    let mape = if mape_count > 0 {
        mape_sum / mape_count as f64
    } else {
        0.0
    };

    let obs_mean = matched.iter().map(|&(_, _, obs)| obs).sum::<f64>() / n;
    let ss_tot: f64 = matched
        .iter()
        .map(|&(_, _, obs)| (obs - obs_mean).powi(2))
        .sum();
    let r_squared = if ss_tot != 0.0 { 1.0 - sq_sum / ss_tot } else { 0.0 };

    Ok(ComparisonMetrics {
        rmse,
        mae,
        mape,
        r_squared,
        max_error,
        max_error_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(month: u32, simulated: f64, observed: Option<f64>) -> MonthSample {
        MonthSample {
            month,
            simulated,
            observed,
        }
    }

    #[test]
    fn identical_series_gives_perfect_fit() {
        let samples: Vec<MonthSample> = (1..=12)
            .map(|m| sample(m, 1000.0 + f64::from(m) * 50.0, Some(1000.0 + f64::from(m) * 50.0)))
            .collect();
        let m = compute_metrics(&samples).unwrap();
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.mape, 0.0);
        assert_eq!(m.r_squared, 1.0);
        assert_eq!(m.max_error, 0.0);
        assert_eq!(m.max_error_month, 1);
    }

    #[test]
    fn rmse_dominates_mae() {
        let samples = vec![
            sample(1, 10.0, Some(12.0)),
            sample(2, 10.0, Some(9.0)),
            sample(3, 10.0, Some(14.0)),
        ];
        let m = compute_metrics(&samples).unwrap();
        assert!(m.rmse >= m.mae);
        assert!(m.mae >= 0.0);
    }

    #[test]
    fn known_values() {
        // errors: +2, -1 → rmse = sqrt(5/2), mae = 1.5
        let samples = vec![sample(1, 12.0, Some(10.0)), sample(2, 19.0, Some(20.0))];
        let m = compute_metrics(&samples).unwrap();
        assert!((m.rmse - (2.5_f64).sqrt()).abs() < 1e-12);
        assert!((m.mae - 1.5).abs() < 1e-12);
        // mape = mean(20%, 5%) = 12.5
        assert!((m.mape - 12.5).abs() < 1e-12);
        assert_eq!(m.max_error_month, 1);
    }

    #[test]
    fn unmatched_months_are_excluded() {
        let samples = vec![
            sample(1, 20000.0, Some(20000.0)),
            sample(2, 99999.0, None),
            sample(3, 12345.0, None),
        ];
        let m = compute_metrics(&samples).unwrap();
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.max_error_month, 1);
    }

    #[test]
    fn single_matched_month_uses_that_month() {
        let samples = vec![sample(1, 21000.0, Some(20000.0))];
        let m = compute_metrics(&samples).unwrap();
        assert!((m.rmse - 1000.0).abs() < 1e-9);
        assert!((m.mae - 1000.0).abs() < 1e-9);
        assert!((m.mape - 5.0).abs() < 1e-9);
        assert_eq!(m.max_error_month, 1);
        // Single observation has no variance
        assert_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn zero_observation_excluded_from_mape_only() {
        let samples = vec![sample(1, 5.0, Some(0.0)), sample(2, 10.0, Some(10.0))];
        let m = compute_metrics(&samples).unwrap();
        // MAPE computed from month 2 only (perfect), month 1 excluded
        assert_eq!(m.mape, 0.0);
        // RMSE/MAE still include month 1's error of 5
        assert!(m.rmse > 0.0);
        assert!((m.mae - 2.5).abs() < 1e-12);
    }

    #[test]
    fn constant_observations_define_r_squared_as_zero() {
        let samples = vec![
            sample(1, 10.0, Some(50.0)),
            sample(2, 20.0, Some(50.0)),
            sample(3, 30.0, Some(50.0)),
        ];
        let m = compute_metrics(&samples).unwrap();
        assert_eq!(m.r_squared, 0.0);
        assert!(m.r_squared.is_finite());
    }

    #[test]
    fn max_error_tie_goes_to_earliest_month() {
        let samples = vec![
            sample(3, 10.0, Some(13.0)),
            sample(7, 10.0, Some(7.0)),
            sample(9, 10.0, Some(13.0)),
        ];
        let m = compute_metrics(&samples).unwrap();
        assert_eq!(m.max_error, 3.0);
        assert_eq!(m.max_error_month, 3);
    }

    #[test]
    fn max_error_tie_breaks_by_calendar_not_input_order() {
        // Month 9 arrives before month 3 with the same absolute error
        let samples = vec![
            sample(9, 10.0, Some(13.0)),
            sample(3, 10.0, Some(7.0)),
            sample(5, 10.0, Some(11.0)),
        ];
        let m = compute_metrics(&samples).unwrap();
        assert_eq!(m.max_error, 3.0);
        assert_eq!(m.max_error_month, 3);
    }

    #[test]
    fn no_observations_is_insufficient_data() {
        let samples = vec![sample(1, 10.0, None), sample(2, 20.0, None)];
        let err = compute_metrics(&samples).unwrap_err();
        assert!(matches!(err, CalibError::InsufficientData));

        let err = compute_metrics(&[]).unwrap_err();
        assert!(matches!(err, CalibError::InsufficientData));
    }
}
