//! Linear CO2 trend evaluation.

/// Predict the concentration at `target_date` for a line through
/// `(reference_date, intercept)` with the given slope.
pub fn predict(slope: f64, intercept: f64, reference_date: f64, target_date: f64) -> f64 {
    slope * (target_date - reference_date) + intercept
}

/// Evaluate the line at every date, referenced to the earliest date.
///
/// The output has exactly one value per input date, in input order.
pub fn trend_series(slope: f64, intercept: f64, dates: &[f64]) -> Vec<f64> {
    let Some(reference) = min_date(dates) else {
        return Vec::new();
    };
    dates
        .iter()
        .map(|&d| predict(slope, intercept, reference, d))
        .collect()
}

/// Earliest date in the slice (`None` when empty).
pub fn min_date(dates: &[f64]) -> Option<f64> {
    dates.iter().copied().reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_2030_from_1958() {
        let y = predict(2.0, 312.0, 1958.0, 2030.0);
        assert!((y - 456.0).abs() < 1e-12);
    }

    #[test]
    fn predict_is_linear_in_target() {
        let cases = [
            (0.0, 250.0, 1958.0, 1960.5, 2021.25),
            (1.65, 312.0, 1958.2, 1958.2, 2030.0),
            (3.0, 320.0, 1958.0, 1900.0, 1800.0),
            (-0.7, 10.0, 0.0, -5.0, 5.0),
        ];
        for (s, i, r, t1, t2) in cases {
            let diff = predict(s, i, r, t2) - predict(s, i, r, t1);
            assert!((diff - s * (t2 - t1)).abs() < 1e-9, "s={s} t1={t1} t2={t2}");
        }
    }

    #[test]
    fn series_is_referenced_to_earliest_date() {
        let dates = [1958.25, 1958.5, 1959.25];
        let ys = trend_series(2.0, 312.0, &dates);
        assert_eq!(ys.len(), dates.len());
        assert!((ys[0] - 312.0).abs() < 1e-12);
        assert!((ys[2] - 314.0).abs() < 1e-12);
        assert!(trend_series(1.0, 1.0, &[]).is_empty());
    }
}
