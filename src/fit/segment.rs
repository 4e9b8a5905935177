//! Reference least-squares line for each segment window.
//!
//! The fit uses the same parameterisation as the sliders: the intercept is the
//! value at the record's earliest date, so a fit can be dispatched straight to
//! the slope/intercept controls.

use crate::domain::{Observation, Segment, SignalType};
use crate::math::{LineFit, fit_line};
use crate::models::min_date;

/// Length in years of each segment window.
pub const SEGMENT_WINDOW_YEARS: f64 = 5.0;

/// Date window `[start, end)` (first) or `(start, end]` (last) of a segment.
pub fn segment_window(observations: &[Observation], segment: Segment) -> Option<(f64, f64)> {
    let dates: Vec<f64> = observations.iter().map(|o| o.date).collect();
    let lo = min_date(&dates)?;
    let hi = dates.iter().copied().reduce(f64::max)?;
    Some(match segment {
        Segment::First => (lo, lo + SEGMENT_WINDOW_YEARS),
        Segment::Last => (hi - SEGMENT_WINDOW_YEARS, hi),
    })
}

fn in_window(segment: Segment, date: f64, (start, end): (f64, f64)) -> bool {
    match segment {
        Segment::First => date >= start && date < end,
        Segment::Last => date > start && date <= end,
    }
}

/// Fit `signal = slope * (date - min_date) + intercept` on the segment window.
pub fn segment_fit(observations: &[Observation], segment: Segment, signal: SignalType) -> Option<LineFit> {
    let window = segment_window(observations, segment)?;
    let reference = observations.iter().map(|o| o.date).reduce(f64::min)?;

    let points: Vec<(f64, f64)> = observations
        .iter()
        .filter(|o| in_window(segment, o.date, window))
        .map(|o| (o.date - reference, o.value(signal)))
        .collect();

    fit_line(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn synthetic(start: f64, years: usize, slope: f64, base: f64) -> Vec<Observation> {
        (0..years * 12)
            .map(|i| {
                let date = start + i as f64 / 12.0;
                let seasonal = 3.0 * (i as f64 * std::f64::consts::TAU / 12.0).sin();
                let adjusted = base + slope * (date - start);
                Observation {
                    month: NaiveDate::from_ymd_opt(date.floor() as i32, (i % 12) as u32 + 1, 1).unwrap(),
                    date,
                    raw: adjusted + seasonal,
                    adjusted,
                }
            })
            .collect()
    }

    #[test]
    fn first_segment_fit_matches_generating_line() {
        let obs = synthetic(1958.0, 20, 0.8, 315.0);
        let fit = segment_fit(&obs, Segment::First, SignalType::SeasonallyAdjusted).unwrap();
        assert!((fit.slope - 0.8).abs() < 1e-9);
        assert!((fit.intercept - 315.0).abs() < 1e-9);
        assert_eq!(fit.n, 60);
    }

    #[test]
    fn last_segment_uses_trailing_window() {
        let mut obs = synthetic(1958.0, 10, 0.8, 315.0);
        // Steeper line from mid-1962 on; the trailing window starts near 1962.92.
        for o in obs.iter_mut().filter(|o| o.date > 1962.5) {
            o.adjusted = 319.0 + 2.0 * (o.date - 1963.0);
        }
        let fit = segment_fit(&obs, Segment::Last, SignalType::SeasonallyAdjusted).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9, "slope={}", fit.slope);
        // Intercept is referenced to the record start: 319 - 2 * 5.
        assert!((fit.intercept - 309.0).abs() < 1e-9, "intercept={}", fit.intercept);
    }

    #[test]
    fn too_few_points_yield_no_fit() {
        let obs = synthetic(1958.0, 1, 0.8, 315.0);
        assert!(segment_fit(&obs[..1], Segment::First, SignalType::Raw).is_none());
        assert!(segment_fit(&[], Segment::Last, SignalType::Raw).is_none());
    }
}
