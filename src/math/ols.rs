//! Ordinary least squares for a straight line.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - (a + b x_i))^2
//! ```
//!
//! by building the `n × 2` design matrix `[1, x_i]` and solving it with SVD.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit a straight line through `(x, y)` pairs.
///
/// Returns `None` for fewer than two points or when all `x` coincide.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let (x0, _) = points[0];
    if points.iter().all(|&(x, _)| (x - x0).abs() < 1e-12) {
        return None;
    }

    let x = DMatrix::from_fn(n, 2, |r, c| if c == 0 { 1.0 } else { points[r].0 });
    let y = DVector::from_iterator(n, points.iter().map(|&(_, y)| y));

    let beta = solve_least_squares(&x, &y)?;
    let (intercept, slope) = (beta[0], beta[1]);

    let sse: f64 = points
        .iter()
        .map(|&(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();

    Some(LineFit {
        slope,
        intercept,
        rmse: (sse / n as f64).sqrt(),
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_noisy_trend() {
        // Sxy = 6.5, Sxx = 5 -> slope 1.3, intercept 314.25 - 1.3 * 1.5.
        let points = [(0.0, 312.5), (1.0, 313.0), (2.0, 315.5), (3.0, 316.0)];
        let fit = fit_line(&points).unwrap();
        assert!((fit.slope - 1.3).abs() < 1e-9, "slope={}", fit.slope);
        assert!((fit.intercept - 312.3).abs() < 1e-9, "intercept={}", fit.intercept);
        assert_eq!(fit.n, 4);
        assert!(fit.rmse > 0.0);
    }

    #[test]
    fn fit_line_rejects_degenerate_input() {
        assert!(fit_line(&[(1.0, 2.0)]).is_none());
        assert!(fit_line(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
    }
}
