//! Least squares solver.
//!
//! Every continuum segment is a small linear regression:
//!
//! ```text
//! minimize Σ (y_i - x_i^T c)^2
//! ```
//!
//! where row `x_i` holds the Chebyshev basis `T_0..T_K` evaluated at the
//! rescaled wavelength of sample `i`, and `c` are the series coefficients.
//!
//! Implementation choices:
//! - SVD, because the design matrix is tall (many more pixels than
//!   coefficients) and nalgebra's `QR::solve` only handles square systems.
//! - Singular values below the tolerance are dropped, so a nearly rank
//!   deficient system still yields the minimum-norm solution instead of noise.

use nalgebra::{DMatrix, DVector};

/// Singular values below this fraction of the largest one are treated as zero.
const SINGULAR_VALUE_RTOL: f64 = 1e-13;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution could be found.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    let sigma_max = svd.singular_values.max();
    if !(sigma_max.is_finite() && sigma_max > 0.0) {
        return None;
    }

    let coeffs = svd.solve(y, SINGULAR_VALUE_RTOL * sigma_max).ok()?;
    coeffs.iter().all(|v| v.is_finite()).then_some(coeffs)
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
    fn least_squares_averages_noise() {
        // Constant model over symmetric noise recovers the mean.
        let x = DMatrix::from_element(4, 1, 1.0);
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 2.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rank_deficient_system_gives_minimum_norm_solution() {
        // Two identical columns: only their sum is determined.
        let x = DMatrix::from_element(3, 2, 1.0);
        let y = DVector::from_row_slice(&[2.0, 2.0, 2.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-12);
        assert!((beta[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn least_squares_rejects_zero_matrix() {
        let x = DMatrix::zeros(3, 2);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }
}
