//! Chebyshev series on [-1, 1].
//!
//! A series of degree `K` is `f(t) = Σ_{k=0..=K} c_k T_k(t)` with the
//! three-term recurrence `T_0 = 1`, `T_1 = t`, `T_k = 2t·T_{k-1} − T_{k-2}`.
//! Coefficients are stored lowest degree first and `c_0` is not halved.

use nalgebra::{DMatrix, DVector};

use crate::math::solve_least_squares;

/// `2·(x − lower)/span − 1`.
///
/// With `span = max − lower` this maps `[lower, max]` onto `[-1, 1]`; a wider
/// span leaves the image inside `[-1, 1)`.
pub fn rescale_with_span(x: f64, lower: f64, span: f64) -> f64 {
    2.0 * (x - lower) / span - 1.0
}

/// Fill `out` with `T_0(t)..T_{out.len()-1}(t)`.
pub fn fill_basis_row(t: f64, out: &mut [f64]) {
    for k in 0..out.len() {
        out[k] = match k {
            0 => 1.0,
            1 => t,
            _ => 2.0 * t * out[k - 1] - out[k - 2],
        };
    }
}

/// Evaluate a Chebyshev series with the Clenshaw recurrence.
pub fn cheb_eval(coeffs: &[f64], t: f64) -> f64 {
    match coeffs.len() {
        0 => return 0.0,
        1 => return coeffs[0],
        _ => {}
    }

    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for &c in coeffs[1..].iter().rev() {
        let bk = 2.0 * t * b1 - b2 + c;
        b2 = b1;
        b1 = bk;
    }
    t * b1 - b2 + coeffs[0]
}

/// Least-squares Chebyshev fit of degree `degree` to `(t_i, y_i)`.
///
/// Columns are normalised before solving and the scale is folded back into
/// the coefficients afterwards, which keeps high-degree fits well conditioned.
/// Returns `None` for mismatched inputs, fewer than `degree + 1` points, or a
/// system without a finite solution.
pub fn cheb_fit(t: &[f64], y: &[f64], degree: usize) -> Option<Vec<f64>> {
    let n = t.len();
    let p = degree + 1;
    if n != y.len() || n < p {
        return None;
    }

    let mut x = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &ti) in t.iter().enumerate() {
        fill_basis_row(ti, &mut row);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
    }

    let mut scale = vec![1.0; p];
    for (j, s) in scale.iter_mut().enumerate() {
        let norm = x.column(j).norm();
        if norm > 0.0 && norm.is_finite() {
            *s = norm;
            x.column_mut(j).unscale_mut(norm);
        }
    }

    let rhs = DVector::from_column_slice(y);
    let solved = solve_least_squares(&x, &rhs)?;

    Some(solved.iter().zip(scale.iter()).map(|(c, s)| c / s).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_with_span_maps_lower_bound_to_minus_one() {
        assert_eq!(rescale_with_span(0.638, 0.638, 0.022), -1.0);
        assert!(rescale_with_span(0.649, 0.638, 0.022).abs() < 1e-12);
        // A wider span keeps the image inside [-1, 1).
        assert!(rescale_with_span(0.66, 0.638, 0.1) < 0.0);
    }

    #[test]
    fn basis_matches_closed_forms() {
        let mut row = [0.0; 5];
        let t = 0.3_f64;
        fill_basis_row(t, &mut row);
        assert_eq!(row[0], 1.0);
        assert_eq!(row[1], t);
        assert!((row[2] - (2.0 * t * t - 1.0)).abs() < 1e-15);
        assert!((row[3] - (4.0 * t.powi(3) - 3.0 * t)).abs() < 1e-15);
        assert!((row[4] - (4.0 * t.acos()).cos()).abs() < 1e-12);
    }

    #[test]
    fn clenshaw_agrees_with_explicit_sum() {
        let coeffs = [0.5, -1.25, 2.0, 0.75];
        let mut row = [0.0; 4];
        for &t in &[-1.0, -0.4, 0.0, 0.3, 1.0] {
            fill_basis_row(t, &mut row);
            let direct: f64 = coeffs.iter().zip(row.iter()).map(|(c, b)| c * b).sum();
            assert!((cheb_eval(&coeffs, t) - direct).abs() < 1e-12);
        }
        assert_eq!(cheb_eval(&[], 0.2), 0.0);
        assert_eq!(cheb_eval(&[3.0], 0.2), 3.0);
    }

    #[test]
    fn fit_recovers_exact_series() {
        let coeffs = [1.0, -0.5, 0.25, 0.125];
        let t: Vec<f64> = (0..40).map(|i| -1.0 + 2.0 * i as f64 / 39.0).collect();
        let y: Vec<f64> = t.iter().map(|&ti| cheb_eval(&coeffs, ti)).collect();

        let fit = cheb_fit(&t, &y, 3).unwrap();
        for (a, b) in fit.iter().zip(coeffs.iter()) {
            assert!((a - b).abs() < 1e-10, "{a} vs {b}");
        }
    }

    #[test]
    fn fit_requires_enough_points() {
        let t = [-1.0, 0.0, 1.0];
        let y = [1.0, 2.0, 3.0];
        assert!(cheb_fit(&t, &y, 3).is_none());
        assert!(cheb_fit(&t, &y, 2).is_some());
    }
}
