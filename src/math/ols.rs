//! Linear least squares solvers.
//!
//! The exponential fit is nonlinear, but each Levenberg–Marquardt step reduces to
//! a small *linear* least squares problem:
//!
//! ```text
//! minimize ‖J δ - r‖² + λ ‖D δ‖²
//! ```
//!
//! which is the same as an ordinary least squares problem on the augmented system
//!
//! ```text
//! [ J      ] δ = [ r ]
//! [ √λ · D ]     [ 0 ]
//! ```
//!
//! Implementation choices:
//! - We solve via SVD so that tall systems (more rows than columns) and nearly
//!   collinear Jacobian columns are handled without panicking.
//!   (Nalgebra's `QR::solve` is intended for square systems.)
//! - The parameter dimension is tiny (3 columns), so SVD cost is negligible.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve one damped Gauss–Newton step.
///
/// `jac` is the `n × p` Jacobian of the model at the current parameters,
/// `residuals` is `y - f(x)`, `scale` holds the per-parameter scaling `D` and
/// `lambda` the damping factor.
pub fn solve_damped_step(
    jac: &DMatrix<f64>,
    residuals: &DVector<f64>,
    scale: &DVector<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    let n = jac.nrows();
    let p = jac.ncols();
    if residuals.len() != n || scale.len() != p {
        return None;
    }

    let mut a = DMatrix::<f64>::zeros(n + p, p);
    let mut b = DVector::<f64>::zeros(n + p);

    a.view_mut((0, 0), (n, p)).copy_from(jac);
    b.rows_mut(0, n).copy_from(residuals);

    let damp = lambda.max(0.0).sqrt();
    for j in 0..p {
        a[(n + j, j)] = damp * scale[j];
    }

    solve_least_squares(&a, &b)
}
