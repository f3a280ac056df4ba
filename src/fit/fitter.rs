//! Levenberg–Marquardt fit of `f(x) = a * exp(b * x) + c`.
//!
//! Given pass indices `x_i` and compression quotients `y_i` we minimize
//!
//! ```text
//! SSE(a, b, c) = Σ (y_i - f(x_i))²
//! ```
//!
//! starting from a fixed initial guess. Each iteration solves a damped linear
//! least squares problem (see `math::solve_damped_step`) with MINPACK-style
//! column scaling. A step is accepted only when it lowers the SSE; rejected
//! steps raise the damping.
//!
//! Termination:
//! - success when the relative SSE reduction of an accepted step is `<= ftol`,
//!   when the scaled step is `<= xtol` relative to the scaled parameters, when
//!   the scaled gradient is `<= gtol`, or on an exact fit
//! - failure when the model-evaluation budget runs out first
//!
//! There is no retry and no fallback initial guess.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ExpFit, ExpParams, FitQuality};
use crate::error::AppError;
use crate::math::solve_damped_step;
use crate::models::{PARAM_COUNT, fill_jacobian_row, predict};

/// Default model-evaluation budget.
pub const DEFAULT_MAX_EVALUATIONS: usize = 5000;

/// Default relative tolerance (`sqrt` of machine epsilon, rounded).
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-15;
const LAMBDA_MAX: f64 = 1e20;

/// Solver options.
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub initial: ExpParams,
    /// Maximum number of model evaluations (including the initial one).
    pub max_evaluations: usize,
    /// Relative SSE reduction tolerance.
    pub ftol: f64,
    /// Relative step size tolerance.
    pub xtol: f64,
    /// Scaled gradient tolerance.
    pub gtol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            initial: ExpParams::INITIAL_GUESS,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            ftol: DEFAULT_TOLERANCE,
            xtol: DEFAULT_TOLERANCE,
            gtol: 0.0,
        }
    }
}

/// Fit the exponential model to `(xs, ys)`.
pub fn fit_exponential(xs: &[f64], ys: &[f64], opts: &FitOptions) -> Result<ExpFit, AppError> {
    validate_inputs(xs, ys)?;
    if !opts.initial.is_finite() {
        return Err(AppError::fit("Initial parameter guess must be finite."));
    }

    let n = xs.len();
    let mut params = DVector::from_row_slice(&opts.initial.as_array());
    let mut residuals = compute_residuals(xs, ys, &params);
    let mut evaluations = 1usize;
    let mut sse = residuals.norm_squared();
    if !sse.is_finite() {
        return Err(AppError::fit("Model is not finite at the initial guess."));
    }

    let mut lambda = LAMBDA_INIT;
    let mut iterations = 0usize;
    let mut scale = DVector::<f64>::zeros(PARAM_COUNT);

    'outer: while sse > 0.0 {
        let jac = jacobian(xs, &params);
        update_scale(&mut scale, &jac);

        if scaled_gradient_norm(&jac, &residuals, sse) <= opts.gtol {
            break;
        }

        loop {
            if evaluations >= opts.max_evaluations {
                return Err(AppError::fit(format!(
                    "Exponential fit did not converge within {} model evaluations \
                     (last SSE={sse:.6e}, params=[{:.4}, {:.4}, {:.4}]).",
                    opts.max_evaluations, params[0], params[1], params[2]
                )));
            }

            let Some(step) = solve_damped_step(&jac, &residuals, &scale, lambda) else {
                lambda *= 10.0;
                if lambda > LAMBDA_MAX {
                    return Err(AppError::fit("Damped Gauss–Newton step could not be solved."));
                }
                continue;
            };

            let trial = &params + &step;
            let trial_residuals = compute_residuals(xs, ys, &trial);
            evaluations += 1;
            let trial_sse = trial_residuals.norm_squared();

            let step_norm = step.component_mul(&scale).norm();
            let param_norm = trial.component_mul(&scale).norm();
            let step_small = step_norm <= opts.xtol * (param_norm + opts.xtol);

            if trial_sse.is_finite() && trial_sse < sse {
                let reduction = sse - trial_sse;
                let previous = sse;
                params = trial;
                residuals = trial_residuals;
                sse = trial_sse;
                iterations += 1;
                lambda = (lambda / 10.0).max(LAMBDA_MIN);

                tracing::trace!(iteration = iterations, sse, lambda, "Accepted step");

                if step_small || reduction <= opts.ftol * previous {
                    break 'outer;
                }
                continue 'outer;
            }

            // No descent along a negligible step: we are at a stationary point.
            if step_small {
                break 'outer;
            }
            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                break 'outer;
            }
        }
    }

    let params = ExpParams::from_slice(params.as_slice());
    if !params.is_finite() {
        return Err(AppError::fit("Exponential fit produced non-finite parameters."));
    }

    tracing::debug!(
        a = params.a,
        b = params.b,
        c = params.c,
        sse,
        evaluations,
        iterations,
        "Exponential fit converged"
    );

    Ok(ExpFit {
        params,
        quality: FitQuality {
            sse,
            rmse: (sse / n as f64).sqrt(),
            n,
        },
        evaluations,
        iterations,
    })
}

fn validate_inputs(xs: &[f64], ys: &[f64]) -> Result<(), AppError> {
    if xs.len() != ys.len() {
        return Err(AppError::fit(format!(
            "Pass and quotient series differ in length (passes={}, quotients={}).",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < PARAM_COUNT {
        return Err(AppError::fit(format!(
            "Need at least {PARAM_COUNT} points to fit {PARAM_COUNT} parameters, got {}.",
            xs.len()
        )));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::fit("Fit input contains non-finite values."));
    }
    Ok(())
}

fn compute_residuals(xs: &[f64], ys: &[f64], params: &DVector<f64>) -> DVector<f64> {
    let p = ExpParams::from_slice(params.as_slice());
    DVector::from_iterator(
        xs.len(),
        xs.iter().zip(ys.iter()).map(|(&x, &y)| y - predict(&p, x)),
    )
}

fn jacobian(xs: &[f64], params: &DVector<f64>) -> DMatrix<f64> {
    let p = ExpParams::from_slice(params.as_slice());
    let mut jac = DMatrix::<f64>::zeros(xs.len(), PARAM_COUNT);
    let mut row = [0.0; PARAM_COUNT];
    for (i, &x) in xs.iter().enumerate() {
        fill_jacobian_row(&p, x, &mut row);
        for j in 0..PARAM_COUNT {
            jac[(i, j)] = row[j];
        }
    }
    jac
}

/// Column norms of the Jacobian, never decreasing across iterations.
fn update_scale(scale: &mut DVector<f64>, jac: &DMatrix<f64>) {
    for j in 0..PARAM_COUNT {
        let norm = jac.column(j).norm();
        let norm = if norm.is_finite() && norm > 0.0 { norm } else { 1.0 };
        scale[j] = scale[j].max(norm);
    }
}

/// `max_j |J_jᵀ r| / (‖J_j‖ ‖r‖)`, the cosine between residuals and columns.
fn scaled_gradient_norm(jac: &DMatrix<f64>, residuals: &DVector<f64>, sse: f64) -> f64 {
    let r_norm = sse.sqrt();
    let mut g = 0.0_f64;
    for j in 0..PARAM_COUNT {
        let col = jac.column(j);
        let col_norm = col.norm();
        if col_norm > 0.0 && r_norm > 0.0 {
            g = g.max((col.dot(residuals) / (col_norm * r_norm)).abs());
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(params: ExpParams, n: usize) -> (Vec<f64>, Vec<f64>) {
        let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let ys = xs.iter().map(|&x| predict(&params, x)).collect();
        (xs, ys)
    }

    #[test]
    fn recovers_known_parameters() {
        let truth = ExpParams { a: -1.05, b: -0.8, c: 1.02 };
        let (xs, ys) = synthetic(truth, 12);

        let fit = fit_exponential(&xs, &ys, &FitOptions::default()).unwrap();
        assert!((fit.params.a - truth.a).abs() < 1e-6, "a={}", fit.params.a);
        assert!((fit.params.b - truth.b).abs() < 1e-6, "b={}", fit.params.b);
        assert!((fit.params.c - truth.c).abs() < 1e-6, "c={}", fit.params.c);
        assert!(fit.quality.sse < 1e-12);
        assert!(fit.evaluations <= DEFAULT_MAX_EVALUATIONS);
    }

    #[test]
    fn interpolates_three_point_quotients() {
        // Quotients of the two-pass example log: [0, 50/70, 1].
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 50.0 / 70.0, 1.0];

        let fit = fit_exponential(&xs, &ys, &FitOptions::default()).unwrap();
        // Closed form: e^b = 0.4, a = -(5/7)/0.6, c = -a.
        assert!((fit.params.b - 0.4_f64.ln()).abs() < 1e-5, "b={}", fit.params.b);
        assert!((fit.params.a + (50.0 / 70.0) / 0.6).abs() < 1e-5, "a={}", fit.params.a);
        assert!((fit.params.c + fit.params.a).abs() < 1e-5);
    }

    #[test]
    fn tiny_budget_reports_non_convergence() {
        let truth = ExpParams { a: -2.0, b: -0.5, c: 2.0 };
        let (xs, ys) = synthetic(truth, 10);
        let opts = FitOptions {
            max_evaluations: 2,
            ..FitOptions::default()
        };

        let err = fit_exponential(&xs, &ys, &opts).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_FIT);
        assert!(err.message().contains("did not converge"));
    }

    #[test]
    fn exact_initial_guess_needs_no_steps() {
        let (xs, ys) = synthetic(ExpParams::INITIAL_GUESS, 5);
        let fit = fit_exponential(&xs, &ys, &FitOptions::default()).unwrap();
        assert_eq!(fit.iterations, 0);
        assert_eq!(fit.evaluations, 1);
        assert_eq!(fit.params, ExpParams::INITIAL_GUESS);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = fit_exponential(&[0.0, 1.0, 2.0], &[0.0, 1.0], &FitOptions::default()).unwrap_err();
        assert!(err.message().contains("differ in length"));
    }

    #[test]
    fn rejects_too_few_points() {
        let err = fit_exponential(&[0.0, 1.0], &[0.0, 1.0], &FitOptions::default()).unwrap_err();
        assert!(err.message().contains("at least 3 points"));
    }

    #[test]
    fn rejects_non_finite_input() {
        let err = fit_exponential(&[0.0, 1.0, 2.0], &[0.0, f64::NAN, 1.0], &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_FIT);
    }
}
