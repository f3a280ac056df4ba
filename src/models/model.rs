//! Evaluation of the exponential decay model `f(x) = a * exp(b * x) + c`.
//!
//! The fitter relies on two primitive operations:
//! - predict `f(x)` for given parameters (residuals, plots, exports)
//! - fill a Jacobian row `∂f/∂(a, b, c)` at `x` (Gauss–Newton steps)

use crate::domain::ExpParams;

/// Number of model parameters.
pub const PARAM_COUNT: usize = 3;

/// Predict `f(x)`.
pub fn predict(params: &ExpParams, x: f64) -> f64 {
    params.a * (params.b * x).exp() + params.c
}

/// Fill the Jacobian row for a single abscissa.
///
/// ```text
/// ∂f/∂a = exp(b x)
/// ∂f/∂b = a x exp(b x)
/// ∂f/∂c = 1
/// ```
///
/// # Panics
/// Panics if `out` is shorter than [`PARAM_COUNT`].
pub fn fill_jacobian_row(params: &ExpParams, x: f64, out: &mut [f64]) {
    let e = (params.b * x).exp();
    out[0] = e;
    out[1] = params.a * x * e;
    out[2] = 1.0;
}

/// Sample the model on `[x_start, x_end]` with a fixed step.
///
/// Both endpoints are included when `x_end - x_start` is a multiple of `step`.
/// Returns an empty curve when the range is reversed or the step is not positive.
pub fn sample_curve(params: &ExpParams, x_start: f64, x_end: f64, step: f64) -> Vec<(f64, f64)> {
    if !(step.is_finite() && step > 0.0 && x_start.is_finite() && x_end.is_finite()) || x_end < x_start {
        return Vec::new();
    }

    // Relative slack so that e.g. 2.0 / 0.01 lands on 200 rather than 199.
    let n = ((x_end - x_start) / step + 1e-9).floor() as usize + 1;
    (0..n)
        .map(|i| {
            let x = x_start + step * i as f64;
            (x, predict(params, x))
        })
        .collect()
}

/// Human-readable formula with two-decimal coefficients, e.g. `1.19-1.19*exp(-0.92x)`.
///
/// The constant term leads; `+` is inserted before `a` only when `a` is not
/// negative, since a negative `a` already prints its own sign.
pub fn format_formula(params: &ExpParams) -> String {
    let polarity = if params.a.is_sign_negative() { "" } else { "+" };
    format!(
        "{:.2}{polarity}{:.2}*exp({:.2}x)",
        params.c, params.a, params.b
    )
}
