//! Reporting utilities: per-pass residuals and formatted output.

pub mod format;

pub use format::*;

use crate::domain::{CompressionSeries, ExpFit};
use crate::error::AppError;
use crate::models::predict;

/// Observed vs fitted quotient for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassResidual {
    pub pass: u64,
    pub delta: i64,
    pub cumulative: i64,
    pub quotient: f64,
    pub fitted: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each pass.
pub fn compute_residuals(series: &CompressionSeries, fit: &ExpFit) -> Result<Vec<PassResidual>, AppError> {
    let mut out = Vec::with_capacity(series.passes.len());
    for (i, &pass) in series.passes.iter().enumerate() {
        let (Some(&delta), Some(&cumulative), Some(&quotient)) = (
            series.deltas.get(i),
            series.cumulative.get(i),
            series.quotients.get(i),
        ) else {
            break;
        };
        let fitted = predict(&fit.params, pass as f64);
        if !fitted.is_finite() {
            return Err(AppError::fit("Non-finite model prediction during residual computation."));
        }
        out.push(PassResidual {
            pass,
            delta,
            cumulative,
            quotient,
            fitted,
            residual: quotient - fitted,
        });
    }
    Ok(out)
}
