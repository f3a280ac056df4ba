//! Mathematical utilities: least squares solves for damped Gauss–Newton steps.

pub mod ols;

pub use ols::*;
