//! Curve fitting.
//!
//! Responsibilities:
//!
//! - run the Levenberg–Marquardt solver for the exponential model
//! - enforce the evaluation budget and report non-convergence

pub mod fitter;

pub use fitter::*;
