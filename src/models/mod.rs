//! Exponential decay model implementation.
//!
//! The model is implemented as small, pure functions so that the solver and the
//! renderers can share it.

pub mod model;

pub use model::*;
