//! Synthetic data generation (demo logs).

pub mod sample;

pub use sample::*;
