//! Input/output helpers.
//!
//! - log loading and default input resolution (`load`)
//! - per-pass series exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod load;

pub use curve::*;
pub use export::*;
pub use load::*;
