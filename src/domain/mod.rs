//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the log grammar markers (`LogMarkers`)
//! - extracted and derived series (`PassLog`, `CompressionSeries`)
//! - fit outputs (`ExpParams`, `ExpFit`, `CurveFile`)

pub mod types;

pub use types::*;
