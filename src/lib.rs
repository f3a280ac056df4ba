//! `compression-curves` library crate.
//!
//! The binary (`cq`) is a thin wrapper around this library so that the
//! parse -> series -> fit pipeline is testable without spawning processes or
//! opening a terminal.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod parse;
pub mod plot;
pub mod report;
pub mod series;
pub mod tui;
