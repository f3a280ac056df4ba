//! Terminal plotting without a TUI (plain text output).

pub mod ascii;

pub use ascii::*;
