//! Instrumentation log parsing.
//!
//! - `region`: section filter (sentinel-delimited region of interest)
//! - `fields`: pass / delta / byte-count extraction
//!
//! Parsing is pure: the same text always yields the same [`PassLog`].

pub mod fields;
pub mod region;

pub use fields::*;
pub use region::*;

use crate::domain::{LogMarkers, PassLog};
use crate::error::AppError;

/// Run the section filter and the field extractor over a whole document.
pub fn parse_log(text: &str, markers: &LogMarkers) -> Result<PassLog, AppError> {
    let lines = filter_region(text, markers);
    let mut log = extract_fields(&lines, markers)?;
    log.lines_total = text.lines().count();

    tracing::debug!(
        lines_total = log.lines_total,
        lines_in_region = log.lines_in_region,
        passes = log.passes.len(),
        deltas = log.deltas.len(),
        bytes = log.bytes.len(),
        "Parsed log"
    );

    Ok(log)
}
