//! Section filter: forward only the lines inside the region of interest.
//!
//! The region flag starts off. For every line, in this exact order:
//!
//! 1. a line containing the start marker switches the flag on
//! 2. a line containing the end marker switches the flag off
//! 3. the line is skipped if the flag is off
//!
//! Consequences worth knowing:
//! - the start-sentinel line itself is forwarded
//! - the end-sentinel line is dropped, as is a line carrying both markers
//! - any later line containing the start marker re-opens the region

use crate::domain::LogMarkers;

/// A forwarded line with its 1-based line number in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Return the in-region lines of `text`, in document order.
pub fn filter_region<'a>(text: &'a str, markers: &LogMarkers) -> Vec<RegionLine<'a>> {
    let mut in_region = false;
    let mut out = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.contains(&markers.region_start) {
            in_region = true;
        }
        if line.contains(&markers.region_end) {
            in_region = false;
        }
        if !in_region {
            continue;
        }
        out.push(RegionLine {
            number: idx + 1,
            text: line,
        });
    }

    out
}
