//! Field extraction for pass, delta and byte-count lines.
//!
//! Classification is by substring, first match wins:
//!
//! 1. pass line  -> integer after the first `#`
//! 2. delta line -> integer at the configured whitespace token
//! 3. byte line  -> integer at the configured whitespace token
//!
//! Unrecognised lines are ignored. A recognised line with a malformed value is a
//! hard error: the instrumentation output is assumed to be well formed.

use crate::domain::{LogMarkers, PassLog};
use crate::error::AppError;
use crate::parse::region::RegionLine;

/// What a forwarded line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Pass(u64),
    Delta(i64),
    Bytes(i64),
}

/// Classify a single line and extract its value.
///
/// Returns `Ok(None)` for lines that match none of the markers.
pub fn classify_line(line: &RegionLine<'_>, markers: &LogMarkers) -> Result<Option<LineField>, AppError> {
    if line.text.contains(&markers.pass) {
        return parse_pass_number(line).map(|n| Some(LineField::Pass(n)));
    }
    if line.text.contains(&markers.delta) {
        return parse_token(line, markers.value_token, "delta").map(|v| Some(LineField::Delta(v)));
    }
    if line.text.contains(&markers.bytes) {
        return parse_token(line, markers.value_token, "byte count").map(|v| Some(LineField::Bytes(v)));
    }
    Ok(None)
}

/// Extract pass, delta and byte sequences from the in-region lines.
pub fn extract_fields(lines: &[RegionLine<'_>], markers: &LogMarkers) -> Result<PassLog, AppError> {
    let mut log = PassLog {
        lines_in_region: lines.len(),
        ..PassLog::default()
    };

    for line in lines {
        match classify_line(line, markers)? {
            Some(LineField::Pass(n)) => log.passes.push(n),
            Some(LineField::Delta(v)) => log.deltas.push(v),
            Some(LineField::Bytes(v)) => log.bytes.push(v),
            None => {}
        }
    }

    Ok(log)
}

fn parse_pass_number(line: &RegionLine<'_>) -> Result<u64, AppError> {
    let Some(raw) = line.text.split('#').nth(1) else {
        return Err(AppError::data(format!(
            "Line {}: pass line has no '#<number>': {:?}",
            line.number, line.text
        )));
    };
    raw.trim().parse::<u64>().map_err(|e| {
        AppError::data(format!(
            "Line {}: invalid pass number {:?} ({e}): {:?}",
            line.number,
            raw.trim(),
            line.text
        ))
    })
}

fn parse_token(line: &RegionLine<'_>, index: usize, what: &str) -> Result<i64, AppError> {
    let Some(token) = line.text.split_whitespace().nth(index) else {
        return Err(AppError::data(format!(
            "Line {}: {what} line has no token at position {}: {:?}",
            line.number,
            index + 1,
            line.text
        )));
    };
    token.parse::<i64>().map_err(|e| {
        AppError::data(format!(
            "Line {}: invalid {what} {token:?} ({e}): {:?}",
            line.number, line.text
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_DATA;

    fn line(text: &str) -> RegionLine<'_> {
        RegionLine { number: 1, text }
    }

    #[test]
    fn classifies_each_line_shape() {
        let m = LogMarkers::default();
        assert_eq!(
            classify_line(&line("index.js:597 filterWinningInlineStyles pass #12"), &m).unwrap(),
            Some(LineField::Pass(12))
        );
        assert_eq!(
            classify_line(&line("index.js:606 context.delta -312"), &m).unwrap(),
            Some(LineField::Delta(-312))
        );
        assert_eq!(
            classify_line(&line("index.js:605 context.bytes 4821"), &m).unwrap(),
            Some(LineField::Bytes(4821))
        );
        assert_eq!(classify_line(&line("index.js:604 context.declarations 9"), &m).unwrap(), None);
    }

    #[test]
    fn pass_marker_takes_priority() {
        // Contains both the pass marker and the delta marker.
        let m = LogMarkers::default();
        let got = classify_line(&line("filterWinningInlineStyles pass #3 context.delta x"), &m).unwrap();
        assert_eq!(got, Some(LineField::Pass(3)));
    }

    #[test]
    fn pass_number_stops_at_next_hash() {
        let m = LogMarkers::default();
        let got = classify_line(&line("filterWinningInlineStyles pass # 4 #trailer"), &m).unwrap();
        assert_eq!(got, Some(LineField::Pass(4)));
    }

    #[test]
    fn malformed_values_are_data_errors() {
        let m = LogMarkers::default();

        let err = classify_line(&line("filterWinningInlineStyles pass"), &m).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);

        let err = classify_line(&line("filterWinningInlineStyles pass #two"), &m).unwrap_err();
        assert!(err.message().contains("invalid pass number"));

        let err = classify_line(&line("context.delta -50"), &m).unwrap_err();
        assert!(err.message().contains("no token at position 3"));

        let err = classify_line(&line("index.js:605 context.bytes 12.5"), &m).unwrap_err();
        assert!(err.message().contains("invalid byte count"));
    }

    #[test]
    fn value_token_is_configurable() {
        let m = LogMarkers {
            value_token: 1,
            ..LogMarkers::default()
        };
        assert_eq!(
            classify_line(&line("context.delta -50 x"), &m).unwrap(),
            Some(LineField::Delta(-50))
        );
    }

    #[test]
    fn extract_collects_in_order() {
        let lines = vec![
            RegionLine { number: 2, text: "filterWinningInlineStyles pass #1" },
            RegionLine { number: 3, text: "a context.delta -50" },
            RegionLine { number: 4, text: "a context.bytes 100" },
            RegionLine { number: 5, text: "noise" },
            RegionLine { number: 6, text: "filterWinningInlineStyles pass #2" },
            RegionLine { number: 7, text: "a context.delta -20" },
            RegionLine { number: 8, text: "a context.bytes 80" },
        ];
        let log = extract_fields(&lines, &LogMarkers::default()).unwrap();
        assert_eq!(log.passes, vec![1, 2]);
        assert_eq!(log.deltas, vec![-50, -20]);
        assert_eq!(log.bytes, vec![100, 80]);
        assert_eq!(log.lines_in_region, 7);
    }

    #[test]
    fn error_reports_line_number() {
        let lines = vec![RegionLine { number: 42, text: "x context.delta oops" }];
        let err = extract_fields(&lines, &LogMarkers::default()).unwrap_err();
        assert!(err.message().starts_with("Line 42:"));
    }
}
