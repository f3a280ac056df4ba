//! Series builder: align extracted values and derive compression quotients.
//!
//! Steps:
//! - prepend the baseline pass 0 (with delta 0)
//! - truncate byte counts to the number of passes (never pad)
//! - running sum of deltas
//! - normalize the running sum by its final value

use crate::domain::{CompressionSeries, PassLog};
use crate::error::AppError;

/// Build the aligned per-pass series for one log.
///
/// Fails when the total accumulated delta is zero, since the quotients would not
/// be finite. This includes logs with no pass lines at all.
pub fn build_series(log: &PassLog) -> Result<CompressionSeries, AppError> {
    let passes: Vec<u64> = std::iter::once(0).chain(log.passes.iter().copied()).collect();
    let deltas: Vec<i64> = std::iter::once(0).chain(log.deltas.iter().copied()).collect();

    let mut bytes = log.bytes.clone();
    bytes.truncate(passes.len());

    let cumulative = cumulative_sum(&deltas)?;
    let quotients = compression_quotients(&cumulative)?;

    if deltas.len() != passes.len() {
        tracing::warn!(
            passes = passes.len(),
            deltas = deltas.len(),
            "Pass and delta counts differ"
        );
    }
    if bytes.len() != passes.len() {
        tracing::warn!(
            passes = passes.len(),
            bytes = bytes.len(),
            "Fewer byte counts than passes"
        );
    }

    Ok(CompressionSeries {
        passes,
        deltas,
        bytes,
        cumulative,
        quotients,
    })
}

/// Running sum, same length as the input.
///
/// Fails when the sum leaves the `i64` range.
pub fn cumulative_sum(values: &[i64]) -> Result<Vec<i64>, AppError> {
    let mut acc = 0i64;
    let mut out = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        acc = acc.checked_add(v).ok_or_else(|| {
            AppError::data(format!(
                "Pass {i}: cumulative delta overflows i64 (running sum {acc}, delta {v})."
            ))
        })?;
        out.push(acc);
    }
    Ok(out)
}

/// `cumulative[i] / cumulative.last()`.
pub fn compression_quotients(cumulative: &[i64]) -> Result<Vec<f64>, AppError> {
    let total = cumulative.last().copied().unwrap_or(0);
    if total == 0 {
        return Err(AppError::data(
            "Total accumulated delta is zero; compression quotients are undefined.",
        ));
    }
    let total = total as f64;
    Ok(cumulative.iter().map(|&c| c as f64 / total).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_DATA;

    fn log(passes: &[u64], deltas: &[i64], bytes: &[i64]) -> PassLog {
        PassLog {
            passes: passes.to_vec(),
            deltas: deltas.to_vec(),
            bytes: bytes.to_vec(),
            ..PassLog::default()
        }
    }

    #[test]
    fn two_pass_example() {
        let s = build_series(&log(&[1, 2], &[-50, -20], &[100, 80])).unwrap();
        assert_eq!(s.passes, vec![0, 1, 2]);
        assert_eq!(s.deltas, vec![0, -50, -20]);
        assert_eq!(s.cumulative, vec![0, -50, -70]);
        assert_eq!(s.quotients.len(), 3);
        assert_eq!(s.quotients[0], 0.0);
        assert!((s.quotients[1] - 50.0 / 70.0).abs() < 1e-12);
        assert_eq!(s.quotients[2], 1.0);
        assert_eq!(s.total_delta(), -70);
        assert_eq!(s.pass_count(), 2);
    }

    #[test]
    fn passes_and_deltas_align_after_prefix() {
        let s = build_series(&log(&[1, 2, 3], &[-5, -3, -1], &[])).unwrap();
        assert_eq!(s.passes.len(), s.deltas.len());
        assert_eq!(*s.quotients.last().unwrap(), 1.0);
    }

    #[test]
    fn no_passes_is_an_error() {
        let err = build_series(&log(&[], &[], &[])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert!(err.message().contains("zero"));
    }

    #[test]
    fn deltas_summing_to_zero_is_an_error() {
        assert!(build_series(&log(&[1, 2], &[-5, 5], &[])).is_err());
    }

    #[test]
    fn longer_byte_series_is_truncated() {
        let s = build_series(&log(&[1, 2], &[-50, -20], &[100, 80, 60, 40])).unwrap();
        assert_eq!(s.bytes, vec![100, 80, 60]);
        assert!(s.bytes_aligned());
    }

    #[test]
    fn shorter_byte_series_is_left_as_is() {
        let s = build_series(&log(&[1, 2], &[-50, -20], &[100])).unwrap();
        assert_eq!(s.bytes, vec![100]);
        assert!(!s.bytes_aligned());
    }

    #[test]
    fn cumulative_overflow_is_a_data_error() {
        let err = cumulative_sum(&[i64::MAX, 1]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert!(err.message().contains("overflows i64"));

        let err = build_series(&log(&[1, 2, 3], &[i64::MAX, 1, 1], &[])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);

        assert_eq!(cumulative_sum(&[i64::MIN + 1, -1]).unwrap(), vec![i64::MIN + 1, i64::MIN]);
    }

    #[test]
    fn raw_deltas_need_not_be_monotone() {
        let s = build_series(&log(&[1, 2, 3], &[-10, 4, -6], &[])).unwrap();
        assert_eq!(s.cumulative, vec![0, -10, -6, -12]);
        assert_eq!(*s.quotients.last().unwrap(), 1.0);
    }
}
