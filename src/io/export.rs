//! Export per-pass series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Byte counts may be shorter than the pass series; missing cells are left empty.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{CompressionSeries, ExpFit};
use crate::error::AppError;
use crate::models::predict;

/// Write per-pass series plus the fitted value to a CSV file.
pub fn write_series_csv(path: &Path, series: &CompressionSeries, fit: &ExpFit) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "pass,delta,cumulative_delta,bytes,quotient,fitted")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (i, &pass) in series.passes.iter().enumerate() {
        let fitted = predict(&fit.params, pass as f64);
        writeln!(
            file,
            "{},{},{},{},{:.10},{:.10}",
            pass,
            series.deltas.get(i).map(|v| v.to_string()).unwrap_or_default(),
            series.cumulative.get(i).map(|v| v.to_string()).unwrap_or_default(),
            series.bytes.get(i).map(|v| v.to_string()).unwrap_or_default(),
            series.quotients.get(i).copied().unwrap_or(f64::NAN),
            fitted,
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    tracing::info!(path = %path.display(), rows = series.passes.len(), "Wrote series CSV");
    Ok(())
}
