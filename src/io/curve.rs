//! Read/write curve JSON files.
//!
//! Curve JSON is the portable representation of a fitted compression curve:
//! - model parameters `(a, b, c)` and the legend formula
//! - fit quality and solver effort
//! - the fitted curve sampled on the fine pass axis, for quick re-plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{CompressionSeries, CurveFile, CurveGrid, ExpFit};
use crate::error::AppError;
use crate::models::{format_formula, sample_curve};

/// Build the curve document for a fitted log.
pub fn build_curve_file(source: &Path, series: &CompressionSeries, fit: &ExpFit, step: f64) -> CurveFile {
    let first = series.passes.first().copied().unwrap_or(0) as f64;
    let last = series.passes.last().copied().unwrap_or(0) as f64;
    let (pass, quotient): (Vec<f64>, Vec<f64>) = sample_curve(&fit.params, first, last, step).into_iter().unzip();

    CurveFile {
        tool: "cq".to_string(),
        source: source.to_path_buf(),
        generated: Local::now(),
        params: fit.params,
        formula: format_formula(&fit.params),
        fit_quality: fit.quality.clone(),
        evaluations: fit.evaluations,
        grid: CurveGrid { pass, quotient },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::io(format!("Failed to write curve JSON: {e}")))?;

    tracing::info!(path = %path.display(), points = curve.grid.pass.len(), "Wrote curve JSON");
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{ExpParams, FitQuality};

    #[test]
    fn curve_file_survives_disk() {
        let series = CompressionSeries {
            passes: vec![0, 1, 2],
            deltas: vec![0, -50, -20],
            bytes: vec![100, 80],
            cumulative: vec![0, -50, -70],
            quotients: vec![0.0, 50.0 / 70.0, 1.0],
        };
        let fit = ExpFit {
            params: ExpParams { a: -1.19, b: -0.916, c: 1.19 },
            quality: FitQuality { sse: 1e-20, rmse: 1e-10, n: 3 },
            evaluations: 9,
            iterations: 7,
        };

        let curve = build_curve_file(Path::new("code.log"), &series, &fit, 0.01);
        assert_eq!(curve.grid.pass.len(), 201);
        assert_eq!(curve.formula, "1.19-1.19*exp(-0.92x)");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.curve.json");
        write_curve_json(&path, &curve).unwrap();
        let back = read_curve_json(&path).unwrap();

        assert!((back.params.a - curve.params.a).abs() < 1e-12);
        assert!((back.params.b - curve.params.b).abs() < 1e-12);
        assert!((back.params.c - curve.params.c).abs() < 1e-12);
        assert_eq!(back.formula, curve.formula);
        assert_eq!(back.grid.pass.len(), curve.grid.pass.len());
        assert_eq!(back.source, PathBuf::from("code.log"));
    }
}
