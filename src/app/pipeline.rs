//! Shared per-log pipeline used by both the chart viewer and the text report.
//!
//! load -> section filter + field extraction -> series -> fit -> residuals
//!
//! Front-ends only differ in presentation.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::domain::{CompressionSeries, ExpFit, PassLog, RunConfig};
use crate::error::AppError;
use crate::fit::{FitOptions, fit_exponential};
use crate::io::{build_curve_file, load_log, write_curve_json, write_series_csv};
use crate::parse::parse_log;
use crate::report::{PassResidual, compute_residuals};
use crate::series::build_series;

/// All computed outputs for one log.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: PathBuf,
    pub log: PassLog,
    pub series: CompressionSeries,
    pub fit: ExpFit,
    pub residuals: Vec<PassResidual>,
}

/// Run the pipeline for the log at `path`.
pub fn run_log(path: &Path, config: &RunConfig) -> Result<RunOutput, AppError> {
    let text = load_log(path)?;
    run_text(path, &text, config)
}

/// Run the pipeline on already-loaded log text.
pub fn run_text(source: &Path, text: &str, config: &RunConfig) -> Result<RunOutput, AppError> {
    let log = parse_log(text, &config.markers)?;
    let series = build_series(&log)?;

    let opts = FitOptions {
        max_evaluations: config.max_evaluations,
        ..FitOptions::default()
    };
    let fit = fit_exponential(&series.xs(), &series.quotients, &opts)?;
    let residuals = compute_residuals(&series, &fit)?;

    tracing::info!(
        source = %source.display(),
        passes = series.pass_count(),
        total_delta = series.total_delta(),
        a = fit.params.a,
        b = fit.params.b,
        c = fit.params.c,
        "Fitted compression curve"
    );

    Ok(RunOutput {
        source: source.to_path_buf(),
        log,
        series,
        fit,
        residuals,
    })
}

/// Export paths for one log inside `dir`.
pub fn export_paths(source: &Path, dir: &Path) -> (PathBuf, PathBuf) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    (
        dir.join(format!("{stem}.series.csv")),
        dir.join(format!("{stem}.curve.json")),
    )
}

/// Write the series CSV and curve JSON for a run.
pub fn write_exports(run: &RunOutput, dir: &Path, step: f64) -> Result<(PathBuf, PathBuf), AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let (csv_path, json_path) = export_paths(&run.source, dir);
    write_series_csv(&csv_path, &run.series, &run.fit)?;
    let curve = build_curve_file(&run.source, &run.series, &run.fit, step);
    write_curve_json(&json_path, &curve)?;

    Ok((csv_path, json_path))
}
