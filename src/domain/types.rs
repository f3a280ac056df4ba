//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during parsing and fitting
//! - exported to JSON/CSV
//! - rendered by both the terminal chart and the ASCII plot

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Substring markers that define the instrumentation log grammar.
///
/// The defaults match the console output of the inline-style minifier:
///
/// ```text
/// index.js:589 filterWinningInlineStyles
/// index.js:597 filterWinningInlineStyles pass #1
/// index.js:605 context.bytes 4821
/// index.js:606 context.delta -312
/// index.js:600 runtime(ms) 14.217
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMarkers {
    /// Substring that switches the region flag on.
    pub region_start: String,
    /// Substring that switches the region flag off.
    pub region_end: String,
    /// Substring identifying a pass line (`... pass #<N>`).
    pub pass: String,
    /// Substring identifying a delta line.
    pub delta: String,
    /// Substring identifying a byte-count line.
    pub bytes: String,
    /// Whitespace token index holding the value on delta/byte lines.
    pub value_token: usize,
}

impl Default for LogMarkers {
    fn default() -> Self {
        Self {
            region_start: "filterWinningInlineStyles".to_string(),
            region_end: "runtime(ms)".to_string(),
            pass: "filterWinningInlineStyles pass".to_string(),
            delta: "context.delta".to_string(),
            bytes: "context.bytes".to_string(),
            value_token: 2,
        }
    }
}

/// Raw values extracted from the region of interest of one log.
///
/// Sequences are in log order, without the implicit pass-0 baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassLog {
    pub passes: Vec<u64>,
    pub deltas: Vec<i64>,
    pub bytes: Vec<i64>,
    /// Total number of lines in the document.
    pub lines_total: usize,
    /// Number of lines forwarded by the section filter.
    pub lines_in_region: usize,
}

/// Aligned per-pass series derived from a [`PassLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionSeries {
    /// Pass indices, starting with the implicit baseline pass 0.
    pub passes: Vec<u64>,
    /// Per-pass deltas, starting with the baseline delta 0.
    pub deltas: Vec<i64>,
    /// Byte counts, truncated to `passes.len()` (never padded).
    pub bytes: Vec<i64>,
    /// Running sum of `deltas`.
    pub cumulative: Vec<i64>,
    /// `cumulative / cumulative.last()`; the last element is 1.0.
    pub quotients: Vec<f64>,
}

impl CompressionSeries {
    /// Total accumulated delta (last cumulative value).
    pub fn total_delta(&self) -> i64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Pass indices as the fit's independent variable.
    pub fn xs(&self) -> Vec<f64> {
        self.passes.iter().map(|&p| p as f64).collect()
    }

    /// Whether the byte-count series lines up with the pass series.
    pub fn bytes_aligned(&self) -> bool {
        self.bytes.len() == self.passes.len()
    }

    /// Number of real passes (excluding the baseline).
    pub fn pass_count(&self) -> usize {
        self.passes.len().saturating_sub(1)
    }
}

/// Parameters of the exponential model `a * exp(b * x) + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ExpParams {
    /// Starting point for the nonlinear solver.
    pub const INITIAL_GUESS: ExpParams = ExpParams {
        a: -1.0,
        b: -1.9,
        c: 1.0,
    };

    pub fn as_array(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    pub fn from_slice(v: &[f64]) -> Self {
        Self {
            a: v[0],
            b: v[1],
            c: v[2],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Output of the exponential fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpFit {
    pub params: ExpParams,
    pub quality: FitQuality,
    /// Number of model evaluations spent (counted against the budget).
    pub evaluations: usize,
    /// Number of accepted solver steps.
    pub iterations: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, `.env` and defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Log files to process, in order.
    pub logs: Vec<PathBuf>,
    pub markers: LogMarkers,
    /// Evaluation budget for the nonlinear solver.
    pub max_evaluations: usize,
    /// Pass-axis step for the sampled fitted curve.
    pub curve_step: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Directory receiving `<stem>.series.csv` and `<stem>.curve.json`.
    pub export_dir: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub source: PathBuf,
    pub generated: DateTime<Local>,
    pub params: ExpParams,
    pub formula: String,
    pub fit_quality: FitQuality,
    pub evaluations: usize,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub pass: Vec<f64>,
    pub quotient: Vec<f64>,
}
