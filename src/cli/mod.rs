//! Command-line parsing for the compression curve fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! parsing/fitting code; `app` turns these structs into a `RunConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::fit::DEFAULT_MAX_EVALUATIONS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cq", version, about = "Fit exponential compression curves to minifier pass logs")]
pub struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show an interactive chart per log (blocks until each chart is closed).
    Show(ShowArgs),
    /// Print a summary, per-pass table and ASCII plot per log; optionally export.
    Fit(FitArgs),
    /// Write a synthetic instrumentation log.
    Sample(SampleArgs),
    /// Re-plot a saved curve JSON as ASCII.
    Plot(PlotArgs),
}

/// Options shared by every command that reads logs.
#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Log files to process, in order (default: code.log and wikipedia.log).
    #[arg(value_name = "LOG")]
    pub logs: Vec<PathBuf>,

    /// Directory holding the default logs (falls back to $CQ_LOG_DIR, then the
    /// executable's directory if it holds code.log or wikipedia.log, then `.`).
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Model-evaluation budget for the curve fit.
    #[arg(long, default_value_t = DEFAULT_MAX_EVALUATIONS)]
    pub max_evals: usize,

    /// Pass-axis step for the sampled fitted curve.
    #[arg(long, default_value_t = 0.01)]
    pub step: f64,

    /// Substring that opens the region of interest.
    #[arg(long)]
    pub region_start: Option<String>,

    /// Substring that closes the region of interest.
    #[arg(long)]
    pub region_end: Option<String>,

    /// Substring identifying pass lines (`... pass #<N>`).
    #[arg(long)]
    pub pass_marker: Option<String>,

    /// Substring identifying delta lines.
    #[arg(long)]
    pub delta_marker: Option<String>,

    /// Substring identifying byte-count lines.
    #[arg(long)]
    pub bytes_marker: Option<String>,

    /// Zero-based whitespace token index of the value on delta/byte lines.
    #[arg(long, default_value_t = 2)]
    pub value_token: usize,
}

/// Options for the interactive chart.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub log: LogArgs,
}

/// Options for the text report.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub log: LogArgs,

    /// Disable the ASCII plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write `<stem>.series.csv` and `<stem>.curve.json` per log into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

/// Options for synthetic log generation.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output log path.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub out: PathBuf,

    /// Number of passes.
    #[arg(short = 'n', long, default_value_t = 8)]
    pub passes: usize,

    /// Byte count before the first pass.
    #[arg(long, default_value_t = 120_000)]
    pub initial_bytes: i64,

    /// Fraction of the initial bytes removed over all passes.
    #[arg(long, default_value_t = 0.35)]
    pub reduction: f64,

    /// Per-pass decay ratio of the deltas.
    #[arg(long, default_value_t = 0.45)]
    pub decay: f64,

    /// Relative standard deviation of the noise on each delta.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for re-plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON written by `cq fit --export-dir`.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
