//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves the logs to process
//! - runs the per-log pipeline, one file at a time
//! - shows charts, prints reports or writes exports
//! - re-plots saved curve JSON

use clap::Parser;

use crate::cli::{Command, FitArgs, LogArgs, PlotArgs, SampleArgs, ShowArgs};
use crate::data::{SampleConfig, write_sample_log};
use crate::domain::{LogMarkers, RunConfig};
use crate::error::AppError;
use crate::io::{resolve_log_dir, resolve_logs};
use crate::tui::ChartView;

pub mod pipeline;

/// Entry point for the `cq` binary.
pub fn run() -> Result<(), AppError> {
    // `cq` and `cq code.log` behave like `cq show ...`. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Fit(args) => handle_fit(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.log);

    // Sequential: the next file is only read after the current chart is closed.
    for path in &config.logs {
        let run = pipeline::run_log(path, &config)?;
        let view = ChartView::new(&run.source, &run.series, &run.fit, config.curve_step);
        crate::tui::show(&view)?;
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let mut config = run_config_from_args(&args.log);
    config.plot = !args.no_plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.export_dir = args.export_dir.clone();

    for path in &config.logs {
        let run = pipeline::run_log(path, &config)?;

        println!(
            "{}",
            crate::report::format_run_summary(&run.source, &run.log, &run.series, &run.fit)
        );
        println!("{}", crate::report::format_pass_table(&run.residuals));

        if config.plot {
            let plot = crate::plot::render_ascii_plot(
                &run.series,
                &run.fit,
                config.curve_step,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }

        if let Some(dir) = &config.export_dir {
            let (csv, json) = pipeline::write_exports(&run, dir, config.curve_step)?;
            tracing::info!(csv = %csv.display(), json = %json.display(), "Wrote exports");
        }
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        passes: args.passes,
        initial_bytes: args.initial_bytes,
        reduction: args.reduction,
        decay: args.decay,
        noise: args.noise,
        seed: args.seed,
    };
    write_sample_log(&args.out, &config)?;
    println!("Wrote {} passes to {}", config.passes, args.out.display());
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::read_curve_json(&args.curve)?;
    println!("{}", crate::plot::render_curve_plot(&curve, args.width, args.height));
    Ok(())
}

/// Build the pipeline configuration shared by `show` and `fit`.
pub fn run_config_from_args(args: &LogArgs) -> RunConfig {
    let dir = resolve_log_dir(args.dir.as_deref());
    let logs = resolve_logs(&args.logs, &dir);

    RunConfig {
        logs,
        markers: markers_from_args(args),
        max_evaluations: args.max_evals,
        curve_step: args.step,
        plot: false,
        plot_width: 72,
        plot_height: 20,
        export_dir: None,
    }
}

fn markers_from_args(args: &LogArgs) -> LogMarkers {
    let defaults = LogMarkers::default();
    LogMarkers {
        region_start: args.region_start.clone().unwrap_or(defaults.region_start),
        region_end: args.region_end.clone().unwrap_or(defaults.region_end),
        pass: args.pass_marker.clone().unwrap_or(defaults.pass),
        delta: args.delta_marker.clone().unwrap_or(defaults.delta),
        bytes: args.bytes_marker.clone().unwrap_or(defaults.bytes),
        value_token: args.value_token,
    }
}

/// Rewrite argv so `cq` defaults to `cq show`.
///
/// Rules:
/// - `cq`                      -> `cq show`
/// - `cq -d logs ...`          -> `cq show -d logs ...`
/// - `cq code.log ...`         -> `cq show code.log ...`
/// - `cq --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("show".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "fit" | "sample" | "plot");
    if is_subcommand {
        return argv;
    }

    // Flags and bare log paths both belong to `show`.
    argv.insert(1, "show".to_string());
    argv
}
