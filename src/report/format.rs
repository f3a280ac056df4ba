//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the parsing/fitting code stays clean and testable
//! - output changes are localized

use std::path::Path;

use crate::domain::{CompressionSeries, ExpFit, PassLog};
use crate::models::format_formula;
use crate::report::PassResidual;

/// Format the run summary for one log (input stats + fit diagnostics).
pub fn format_run_summary(source: &Path, log: &PassLog, series: &CompressionSeries, fit: &ExpFit) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== cq - compression curve: {} ===\n", source.display()));
    out.push_str(&format!(
        "Lines: total={} | in region={}\n",
        log.lines_total, log.lines_in_region
    ));
    out.push_str(&format!(
        "Passes: {} | total delta={} | deltas={} | byte counts={}\n",
        series.pass_count(),
        series.total_delta(),
        log.deltas.len(),
        log.bytes.len(),
    ));
    if !series.bytes_aligned() {
        out.push_str(&format!(
            "Note: {} byte count(s) for {} pass entries (left as-is).\n",
            series.bytes.len(),
            series.passes.len()
        ));
    }

    out.push_str("\nExponential fit:\n");
    out.push_str(&format!("- formula: {}\n", format_formula(&fit.params)));
    out.push_str(&format!(
        "- params : a={:.6} b={:.6} c={:.6}\n",
        fit.params.a, fit.params.b, fit.params.c
    ));
    out.push_str(&format!(
        "- quality: SSE={:.3e} RMSE={:.3e} n={}\n",
        fit.quality.sse, fit.quality.rmse, fit.quality.n
    ));
    out.push_str(&format!(
        "- solver : evaluations={} iterations={}\n",
        fit.evaluations, fit.iterations
    ));
    out.push('\n');

    out
}

/// Format the per-pass table.
pub fn format_pass_table(residuals: &[PassResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>5} {:>10} {:>12} {:>10} {:>10} {:>10}\n",
        "pass", "delta", "cumulative", "quotient", "fitted", "residual"
    ));
    for r in residuals {
        out.push_str(&format!(
            "{:>5} {:>10} {:>12} {:>10.4} {:>10.4} {:>10.4}\n",
            r.pass, r.delta, r.cumulative, r.quotient, r.fitted, r.residual
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpParams, FitQuality};

    fn fixture() -> (PassLog, CompressionSeries, ExpFit) {
        let log = PassLog {
            passes: vec![1, 2],
            deltas: vec![-50, -20],
            bytes: vec![100],
            lines_total: 10,
            lines_in_region: 7,
        };
        let series = CompressionSeries {
            passes: vec![0, 1, 2],
            deltas: vec![0, -50, -20],
            bytes: vec![100],
            cumulative: vec![0, -50, -70],
            quotients: vec![0.0, 50.0 / 70.0, 1.0],
        };
        let fit = ExpFit {
            params: ExpParams { a: -1.19, b: -0.916, c: 1.19 },
            quality: FitQuality { sse: 0.0, rmse: 0.0, n: 3 },
            evaluations: 9,
            iterations: 7,
        };
        (log, series, fit)
    }

    #[test]
    fn summary_mentions_formula_and_alignment_note() {
        let (log, series, fit) = fixture();
        let txt = format_run_summary(Path::new("code.log"), &log, &series, &fit);
        assert!(txt.contains("code.log"));
        assert!(txt.contains("Passes: 2 | total delta=-70"));
        assert!(txt.contains("1.19-1.19*exp(-0.92x)"));
        assert!(txt.contains("Note: 1 byte count(s) for 3 pass entries"));
    }

    #[test]
    fn table_has_one_row_per_pass() {
        let (_, series, fit) = fixture();
        let rows = crate::report::compute_residuals(&series, &fit).unwrap();
        let txt = format_pass_table(&rows);
        assert_eq!(txt.lines().count(), 4);
    }
}
