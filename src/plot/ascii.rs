//! ASCII plotting for non-interactive terminal output.
//!
//! A fixed-size character grid: observed quotients are drawn as `o` over the
//! fitted curve's `-` line. Output is deterministic, so it is snapshot-tested.

use crate::domain::{CompressionSeries, CurveFile, ExpFit};
use crate::models::{format_formula, sample_curve};

/// Render observed quotients and the fitted curve for one log.
pub fn render_ascii_plot(series: &CompressionSeries, fit: &ExpFit, step: f64, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = series
        .passes
        .iter()
        .zip(series.quotients.iter())
        .map(|(&p, &q)| (p as f64, q))
        .collect();

    let first = series.passes.first().copied().unwrap_or(0) as f64;
    let last = series.passes.last().copied().unwrap_or(0) as f64;
    let curve = sample_curve(&fit.params, first, last, step);

    render_plot(&points, &curve, &format_formula(&fit.params), width, height)
}

/// Re-render a saved curve JSON (fitted grid only, no observed points).
pub fn render_curve_plot(curve: &CurveFile, width: usize, height: usize) -> String {
    let grid: Vec<(f64, f64)> = curve
        .grid
        .pass
        .iter()
        .copied()
        .zip(curve.grid.quotient.iter().copied())
        .collect();

    let mut out = format!(
        "Curve: {} (generated {})\n",
        curve.source.display(),
        curve.generated.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str(&render_plot(&[], &grid, &curve.formula, width, height));
    out
}

fn render_plot(points: &[(f64, f64)], curve: &[(f64, f64)], formula: &str, width: usize, height: usize) -> String {
    let (x_lo, x_hi) = bounds(points.iter().map(|p| p.0))
        .or_else(|| bounds(curve.iter().map(|p| p.0)))
        .unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = bounds(points.iter().chain(curve.iter()).map(|p| p.1)).unwrap_or((0.0, 1.0));
    let margin = ((y_hi - y_lo).abs() * 0.05).max(1e-12);

    let mut canvas = Canvas::new(width.max(10), height.max(5), [x_lo, x_hi], [y_lo - margin, y_hi + margin]);

    // Curve underneath, markers on top.
    let mut last: Option<(usize, usize)> = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            last = None;
            continue;
        }
        let cell = canvas.project(x, y);
        match last {
            Some(from) => canvas.stroke(from, cell, '-'),
            None => canvas.cells[cell.1][cell.0] = '-',
        }
        last = Some(cell);
    }
    for &(x, y) in points {
        let (col, row) = canvas.project(x, y);
        canvas.cells[row][col] = 'o';
    }

    let [y_min, y_max] = canvas.y;
    let mut out = format!("Plot: pass=[{x_lo:.2}, {x_hi:.2}] | quotient=[{y_min:.3}, {y_max:.3}]\n");
    for row in &canvas.cells {
        out.extend(row.iter());
        out.push('\n');
    }
    out.push_str("x: Pass | y: Compression Quotient\n");
    out.push_str("o Compression Quotients\n");
    out.push_str(&format!("- Exponential Fit: {formula}\n"));
    out
}

/// Finite `(min, max)` of the values, if they span a non-empty interval.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (hi > lo).then_some((lo, hi))
}

/// Character grid with a data-space projection. Row 0 is the top.
struct Canvas {
    cells: Vec<Vec<char>>,
    x: [f64; 2],
    y: [f64; 2],
}

impl Canvas {
    fn new(width: usize, height: usize, x: [f64; 2], y: [f64; 2]) -> Self {
        Self {
            cells: vec![vec![' '; width]; height],
            x,
            y,
        }
    }

    fn project(&self, x: f64, y: f64) -> (usize, usize) {
        let cols = (self.cells[0].len() - 1) as f64;
        let rows = (self.cells.len() - 1) as f64;
        let fx = ((x - self.x[0]) / (self.x[1] - self.x[0])).clamp(0.0, 1.0);
        let fy = ((y - self.y[0]) / (self.y[1] - self.y[0])).clamp(0.0, 1.0);
        ((fx * cols).round() as usize, (rows - fy * rows).round() as usize)
    }

    /// Bresenham segment; only blank cells are written.
    fn stroke(&mut self, from: (usize, usize), to: (usize, usize), ch: char) {
        let (mut c, mut r) = (from.0 as i64, from.1 as i64);
        let (c1, r1) = (to.0 as i64, to.1 as i64);
        let dc = (c1 - c).abs();
        let dr = (r1 - r).abs();
        let step_c = (c1 - c).signum();
        let step_r = (r1 - r).signum();
        let mut err = dc - dr;

        loop {
            if let Some(cell) = self.cells.get_mut(r as usize).and_then(|row| row.get_mut(c as usize)) {
                if *cell == ' ' {
                    *cell = ch;
                }
            }
            if c == c1 && r == r1 {
                return;
            }
            let twice = 2 * err;
            if twice >= -dr {
                err -= dr;
                c += step_c;
            }
            if twice <= dc {
                err += dc;
                r += step_r;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpParams, FitQuality};

    #[test]
    fn plot_golden_snapshot_small() {
        let points = [(0.0, 0.0), (1.0, 0.5), (2.0, 1.0)];
        let curve = [(0.0, 0.0), (2.0, 1.0)];

        let txt = render_plot(&points, &curve, "1.00-1.00*exp(-1.00x)", 10, 5);
        let expected = concat!(
            "Plot: pass=[0.00, 2.00] | quotient=[-0.050, 1.050]\n",
            "        -o\n",
            "      --  \n",
            "    -o    \n",
            "  --      \n",
            "o-        \n",
            "x: Pass | y: Compression Quotient\n",
            "o Compression Quotients\n",
            "- Exponential Fit: 1.00-1.00*exp(-1.00x)\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_from_series_has_requested_size() {
        let series = CompressionSeries {
            passes: vec![0, 1, 2, 3],
            deltas: vec![0, -60, -25, -15],
            bytes: vec![],
            cumulative: vec![0, -60, -85, -100],
            quotients: vec![0.0, 0.6, 0.85, 1.0],
        };
        let fit = ExpFit {
            params: ExpParams { a: -1.0, b: -0.9, c: 1.0 },
            quality: FitQuality { sse: 0.0, rmse: 0.0, n: 4 },
            evaluations: 1,
            iterations: 0,
        };

        let txt = render_ascii_plot(&series, &fit, 0.01, 40, 12);
        let lines: Vec<&str> = txt.lines().collect();
        // header + rows + axis line + two legend lines
        assert_eq!(lines.len(), 1 + 12 + 3);
        assert!(lines[1..13].iter().all(|l| l.chars().count() == 40));
        let markers: usize = lines[1..13].iter().map(|l| l.matches('o').count()).sum();
        assert_eq!(markers, 4);
    }

    #[test]
    fn saved_curve_plot_uses_grid_extent() {
        let fit = ExpFit {
            params: ExpParams { a: -1.0, b: -1.0, c: 1.0 },
            quality: FitQuality { sse: 0.0, rmse: 0.0, n: 4 },
            evaluations: 3,
            iterations: 2,
        };
        let series = CompressionSeries {
            passes: vec![0, 1, 2, 3],
            deltas: vec![0, -6, -3, -1],
            bytes: vec![],
            cumulative: vec![0, -6, -9, -10],
            quotients: vec![0.0, 0.6, 0.9, 1.0],
        };
        let curve = crate::io::build_curve_file(std::path::Path::new("code.log"), &series, &fit, 0.5);

        let txt = render_curve_plot(&curve, 30, 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].starts_with("Curve: code.log (generated "));
        assert!(lines[1].starts_with("Plot: pass=[0.00, 3.00]"));
        assert!(lines[2..10].iter().all(|l| !l.contains('o')));
        assert!(lines[2..10].iter().any(|l| l.contains('-')));
        assert_eq!(lines.last().copied(), Some("- Exponential Fit: 1.00-1.00*exp(-1.00x)"));
    }
}
