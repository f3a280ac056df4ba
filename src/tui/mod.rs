//! Ratatui-based chart viewer.
//!
//! Shows one log's observed compression quotients and the fitted exponential
//! curve, and blocks until the user dismisses the screen.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::domain::{CompressionSeries, ExpFit};
use crate::error::AppError;
use crate::models::{format_formula, sample_curve};

mod plotters_chart;

use plotters_chart::CompressionChart;

/// Everything the viewer needs to draw one log.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub title: String,
    pub points: Vec<(f64, f64)>,
    pub curve: Vec<(f64, f64)>,
    pub formula: String,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub details: String,
}

impl ChartView {
    /// Prepare the chart series for a fitted log.
    pub fn new(source: &Path, series: &CompressionSeries, fit: &ExpFit, step: f64) -> Self {
        let points: Vec<(f64, f64)> = series
            .passes
            .iter()
            .zip(series.quotients.iter())
            .map(|(&p, &q)| (p as f64, q))
            .collect();

        let first = series.passes.first().copied().unwrap_or(0) as f64;
        let last = series.passes.last().copied().unwrap_or(0) as f64;
        let curve = sample_curve(&fit.params, first, last, step);

        let mut x_bounds = [first, last];
        if x_bounds[1] <= x_bounds[0] {
            x_bounds = [first - 0.5, first + 0.5];
        }

        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(_, y) in points.iter().chain(curve.iter()) {
            if y.is_finite() {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
            y_min = 0.0;
            y_max = 1.0;
        }
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

        Self {
            title: source.display().to_string(),
            points,
            curve,
            formula: format_formula(&fit.params),
            x_bounds,
            y_bounds: [y_min - pad, y_max + pad],
            details: format!(
                "passes={} | total delta={} | rmse={:.3e} | evaluations={}",
                series.pass_count(),
                series.total_delta(),
                fit.quality.rmse,
                fit.evaluations
            ),
        }
    }
}

/// Show the chart and block until it is dismissed (`q`, `Esc` or `Enter`).
pub fn show(view: &ChartView) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    event_loop(&mut terminal, view)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn event_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, view: &ChartView) -> Result<(), AppError> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal
                .draw(|f| draw(f, view))
                .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
            needs_redraw = false;
        }

        if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::io(format!("Event poll error: {e}")))? {
            continue;
        }

        match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press && is_dismiss_key(key.code) {
                    return Ok(());
                }
            }
            Event::Resize(_, _) => needs_redraw = true,
            _ => {}
        }
    }
}

fn is_dismiss_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
}

fn draw(frame: &mut ratatui::Frame<'_>, view: &ChartView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
        .split(frame.area());

    draw_header(frame, chunks[0], view);
    draw_chart(frame, chunks[1], view);
    draw_footer(frame, chunks[2]);
}

fn draw_header(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ChartView) {
    let lines = vec![
        Line::from(vec![
            Span::styled("cq", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", view.title)),
        ]),
        Line::from(vec![
            Span::styled("Exponential Fit: ", Style::default().fg(Color::Rgb(255, 165, 0))),
            Span::raw(view.formula.clone()),
            Span::styled(format!("   {}", view.details), Style::default().fg(Color::Gray)),
        ]),
    ];

    let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ChartView) {
    let block = Block::default().title("Compression Quotient").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let widget = CompressionChart {
        points: &view.points,
        curve: &view.curve,
        formula: &view.formula,
        x_bounds: view.x_bounds,
        y_bounds: view.y_bounds,
    };
    frame.render_widget(widget, inner);
}

fn draw_footer(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let line = Line::from(vec![
        Span::styled("q / Esc / Enter  close", Style::default().fg(Color::Gray)),
        Span::raw(" | "),
        Span::styled("· observed", Style::default().fg(Color::Rgb(0, 128, 255))),
        Span::raw("  "),
        Span::styled("- - fitted", Style::default().fg(Color::Rgb(255, 165, 0))),
    ]);
    let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpParams, FitQuality};

    fn fit() -> ExpFit {
        ExpFit {
            params: ExpParams { a: -1.19, b: -0.916, c: 1.19 },
            quality: FitQuality { sse: 0.0, rmse: 0.0, n: 3 },
            evaluations: 9,
            iterations: 7,
        }
    }

    #[test]
    fn view_spans_passes_and_pads_quotients() {
        let series = CompressionSeries {
            passes: vec![0, 1, 2],
            deltas: vec![0, -50, -20],
            bytes: vec![100, 80],
            cumulative: vec![0, -50, -70],
            quotients: vec![0.0, 50.0 / 70.0, 1.0],
        };
        let view = ChartView::new(Path::new("code.log"), &series, &fit(), 0.01);

        assert_eq!(view.x_bounds, [0.0, 2.0]);
        assert!(view.y_bounds[0] < 0.0 && view.y_bounds[1] > 1.0);
        assert_eq!(view.points.len(), 3);
        assert_eq!(view.curve.len(), 201);
        assert_eq!(view.formula, "1.19-1.19*exp(-0.92x)");
        assert!(view.details.contains("passes=2"));
    }

    #[test]
    fn dismiss_keys() {
        assert!(is_dismiss_key(KeyCode::Char('q')));
        assert!(is_dismiss_key(KeyCode::Esc));
        assert!(is_dismiss_key(KeyCode::Enter));
        assert!(!is_dismiss_key(KeyCode::Char('x')));
    }
}
