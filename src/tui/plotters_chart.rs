//! Compression curve chart drawn with Plotters into a Ratatui buffer
//! (via `plotters-ratatui-backend`).

use std::ops::Range;

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TermColor, Style},
    widgets::Widget,
};

/// Minimum inner size Plotters needs to lay out labels and the legend.
const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 10;

/// Render-only chart; series and bounds come precomputed from `ChartView`.
pub struct CompressionChart<'a> {
    /// Observed `(pass, quotient)` points.
    pub points: &'a [(f64, f64)],
    /// Fitted curve sampled on the fine pass axis.
    pub curve: &'a [(f64, f64)],
    pub formula: &'a str,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl CompressionChart<'_> {
    fn ranges(&self) -> Option<(Range<f64>, Range<f64>)> {
        let [x_lo, x_hi] = self.x_bounds;
        let [y_lo, y_hi] = self.y_bounds;
        let valid = [x_lo, x_hi, y_lo, y_hi].iter().all(|v| v.is_finite()) && x_hi > x_lo && y_hi > y_lo;
        valid.then_some((x_lo..x_hi, y_lo..y_hi))
    }
}

impl Widget for CompressionChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Style::default().fg(TermColor::Yellow);
            buf.set_string(area.x, area.y, "Terminal too small for the chart.", warning);
            return;
        }
        let Some((x_range, y_range)) = self.ranges() else {
            return;
        };

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x_range.clone(), y_range.clone())?;

            chart
                .configure_mesh()
                .x_desc("Pass")
                .y_desc("Compression Quotient")
                .x_labels(6)
                .y_labels(6)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_desc_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&RGBColor(90, 90, 90))
                .light_line_style(&RGBColor(40, 40, 40))
                .draw()?;

            let points_color = RGBColor(0, 128, 255); // blue
            let curve_color = RGBColor(255, 165, 0); // orange

            chart
                .draw_series(DashedLineSeries::new(
                    self.curve.iter().copied(),
                    4,
                    3,
                    ShapeStyle::from(&curve_color),
                ))?
                .label(format!("Exponential Fit: {}", self.formula))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], curve_color));

            // `Pixel` rather than `Circle`: the ratatui backend maps circle radii
            // into canvas units, which blows markers up to huge sizes.
            chart
                .draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), points_color)))?
                .label("Compression Quotients")
                .legend(move |(x, y)| Pixel::new((x + 6, y), points_color));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .label_font(("sans-serif", 10).into_font().color(&WHITE))
                .border_style(&WHITE)
                .draw()?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
