//! Plotters-powered displacement/force chart widget for Ratatui.
//!
//! Plotters gives us axis ticks and labels for free; its output is drawn into
//! the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; all series and bounds are computed by the caller.
pub struct CurveChart<'a> {
    /// Normalized curve samples.
    pub curve: &'a [(f64, f64)],
    /// Stiffness line endpoints (empty when there is no slope).
    pub stiffness: &'a [(f64, f64)],
    /// Dash pixels between the current slope points.
    pub custom_dashes: &'a [(f64, f64)],
    /// The two slope points.
    pub slope_points: &'a [(f64, f64)],
    pub yield_point: Option<(f64, f64)>,
    pub peak: Option<(f64, f64)>,
    /// Currently selected point, drawn on top.
    pub active: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for CurveChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out axes in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.3}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let curve_color = WHITE;
            let line_color = RGBColor(0, 255, 255); // cyan
            let slope_color = RGBColor(0, 255, 0); // green
            let dash_color = RGBColor(80, 120, 255); // blue
            let yield_color = RGBColor(255, 0, 255); // magenta
            let peak_color = RGBColor(255, 0, 0); // red
            let active_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(self.curve.iter().map(|&(x, y)| Pixel::new((x, y), curve_color)))?;

            if self.stiffness.len() == 2 {
                chart.draw_series(LineSeries::new(self.stiffness.iter().copied(), &line_color))?;
            }
            chart.draw_series(self.custom_dashes.iter().map(|&(x, y)| Pixel::new((x, y), dash_color)))?;

            // `Circle` radii are mapped incorrectly by the ratatui backend, so
            // markers are single pixels.
            chart.draw_series(self.slope_points.iter().map(|&(x, y)| Pixel::new((x, y), slope_color)))?;
            chart.draw_series(self.yield_point.iter().map(|&(x, y)| Pixel::new((x, y), yield_color)))?;
            chart.draw_series(self.peak.iter().map(|&(x, y)| Pixel::new((x, y), peak_color)))?;
            chart.draw_series(self.active.iter().map(|&(x, y)| Pixel::new((x, y), active_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Padded bounds covering every finite point; `None` if there is nothing to draw.
pub fn chart_bounds<'a>(series: impl IntoIterator<Item = &'a (f64, f64)>) -> Option<([f64; 2], [f64; 2])> {
    let mut xs = [f64::INFINITY, f64::NEG_INFINITY];
    let mut ys = [f64::INFINITY, f64::NEG_INFINITY];
    for &(x, y) in series {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        xs = [xs[0].min(x), xs[1].max(x)];
        ys = [ys[0].min(y), ys[1].max(y)];
    }
    if !xs[0].is_finite() {
        return None;
    }
    Some((pad(xs), pad(ys)))
}

fn pad([lo, hi]: [f64; 2]) -> [f64; 2] {
    let span = hi - lo;
    if span <= 1e-12 {
        return [lo - 1.0, hi + 1.0];
    }
    [lo - 0.05 * span, hi + 0.05 * span]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_and_skip_non_finite() {
        let pts = [(0.0, 0.0), (1.0, 10.0), (f64::NAN, 50.0)];
        let (x, y) = chart_bounds(pts.iter()).unwrap();
        assert!((x[0] + 0.05).abs() < 1e-12 && (x[1] - 1.05).abs() < 1e-12);
        assert!((y[0] + 0.5).abs() < 1e-12 && (y[1] - 10.5).abs() < 1e-12);
        assert!(chart_bounds([].iter()).is_none());
    }

    #[test]
    fn degenerate_span_widens() {
        let pts = [(2.0, 3.0)];
        let (x, y) = chart_bounds(pts.iter()).unwrap();
        assert_eq!(x, [1.0, 3.0]);
        assert_eq!(y, [2.0, 4.0]);
    }
}
