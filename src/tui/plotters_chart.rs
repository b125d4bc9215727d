//! Plotters-powered chart widget for Ratatui.
//!
//! Draws any `ChartSpec` (area, change, group comparison) into the terminal
//! buffer through `plotters-ratatui-backend`. Fills and gradients have no
//! terminal equivalent, so only lines, point markers and guide shapes are
//! drawn; tick labels are placed by the caller.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{ChartSpec, Rgba, Shape, TraceMode};
use crate::plot::day_number;

/// Render-only view of a chart spec.
///
/// Bounds are computed outside the render call (see `plot::chart_bounds`) so
/// the tick labels drawn around the widget agree with the plotted area.
pub struct SpecChart<'a> {
    pub spec: &'a ChartSpec,
    /// X bounds (days since CE).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for SpecChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
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
        let finite = x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite();
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).margin(1).build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            for shape in &self.spec.shapes {
                match shape {
                    Shape::HLine { y, line } => {
                        let color = terminal_color(line.color);
                        chart.draw_series(LineSeries::new([(x0, *y), (x1, *y)], &color))?;
                    }
                    Shape::VSegment { x, y0, y1, line } => {
                        let color = terminal_color(line.color);
                        let x = day_number(*x);
                        chart.draw_series(LineSeries::new([(x, *y0), (x, *y1)], &color))?;
                    }
                }
            }

            let mut traces: Vec<_> = self.spec.traces.iter().filter(|t| t.is_visible()).collect();
            // Raised traces last so they end up on top.
            traces.sort_by_key(|t| t.z_order);

            for trace in traces {
                match trace.mode {
                    TraceMode::Lines => {
                        let color = trace
                            .line
                            .map(|l| terminal_color(l.color))
                            .unwrap_or(RGBColor(0, 255, 255));
                        chart.draw_series(LineSeries::new(
                            trace.points().map(|(d, y)| (day_number(d), y)),
                            &color,
                        ))?;
                    }
                    TraceMode::Markers => {
                        // `Circle` radii are mis-scaled by the backend; a colored
                        // pixel reads as a clean dot.
                        chart.draw_series(trace.points().enumerate().map(|(i, (d, y))| {
                            let color = trace
                                .marker
                                .as_ref()
                                .and_then(|m| m.color_for(i))
                                .map(terminal_color)
                                .unwrap_or(WHITE);
                            Pixel::new((day_number(d), y), color)
                        }))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Chart colors target a white page; near-black guides would vanish on a dark
/// terminal, so they are lifted to light grey.
pub fn terminal_color(c: Rgba) -> RGBColor {
    if c.r.max(c.g).max(c.b) < 80 {
        RGBColor(200, 200, 200)
    } else {
        RGBColor(c.r, c.g, c.b)
    }
}

/// `terminal_color` for ratatui widgets.
pub fn ratatui_color(c: Rgba) -> Color {
    let RGBColor(r, g, b) = terminal_color(c);
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::style::{BLACK, CRIMSON};

    #[test]
    fn dark_colors_are_lifted() {
        assert_eq!(terminal_color(BLACK), RGBColor(200, 200, 200));
        assert_eq!(terminal_color(CRIMSON), RGBColor(220, 20, 60));
        assert_eq!(ratatui_color(BLACK), Color::Rgb(200, 200, 200));
    }
}
