//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line traces: `-` (`*` for a raised trace such as the highlighted group member)
//! - marker traces: `^` for green-ish, `v` for red-ish, `o` otherwise
//! - horizontal guides: `.`; vertical guides: `:`

use chrono::{Datelike, NaiveDate};

use crate::chart::sparkline::SPARK_LINE;
use crate::chart::{ChartSpec, Rgba, Shape, TraceMode};

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the visible traces, guides, and annotations of a chart.
pub fn render_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    if let Some(title) = &spec.layout.title {
        out.push_str(&title.text);
        out.push('\n');
        if let Some(sub) = &title.subtitle {
            out.push_str(sub);
            out.push('\n');
        }
    }

    let Some(([x_min, x_max], [y_min, y_max])) = chart_bounds(spec) else {
        out.push_str("(no data)\n");
        return out;
    };

    let mut grid = vec![vec![' '; width]; height];

    let mut traces: Vec<_> = spec.traces.iter().filter(|t| t.is_visible()).collect();
    // Raised traces first so they win the blank cells.
    traces.sort_by_key(|t| std::cmp::Reverse(t.z_order));

    for trace in &traces {
        let cells: Vec<(usize, usize)> = trace
            .points()
            .map(|(d, y)| {
                (
                    map_x(day_number(d), x_min, x_max, width),
                    map_y(y, y_min, y_max, height),
                )
            })
            .collect();

        match trace.mode {
            TraceMode::Lines => {
                let ch = if trace.z_order > 0 { '*' } else { '-' };
                draw_polyline(&mut grid, &cells, ch);
            }
            TraceMode::Markers => {
                for (i, &(x, y)) in cells.iter().enumerate() {
                    let color = trace.marker.as_ref().and_then(|m| m.color_for(i));
                    grid[y][x] = marker_glyph(color);
                }
            }
        }
    }

    for shape in &spec.shapes {
        match shape {
            Shape::HLine { y, .. } => {
                let row = map_y(*y, y_min, y_max, height);
                for cell in grid[row].iter_mut().filter(|c| **c == ' ') {
                    *cell = '.';
                }
            }
            Shape::VSegment { x, y0, y1, .. } => {
                let col = map_x(day_number(*x), x_min, x_max, width);
                let top = map_y(*y1, y_min, y_max, height);
                let bottom = map_y(*y0, y_min, y_max, height);
                draw_line(&mut grid, col, top.min(bottom), col, top.max(bottom), ':');
            }
        }
    }

    let suffix = spec.layout.y_axis.tick_suffix.as_deref().unwrap_or("");
    out.push_str(&format!(
        "Plot: {} .. {} | y=[{y_min:.2}, {y_max:.2}]{suffix}\n",
        from_day_number(x_min),
        from_day_number(x_max)
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    for a in &spec.annotations {
        out.push_str(&format!("{}: {}\n", a.label, a.value_text));
    }

    out
}

/// Unicode block sparkline of a chart's main line trace, resampled to `width`.
pub fn sparkline_glyphs(spec: &ChartSpec, width: usize) -> String {
    let trace = spec
        .trace(SPARK_LINE)
        .or_else(|| spec.traces.iter().find(|t| t.mode == TraceMode::Lines));
    let Some(trace) = trace else {
        return String::new();
    };
    glyphs(&resample(&trace.y, width))
}

fn glyphs(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) {
        return String::new();
    }
    let top = SPARK_GLYPHS.len() - 1;
    values
        .iter()
        .map(|v| {
            if max > min {
                let u = (v - min) / (max - min);
                SPARK_GLYPHS[(u * top as f64).round() as usize]
            } else {
                SPARK_GLYPHS[top / 2]
            }
        })
        .collect()
}

/// Bucket means so at most `width` values remain.
fn resample(values: &[f64], width: usize) -> Vec<f64> {
    let width = width.max(1);
    if values.len() <= width {
        return values.to_vec();
    }
    (0..width)
        .map(|i| {
            let start = i * values.len() / width;
            let end = ((i + 1) * values.len() / width).max(start + 1);
            let bucket = &values[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

/// Plot bounds of a chart: x in days since CE, y padded by 5%.
pub fn chart_bounds(spec: &ChartSpec) -> Option<([f64; 2], [f64; 2])> {
    let (x_min, x_max) = x_range(spec)?;
    let (y_min, y_max) = y_range(spec).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    Some(([x_min, x_max], [y_min, y_max]))
}

fn marker_glyph(color: Option<Rgba>) -> char {
    match color {
        Some(c) if c.g > c.r && c.g > c.b => '^',
        Some(c) if c.r > c.g && c.r > c.b => 'v',
        _ => 'o',
    }
}

pub fn day_number(d: NaiveDate) -> f64 {
    f64::from(d.num_days_from_ce())
}

/// `%Y-%m` label for a day number produced by `day_number`.
pub fn from_day_number(days: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn x_range(spec: &ChartSpec) -> Option<(f64, f64)> {
    if let Some([start, end]) = spec.layout.x_axis.range {
        if end > start {
            return Some((day_number(start), day_number(end)));
        }
    }
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for t in spec.traces.iter().filter(|t| t.is_visible()) {
        for d in &t.x {
            min_x = min_x.min(day_number(*d));
            max_x = max_x.max(day_number(*d));
        }
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x { Some((min_x, max_x)) } else { Some((min_x - 1.0, max_x + 1.0)) }
}

fn y_range(spec: &ChartSpec) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for t in spec.traces.iter().filter(|t| t.is_visible()) {
        for &y in &t.y {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    for shape in &spec.shapes {
        if let Shape::HLine { y, .. } = shape {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 1.0, max_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], cells: &[(usize, usize)], ch: char) {
    let mut prev = None;
    for &(x, y) in cells {
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else if grid[y][x] == ' ' {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::sparkline;
    use crate::chart::style::{GREEN, LIGHTGREY};
    use crate::chart::{ChartKind, LineStyle, MarkerStyle, Trace};
    use crate::domain::PriceSeries;
    use chrono::Months;

    fn months(n: u32) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + Months::new(i)).collect()
    }

    #[test]
    fn flat_line_fills_one_row() {
        let mut spec = ChartSpec::new(ChartKind::AreaGradient);
        let line = LineStyle::solid(LIGHTGREY, 1.0);
        spec.traces.push(Trace::lines("p", months(3), vec![5.0, 5.0, 5.0], line));
        let txt = render_chart(&spec, 10, 5);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2], "----------");
        assert!(rows.iter().enumerate().all(|(i, r)| i == 2 || r.is_empty()));
    }

    #[test]
    fn markers_use_color_glyphs_and_override_lines() {
        let mut spec = ChartSpec::new(ChartKind::AreaGradient);
        let line = LineStyle::solid(LIGHTGREY, 1.0);
        spec.traces.push(Trace::lines("p", months(2), vec![1.0, 2.0], line));
        spec.traces.push(Trace::markers(
            "m",
            months(1),
            vec![1.0],
            MarkerStyle { colors: vec![GREEN], size: 5.0 },
        ));
        let txt = render_chart(&spec, 10, 5);
        let last = txt.lines().last().unwrap();
        assert!(last.starts_with('^'));
    }

    #[test]
    fn hidden_traces_are_not_drawn() {
        let mut spec = ChartSpec::new(ChartKind::GroupComparison);
        let line = LineStyle::solid(LIGHTGREY, 1.0);
        let mut hidden = Trace::lines("h", months(2), vec![1.0, 1.0], line);
        hidden.visibility = crate::chart::Visibility::LegendOnly;
        spec.traces.push(hidden);
        assert!(render_chart(&spec, 10, 5).contains("(no data)"));
    }

    #[test]
    fn sparkline_glyphs_span_the_block_range() {
        let points = months(8).into_iter().zip((1..=8).map(f64::from)).collect();
        let spec = sparkline(&PriceSeries::new("Tin", points));
        assert_eq!(sparkline_glyphs(&spec, 13), "▁▂▃▄▅▆▇█");
        assert_eq!(sparkline_glyphs(&spec, 4).chars().count(), 4);
    }

    #[test]
    fn sparkline_of_constant_series_is_level() {
        let points = months(3).into_iter().map(|d| (d, 2.0)).collect();
        let spec = sparkline(&PriceSeries::new("Tin", points));
        assert_eq!(sparkline_glyphs(&spec, 13), "▄▄▄");
    }
}
