//! Filled price-history chart with a trend annotation.

use crate::chart::spec::{
    Annotation, ChartKind, ChartSpec, ColorStop, Fill, Gradient, LineStyle, MarkerStyle, Margin,
    Orientation, Shape, Title, Trace,
};
use crate::chart::style::{
    AREA_LINE_COLOR, AREA_SCALE, BLACK, GREEN, GREY, RED, TickFormat, fmt_ratio_pct,
};
use crate::domain::PriceSeries;

pub const AREA_TRACE: &str = "price";
pub const EXTREMES_TRACE: &str = "extremes";

/// Relative change from the first to the last point.
///
/// `None` for fewer than two points or a zero starting value.
pub fn trend_ratio(series: &PriceSeries) -> Option<f64> {
    let (_, first) = series.first()?;
    let (_, last) = series.last()?;
    if series.points.len() < 2 || first == 0.0 {
        return None;
    }
    Some((last - first) / first)
}

/// Build the area chart with a vertical gradient fill.
///
/// Max and min are marked with dotted vertical guides; a dotted horizontal line
/// at the first value carries the trend annotation (green when the price is
/// flat or up, red when down).
pub fn area_with_gradient(series: &PriceSeries, title: &str, subtitle: Option<&str>) -> ChartSpec {
    let mut spec = ChartSpec::new(ChartKind::AreaGradient);

    let gradient = Gradient {
        orientation: Orientation::Vertical,
        stops: AREA_SCALE
            .iter()
            .map(|&(position, color)| ColorStop { position, color })
            .collect(),
    };
    spec.traces.push(
        Trace::lines(
            AREA_TRACE,
            series.dates(),
            series.values(),
            LineStyle::solid(AREA_LINE_COLOR, 1.0),
        )
            .with_fill(Fill {
                color: None,
                gradient: Some(gradient),
            })
            .with_hover("%{x}<br>Price = $%{y:,.2f}"),
    );

    let extremes = series.max_point().zip(series.min_point());
    if let Some(((x_max, y_max), (x_min, y_min))) = extremes {
        spec.shapes.push(Shape::VSegment {
            x: x_max,
            y0: 0.0,
            y1: y_max,
            line: LineStyle::dotted(GREEN, 0.5),
        });
        spec.shapes.push(Shape::VSegment {
            x: x_min,
            y0: 0.0,
            y1: y_min,
            line: LineStyle::dotted(RED, 0.5),
        });
        spec.traces.push(
            Trace::markers(
                EXTREMES_TRACE,
                vec![x_max, x_min],
                vec![y_max, y_min],
                MarkerStyle {
                    colors: vec![GREEN, RED],
                    size: 5.0,
                },
            )
            .with_hover("%{x}<br>Price = $%{y:,.2f}"),
        );
        spec.layout.y_axis.tick_format = Some(if y_max < 10.0 {
            TickFormat::OneDecimal
        } else {
            TickFormat::Integer
        });
    }

    if let Some((start, first)) = series.first() {
        spec.shapes.push(Shape::HLine {
            y: first,
            line: LineStyle::dotted(BLACK, 0.5),
        });

        let years = series
            .last()
            .map(|(end, _)| ((end - start).num_days() as f64 / 365.25).round() as i64)
            .unwrap_or(0)
            .max(1);
        let ratio = trend_ratio(series);
        let (value_text, color) = match ratio {
            Some(r) if r < 0.0 => (fmt_ratio_pct(r), RED),
            Some(r) => (fmt_ratio_pct(r), GREEN),
            None => ("n/a".to_string(), GREY),
        };
        spec.annotations.push(Annotation {
            y: first,
            label: format!("{years}-years trend"),
            value_text,
            value: ratio,
            color,
        });

        if let Some((end, _)) = series.last() {
            spec.layout.x_axis.range = Some([start, end]);
        }
    }

    spec.layout.title = Some(Title {
        text: title.to_string(),
        subtitle: subtitle.map(str::to_string),
        font_size: 20,
    });
    spec.layout.show_legend = false;
    spec.layout.height = Some(400);
    spec.layout.y_axis.tick_suffix = Some("$".to_string());
    spec.layout.margin = Margin { l: 50, r: 70, t: 70, b: 20 };

    log::debug!("built area chart for {}", series.commodity);
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};

    fn rising(n: u32, from: f64, to: f64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = (0..n)
            .map(|i| (start + Months::new(i), from + (to - from) * i as f64 / (n as f64 - 1.0)))
            .collect();
        PriceSeries::new("Gold", points)
    }

    #[test]
    fn trend_annotation_reports_doubling_in_green() {
        let spec = area_with_gradient(&rising(24, 100.0, 200.0), "Monthly Price of Gold", None);
        let note = &spec.annotations[0];
        assert_eq!(note.value, Some(1.0));
        assert_eq!(note.value_text, "+100.0%");
        assert_eq!(note.color, GREEN);
        assert_eq!(note.y, 100.0);
    }

    #[test]
    fn falling_trend_is_red() {
        let spec = area_with_gradient(&rising(12, 50.0, 25.0), "t", None);
        assert_eq!(spec.annotations[0].color, RED);
        assert_eq!(spec.annotations[0].value_text, "-50.0%");
    }

    #[test]
    fn guides_mark_extremes() {
        let spec = area_with_gradient(&rising(5, 1.0, 5.0), "t", Some("sub"));
        let markers = spec.trace(EXTREMES_TRACE).unwrap();
        assert_eq!(markers.y, vec![5.0, 1.0]);
        assert!(matches!(spec.shapes[0], Shape::VSegment { y1, .. } if y1 == 5.0));
        assert!(matches!(spec.shapes[1], Shape::VSegment { y1, .. } if y1 == 1.0));
    }

    #[test]
    fn tick_format_follows_magnitude() {
        let small = area_with_gradient(&rising(3, 1.0, 9.5), "t", None);
        assert_eq!(small.layout.y_axis.tick_format, Some(TickFormat::OneDecimal));
        let large = area_with_gradient(&rising(3, 1.0, 10.0), "t", None);
        assert_eq!(large.layout.y_axis.tick_format, Some(TickFormat::Integer));
    }

    #[test]
    fn zero_start_has_no_trend() {
        let s = PriceSeries::new(
            "X",
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0.0),
                (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 3.0),
            ],
        );
        assert_eq!(trend_ratio(&s), None);
        let spec = area_with_gradient(&s, "t", None);
        assert_eq!(spec.annotations[0].value_text, "n/a");
    }
}
