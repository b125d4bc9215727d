//! Inline trend chart for a table cell.

use chrono::Duration;

use crate::chart::spec::{ChartKind, ChartSpec, LineStyle, MarkerStyle, Shape, Trace};
use crate::chart::style::{GREEN, GREY, LIGHTGREY, RED};
use crate::domain::PriceSeries;

/// Padding added on both sides of the x-range so edge markers are not clipped.
const X_PAD_DAYS: i64 = 7;

pub const SPARK_LINE: &str = "trend";
pub const SPARK_MAX: &str = "max";
pub const SPARK_MIN: &str = "min";

/// Build an axis-free sparkline.
///
/// The line is light grey, the first maximum and first minimum are marked
/// green and red, and a dotted baseline sits at the series' first value.
pub fn sparkline(series: &PriceSeries) -> ChartSpec {
    let mut spec = ChartSpec::new(ChartKind::Sparkline);
    let hover = "%{x}<br>Price: $%{y:,.2f}";

    spec.traces.push(
        Trace::lines(
            SPARK_LINE,
            series.dates(),
            series.values(),
            LineStyle::solid(LIGHTGREY, 1.5),
        )
        .with_hover(hover),
    );

    if let Some((x, y)) = series.max_point() {
        spec.traces.push(
            Trace::markers(
                SPARK_MAX,
                vec![x],
                vec![y],
                MarkerStyle { colors: vec![GREEN], size: 5.0 },
            )
            .with_hover(hover),
        );
    }
    if let Some((x, y)) = series.min_point() {
        spec.traces.push(
            Trace::markers(
                SPARK_MIN,
                vec![x],
                vec![y],
                MarkerStyle { colors: vec![RED], size: 5.0 },
            )
            .with_hover(hover),
        );
    }

    if let Some((_, first)) = series.first() {
        spec.shapes.push(Shape::HLine {
            y: first,
            line: LineStyle::dotted(GREY, 0.5),
        });
    }

    spec.layout.show_legend = false;
    spec.layout.x_axis.visible = false;
    spec.layout.y_axis.visible = false;
    if let (Some((start, _)), Some((end, _))) = (series.first(), series.last()) {
        let pad = Duration::days(X_PAD_DAYS);
        spec.layout.x_axis.range = Some([start - pad, end + pad]);
    }

    log::debug!("built sparkline for {} ({} points)", series.commodity, series.points.len());
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn series(values: &[f64]) -> PriceSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| (month(2023 + (i as i32) / 12, (i as u32) % 12 + 1), *v))
            .collect();
        PriceSeries::new("Copper", points)
    }

    #[test]
    fn markers_bound_every_point() {
        let s = series(&[8.0, 9.5, 7.25, 12.0, 10.0, 7.25, 11.0]);
        let spec = sparkline(&s);

        let max_y = spec.trace(SPARK_MAX).unwrap().y[0];
        let min_y = spec.trace(SPARK_MIN).unwrap().y[0];
        for v in s.values() {
            assert!(max_y >= v);
            assert!(min_y <= v);
        }
        // First occurrence of the duplicated minimum.
        assert_eq!(spec.trace(SPARK_MIN).unwrap().x[0], month(2023, 3));
    }

    #[test]
    fn baseline_and_padded_range() {
        let s = series(&[3.0, 4.0, 5.0]);
        let spec = sparkline(&s);

        assert_eq!(
            spec.shapes[0],
            Shape::HLine {
                y: 3.0,
                line: LineStyle::dotted(GREY, 0.5)
            }
        );
        let [lo, hi] = spec.layout.x_axis.range.unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2022, 12, 25).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2023, 3, 8).unwrap());
        assert!(!spec.layout.x_axis.visible);
        assert!(!spec.layout.y_axis.visible);
    }

    #[test]
    fn empty_series_yields_bare_line() {
        let spec = sparkline(&PriceSeries::new("Lead", Vec::new()));
        assert_eq!(spec.traces.len(), 1);
        assert!(spec.shapes.is_empty());
        assert!(spec.layout.x_axis.range.is_none());
    }
}
