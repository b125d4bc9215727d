//! Month-over-month change chart colored by sign.
//!
//! The fill gradient switches from the negative to the positive color exactly
//! at `y = 0`, so the color boundary has to be placed at zero's fractional
//! position inside `[min, max]` of the change series rather than at the
//! middle of the chart.

use crate::chart::spec::{
    Annotation, ChartKind, ChartSpec, ColorStop, Fill, Gradient, LineStyle, MarkerStyle, Margin,
    Orientation, Shape, Title, Trace,
};
use crate::chart::style::{GREEN, LIGHTGREY, RED, Rgba};
use crate::domain::PriceSeries;

pub const CHANGE_TRACE: &str = "change";

/// Period-over-period change in percent.
///
/// The first point has no predecessor and is reported as `0`, as is any
/// change from a zero price.
pub fn pct_changes(series: &PriceSeries) -> Vec<f64> {
    let values = series.values();
    let mut out = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            100.0 * (v / values[i - 1] - 1.0)
        };
        out.push(if change.is_finite() { change } else { 0.0 });
    }
    out
}

/// Fractional position of `0` within `[min, max]` of `values`, clamped to `[0, 1]`.
///
/// `None` when the series is empty or constant (`min == max`), where the
/// position is undefined.
pub fn zero_position(values: &[f64]) -> Option<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) || max == min {
        return None;
    }
    Some(((0.0 - min) / (max - min)).clamp(0.0, 1.0))
}

/// Two-color vertical scale with a hard step at zero.
///
/// A constant series gets a single uniform color chosen by the sign of its
/// value (neutral grey when it is exactly zero).
pub fn diverging_scale(values: &[f64], neg: Rgba, pos: Rgba) -> Gradient {
    let stops = match zero_position(values) {
        Some(zp) => vec![
            ColorStop { position: 0.0, color: neg },
            ColorStop { position: zp, color: neg },
            ColorStop { position: zp, color: pos },
            ColorStop { position: 1.0, color: pos },
        ],
        None => {
            let color = match values.first() {
                Some(v) if *v > 0.0 => pos,
                Some(v) if *v < 0.0 => neg,
                _ => LIGHTGREY,
            };
            vec![
                ColorStop { position: 0.0, color },
                ColorStop { position: 1.0, color },
            ]
        }
    };
    Gradient {
        orientation: Orientation::Vertical,
        stops,
    }
}

/// Build the signed change chart for a raw price series.
pub fn signed_change_line(
    series: &PriceSeries,
    pos_color: Rgba,
    neg_color: Rgba,
    title: &str,
) -> ChartSpec {
    let mut spec = ChartSpec::new(ChartKind::SignedChange);
    let y = pct_changes(series);

    let marker_colors = y
        .iter()
        .map(|v| {
            if *v > 0.0 {
                pos_color
            } else if *v < 0.0 {
                neg_color
            } else {
                LIGHTGREY
            }
        })
        .collect();
    let gradient = diverging_scale(&y, neg_color, pos_color);

    spec.traces.push(
        Trace::markers(
            CHANGE_TRACE,
            series.dates(),
            y.clone(),
            MarkerStyle {
                colors: marker_colors,
                size: 0.1,
            },
        )
        .with_fill(Fill {
            color: None,
            gradient: Some(gradient),
        })
        .with_hover("%{x}<br>MoM growth = %{y:.2f}%"),
    );

    let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = y.iter().copied().fold(f64::INFINITY, f64::min);
    if max.is_finite() && min.is_finite() {
        spec.shapes.push(Shape::HLine {
            y: max,
            line: LineStyle::dotted(GREEN, 0.5),
        });
        spec.annotations.push(Annotation {
            y: max,
            label: "Max".to_string(),
            value_text: format!("{max:.1}%"),
            value: Some(max),
            color: GREEN,
        });
        spec.shapes.push(Shape::HLine {
            y: min,
            line: LineStyle::dotted(RED, 0.5),
        });
        spec.annotations.push(Annotation {
            y: min,
            label: "Min".to_string(),
            value_text: format!("{min:.1}%"),
            value: Some(min),
            color: RED,
        });
    }

    spec.layout.title = Some(Title {
        text: title.to_string(),
        subtitle: None,
        font_size: 20,
    });
    spec.layout.height = Some(250);
    spec.layout.y_axis.tick_suffix = Some("%".to_string());
    spec.layout.margin = Margin { l: 30, r: 70, t: 50, b: 20 };

    log::debug!("built change chart for {} ({} points)", series.commodity, y.len());
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::style::{NEG_COLOR, POS_COLOR};
    use chrono::{Months, NaiveDate};

    fn series(values: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        PriceSeries::new(
            "Urea",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Months::new(i as u32), *v))
                .collect(),
        )
    }

    #[test]
    fn zero_position_is_fraction_of_range() {
        assert_eq!(zero_position(&[-10.0, 5.0, 30.0]), Some(0.25));
        assert_eq!(zero_position(&[5.0, 5.0]), None);
        assert_eq!(zero_position(&[]), None);
        assert_eq!(zero_position(&[2.0, 4.0]), Some(0.0));
    }

    #[test]
    fn constant_series_gets_uniform_color() {
        let g = diverging_scale(&[5.0, 5.0, 5.0], NEG_COLOR, POS_COLOR);
        assert!(g.stops.iter().all(|s| s.color == POS_COLOR));

        let flat = signed_change_line(&series(&[7.0, 7.0, 7.0]), POS_COLOR, NEG_COLOR, "t");
        let fill = flat.traces[0].fill.as_ref().unwrap().gradient.as_ref().unwrap();
        assert!(fill.stops.iter().all(|s| s.color == LIGHTGREY));
    }

    #[test]
    fn scale_steps_at_zero() {
        let g = diverging_scale(&[-10.0, 30.0], NEG_COLOR, POS_COLOR);
        assert_eq!(g.stops.len(), 4);
        assert_eq!(g.stops[1], ColorStop { position: 0.25, color: NEG_COLOR });
        assert_eq!(g.stops[2], ColorStop { position: 0.25, color: POS_COLOR });
    }

    #[test]
    fn changes_and_marker_colors_follow_sign() {
        let prices = series(&[100.0, 110.0, 99.0, 99.0]);
        let spec = signed_change_line(&prices, POS_COLOR, NEG_COLOR, "MoM");
        let trace = spec.trace(CHANGE_TRACE).unwrap();
        assert_eq!(trace.y[0], 0.0);
        assert!((trace.y[1] - 10.0).abs() < 1e-9);
        assert!((trace.y[2] + 10.0).abs() < 1e-9);

        let marker = trace.marker.as_ref().unwrap();
        assert_eq!(marker.colors, vec![LIGHTGREY, POS_COLOR, NEG_COLOR, LIGHTGREY]);

        assert_eq!(spec.annotations[0].label, "Max");
        assert_eq!(spec.annotations[0].value_text, "10.0%");
        assert_eq!(spec.annotations[1].value_text, "-10.0%");
    }

    #[test]
    fn zero_price_does_not_poison_changes() {
        assert_eq!(pct_changes(&series(&[0.0, 1.0])), vec![0.0, 0.0]);
    }
}
