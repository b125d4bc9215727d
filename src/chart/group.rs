//! Multi-line comparison of one commodity against the rest of its group.

use crate::chart::spec::{
    ChartKind, ChartSpec, Fill, HoverMode, LineStyle, Margin, RangeButton, RangeSelector,
    RangeSlider, RangeStep, Title, Trace, Visibility,
};
use crate::chart::style::{
    HIGHLIGHT_FILL, HIGHLIGHT_LINE, LIGHTGREY, RANGE_SELECTOR_BG, TickFormat,
};
use crate::domain::{CommodityGroup, RawSeriesTable};
use crate::error::AppError;

/// Build the group chart: every member of the group is a line hidden behind the
/// legend, except `highlighted`, which is drawn on top with a fill to zero.
///
/// Fails if `highlighted` is not one of `group_columns` or a column is missing
/// from `table`.
pub fn group_comparison(
    table: &RawSeriesTable,
    group_columns: &[String],
    highlighted: &str,
    group: CommodityGroup,
) -> Result<ChartSpec, AppError> {
    if !group_columns.iter().any(|c| c == highlighted) {
        return Err(AppError::input(format!("'{highlighted}' is not a member of group '{group}'.")));
    }

    let mut spec = ChartSpec::new(ChartKind::GroupComparison);
    let mut highlighted_max = None;

    for name in group_columns {
        let series = table
            .series(name)
            .ok_or_else(|| AppError::input(format!("Unknown commodity '{name}'.")))?;
        let hover = format!("%{{y:,.2f}}$ {name}<extra></extra>");
        let mut trace = Trace::lines(
            name.clone(),
            series.dates(),
            series.values(),
            LineStyle::solid(LIGHTGREY, 1.5),
        )
        .with_hover(&hover);

        if name == highlighted {
            trace.line = Some(LineStyle::solid(HIGHLIGHT_LINE, 2.0));
            trace.z_order = 1;
            trace.fill = Some(Fill {
                color: Some(HIGHLIGHT_FILL),
                gradient: None,
            });
            highlighted_max = series.max_point().map(|(_, v)| v);
        } else {
            trace.visibility = Visibility::LegendOnly;
        }
        spec.traces.push(trace);
    }

    spec.layout.x_axis.range_selector = Some(RangeSelector {
        buttons: vec![
            RangeButton::backward("6M", 6, RangeStep::Month),
            RangeButton::backward("1Y", 1, RangeStep::Year),
            RangeButton::backward("5Y", 5, RangeStep::Year),
            RangeButton::all(),
        ],
        background: RANGE_SELECTOR_BG,
    });
    spec.layout.x_axis.range_slider = Some(RangeSlider { thickness: 0.1 });

    spec.layout.y_axis.tick_format = Some(match highlighted_max {
        Some(max) if max <= 10.0 => TickFormat::OneDecimal,
        _ => TickFormat::Integer,
    });
    spec.layout.y_axis.tick_suffix = Some("$".to_string());

    let period = match (table.first_date(), table.latest_date()) {
        (Some(start), Some(end)) => format!(
            "Historical Data: {} - {}",
            start.format("%m/%Y"),
            end.format("%m/%Y")
        ),
        _ => "Historical Data".to_string(),
    };
    spec.layout.title = Some(Title {
        text: format!("Monthly Price of {highlighted}"),
        subtitle: Some(period),
        font_size: 20,
    });
    spec.layout.show_legend = true;
    spec.layout.legend_title = Some(group.label().to_string());
    spec.layout.height = Some(450);
    spec.layout.margin = Margin { l: 50, r: 0, t: 70, b: 0 };
    spec.layout.hover_mode = HoverMode::X;

    log::debug!("built group chart for {highlighted} in {group} ({} lines)", group_columns.len());
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesColumn;
    use chrono::NaiveDate;

    fn table() -> RawSeriesTable {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ];
        RawSeriesTable::new(
            dates,
            vec![
                SeriesColumn {
                    name: "Gold".to_string(),
                    values: vec![Some(2000.0), Some(2050.0)],
                },
                SeriesColumn {
                    name: "Silver".to_string(),
                    values: vec![Some(9.0), Some(9.5)],
                },
                SeriesColumn {
                    name: "Platinum".to_string(),
                    values: vec![Some(900.0), Some(950.0)],
                },
            ],
        )
        .unwrap()
    }

    fn members() -> Vec<String> {
        vec!["Gold".to_string(), "Platinum".to_string(), "Silver".to_string()]
    }

    #[test]
    fn only_the_highlighted_line_is_visible() {
        let group = CommodityGroup::PreciousMetals;
        let spec = group_comparison(&table(), &members(), "Silver", group).unwrap();
        assert_eq!(spec.traces.len(), 3);

        let silver = spec.trace("Silver").unwrap();
        assert!(silver.is_visible());
        assert_eq!(silver.z_order, 1);
        assert_eq!(silver.fill.as_ref().unwrap().color, Some(HIGHLIGHT_FILL));

        let gold = spec.trace("Gold").unwrap();
        assert_eq!(gold.visibility, Visibility::LegendOnly);
        assert!(gold.fill.is_none());

        assert_eq!(spec.layout.legend_title.as_deref(), Some("Precious Metals"));
        assert_eq!(spec.layout.y_axis.tick_format, Some(TickFormat::OneDecimal));
    }

    #[test]
    fn range_controls_cover_standard_windows() {
        let group = CommodityGroup::PreciousMetals;
        let spec = group_comparison(&table(), &members(), "Gold", group).unwrap();
        let labels: Vec<_> = spec
            .layout
            .x_axis
            .range_selector
            .as_ref()
            .unwrap()
            .buttons
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, ["6M", "1Y", "5Y", "ALL"]);
        assert!(spec.layout.x_axis.range_slider.is_some());
        assert_eq!(spec.layout.y_axis.tick_format, Some(TickFormat::Integer));
        assert_eq!(
            spec.layout.title.as_ref().unwrap().subtitle.as_deref(),
            Some("Historical Data: 01/2024 - 02/2024")
        );
    }

    #[test]
    fn highlighted_outside_group_is_rejected() {
        let group = CommodityGroup::PreciousMetals;
        let err = group_comparison(&table(), &members(), "Copper", group).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
