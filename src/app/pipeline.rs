//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> classify -> window + reshape -> summary rows
//!
//! The result is an immutable `DashboardContext` built once at startup. Chart
//! requests are answered from it on demand; the CLI and the TUI then focus on
//! presentation (printing vs widgets).

use crate::chart::style::{NEG_COLOR, POS_COLOR, WHITE, currency_symbol};
use crate::chart::{ChartSpec, area_with_gradient, group_comparison, signed_change_line};
use crate::data::load_dataset;
use crate::domain::{
    CommodityGroup, DashboardConfig, LongSeriesRow, MIN_TABLE_MONTHS, RawSeriesTable, UnitMap,
};
use crate::error::AppError;
use crate::groups::{CommodityGroups, GroupSchema};
use crate::io::{IngestedData, RowError};
use crate::reshape::reshape;
use crate::summary::SummaryTable;

/// Everything the views need, computed once.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub config: DashboardConfig,
    /// Full filtered history (detail and group charts).
    pub history: RawSeriesTable,
    pub units: UnitMap,
    pub groups: CommodityGroups,
    /// Reshaped summary window.
    pub long_rows: Vec<LongSeriesRow>,
    pub summary: SummaryTable,
    pub row_errors: Vec<RowError>,
}

/// Load the configured source and build the context.
pub fn build_context(config: DashboardConfig) -> Result<DashboardContext, AppError> {
    config.validate()?;
    let data = load_dataset(&config)?;
    build_context_from(config, data)
}

/// Build the context from already-ingested data.
pub fn build_context_from(
    config: DashboardConfig,
    data: IngestedData,
) -> Result<DashboardContext, AppError> {
    config.validate()?;

    let schema = match &config.schema_path {
        Some(path) => GroupSchema::from_json_file(path)?,
        None => GroupSchema::builtin(),
    };
    let groups = schema.resolve(&data.table.commodity_names())?;

    let window = data.table.tail(config.table_months);
    if window.len() < MIN_TABLE_MONTHS {
        log::warn!(
            "only {} months of history; year-over-year values will be blank",
            window.len()
        );
    }
    let long_rows = reshape(&window);
    let summary = SummaryTable::new(&long_rows, &data.units)?;

    log::info!(
        "dashboard ready: {} commodities in {} groups, as of {}",
        summary.rows.len(),
        groups.iter().count(),
        summary.as_of.format("%Y-%m")
    );

    Ok(DashboardContext {
        config,
        history: data.table,
        units: data.units,
        groups,
        long_rows,
        summary,
        row_errors: data.row_errors,
    })
}

impl DashboardContext {
    pub fn group_of(&self, commodity: &str) -> Option<CommodityGroup> {
        self.groups.group_of(commodity)
    }

    /// `Historical Data: 01/2010 - 11/2024`
    pub fn history_period(&self) -> String {
        match (self.history.first_date(), self.history.latest_date()) {
            (Some(start), Some(end)) => format!(
                "Historical Data: {} - {}",
                start.format("%m/%Y"),
                end.format("%m/%Y")
            ),
            _ => "Historical Data".to_string(),
        }
    }

    fn tick_suffix(&self, commodity: &str) -> &'static str {
        currency_symbol(self.units.get(commodity))
    }
}

/// The price-history chart and the monthly-change chart for one commodity.
pub fn detail_charts(
    ctx: &DashboardContext,
    commodity: &str,
) -> Result<(ChartSpec, ChartSpec), AppError> {
    let series = ctx
        .history
        .series(commodity)
        .ok_or_else(|| AppError::input(format!("Unknown commodity '{commodity}'.")))?;
    if series.is_empty() {
        return Err(AppError::no_data(format!("No prices recorded for '{commodity}'.")));
    }

    let period = ctx.history_period();
    let symbol = ctx.tick_suffix(commodity);
    let area = area_with_gradient(&series, &format!("Monthly Price of {commodity}"), Some(&period))
        .with_y_tick_suffix(symbol)
        .with_hover_template(&format!("%{{x}}<br>Price = {symbol}%{{y:,.2f}}"))
        .with_backgrounds(WHITE, WHITE);
    let change = signed_change_line(
        &series,
        POS_COLOR,
        NEG_COLOR,
        &format!("Monthly Price Change of {commodity}"),
    )
    .with_backgrounds(WHITE, WHITE);

    log::debug!("built detail charts for {commodity} ({} points)", series.points.len());
    Ok((area, change))
}

/// The comparison chart for `commodity` within `group`.
pub fn group_chart(
    ctx: &DashboardContext,
    group: CommodityGroup,
    commodity: &str,
) -> Result<ChartSpec, AppError> {
    let members = ctx.groups.members(group).ok_or_else(|| {
        AppError::input(format!("Group '{group}' has no commodities in this dataset."))
    })?;
    let mut spec = group_comparison(&ctx.history, members, commodity, group)?;
    // Members of one group may be priced in different currencies (Timber).
    for trace in &mut spec.traces {
        let symbol = ctx.tick_suffix(&trace.name);
        trace.hover_template = Some(format!("%{{y:,.2f}}{symbol} {}<extra></extra>", trace.name));
    }
    Ok(spec.with_y_tick_suffix(ctx.tick_suffix(commodity)).with_backgrounds(WHITE, WHITE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::data::sample::generate_history;
    use crate::domain::DataSource;

    fn ctx() -> DashboardContext {
        let config = DashboardConfig {
            source: DataSource::Demo { seed: 3 },
            ..DashboardConfig::default()
        };
        let data = generate_history(3, &config).unwrap();
        build_context_from(config, data).unwrap()
    }

    #[test]
    fn context_covers_every_commodity() {
        let ctx = ctx();
        assert_eq!(ctx.summary.rows.len(), 67);
        assert_eq!(ctx.long_rows.len(), 67 * 13);
        assert!(ctx.summary.rows.iter().all(|r| r.yoy_change.is_some()));
        assert_eq!(ctx.group_of("Gold"), Some(CommodityGroup::PreciousMetals));
    }

    #[test]
    fn detail_pair_uses_full_history_and_unit_suffix() {
        let ctx = ctx();
        let (area, change) = detail_charts(&ctx, "Plywood").unwrap();
        assert_eq!(area.kind, ChartKind::AreaGradient);
        assert_eq!(change.kind, ChartKind::SignedChange);
        assert_eq!(area.layout.y_axis.tick_suffix.as_deref(), Some("¢"));
        assert_eq!(area.traces[0].x.len(), ctx.history.len());
        assert_eq!(area.layout.paper_background, Some(WHITE));
        let hover = Some("%{x}<br>Price = ¢%{y:,.2f}");
        assert!(area.traces.iter().all(|t| t.hover_template.as_deref() == hover));

        let (gold, _) = detail_charts(&ctx, "Gold").unwrap();
        assert_eq!(gold.layout.y_axis.tick_suffix.as_deref(), Some("$"));
    }

    #[test]
    fn group_chart_highlights_the_selection() {
        let ctx = ctx();
        let spec = group_chart(&ctx, CommodityGroup::Fertilizers, "Urea").unwrap();
        assert_eq!(spec.traces.len(), 4);
        assert_eq!(spec.traces.iter().filter(|t| t.is_visible()).count(), 1);
        assert!(group_chart(&ctx, CommodityGroup::Fertilizers, "Gold").is_err());
    }

    #[test]
    fn group_hovers_use_each_members_currency() {
        let ctx = ctx();
        let spec = group_chart(&ctx, CommodityGroup::Timber, "Plywood").unwrap();
        let hover = |name: &str| spec.trace(name).and_then(|t| t.hover_template.clone()).unwrap();
        assert_eq!(hover("Plywood"), "%{y:,.2f}¢ Plywood<extra></extra>");
        assert_eq!(hover("Logs, Cameroon"), "%{y:,.2f}$ Logs, Cameroon<extra></extra>");
        assert_eq!(spec.layout.y_axis.tick_suffix.as_deref(), Some("¢"));
    }

    #[test]
    fn unknown_commodity_is_an_input_error() {
        let err = detail_charts(&ctx(), "Unobtainium").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn short_window_is_rejected_up_front() {
        let config = DashboardConfig {
            table_months: 6,
            ..DashboardConfig::default()
        };
        let data = generate_history(3, &DashboardConfig::default()).unwrap();
        let err = build_context_from(config, data).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
