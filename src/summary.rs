//! Summary table: one row per commodity for the latest month of the window.
//!
//! Prices and changes come straight from the reshaped long table (so they use
//! each commodity's own chronological lags). Sparklines are built separately as
//! a commodity → chart map over each commodity's full slice of the window and
//! joined onto the rows by name.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};

use crate::chart::style::currency_symbol;
use crate::chart::{ChartSpec, sparkline};
use crate::domain::{LongSeriesRow, SummaryRow, UnitMap};
use crate::error::AppError;
use crate::reshape::series_for;

/// Columns of the summary table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryColumn {
    Date,
    Commodity,
    Unit,
    Price,
    PricePrevMonth,
    PricePrevYear,
    MomChange,
    YoyChange,
    Trend,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 9] = [
        SummaryColumn::Date,
        SummaryColumn::Commodity,
        SummaryColumn::Unit,
        SummaryColumn::Price,
        SummaryColumn::PricePrevMonth,
        SummaryColumn::PricePrevYear,
        SummaryColumn::MomChange,
        SummaryColumn::YoyChange,
        SummaryColumn::Trend,
    ];

    /// Field key used in exports.
    pub fn key(self) -> &'static str {
        match self {
            SummaryColumn::Date => "Date",
            SummaryColumn::Commodity => "Commodity",
            SummaryColumn::Unit => "Unit",
            SummaryColumn::Price => "Price",
            SummaryColumn::PricePrevMonth => "Price pm",
            SummaryColumn::PricePrevYear => "Price py",
            SummaryColumn::MomChange => "MoM change",
            SummaryColumn::YoyChange => "YoY change",
            SummaryColumn::Trend => "graph",
        }
    }

    /// The embedded chart column carries no exportable value.
    pub fn is_chart(self) -> bool {
        self == SummaryColumn::Trend
    }

    /// Columns that survive CSV export, in table order.
    pub fn exportable() -> impl Iterator<Item = SummaryColumn> {
        Self::ALL.into_iter().filter(|c| !c.is_chart())
    }
}

/// Header labels for the period columns (`Nov 2024`, `Oct 2024`, `Nov 2023`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLabels {
    pub latest: String,
    pub prev_month: String,
    pub prev_year: String,
}

impl PeriodLabels {
    pub fn for_date(as_of: NaiveDate) -> Self {
        let label = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%b %Y").to_string()).unwrap_or_default()
        };
        Self {
            latest: label(Some(as_of)),
            prev_month: label(as_of.checked_sub_months(Months::new(1))),
            prev_year: label(as_of.checked_sub_months(Months::new(12))),
        }
    }

    /// Header of the sparkline column.
    pub fn trend(&self) -> String {
        format!("{} - {}", self.prev_year, self.latest)
    }
}

/// Build one chart per commodity present in `long_rows`, keyed by name.
pub fn sparklines(long_rows: &[LongSeriesRow]) -> BTreeMap<String, ChartSpec> {
    let mut names: Vec<&str> = long_rows.iter().map(|r| r.commodity.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .map(|name| (name.to_string(), sparkline(&series_for(long_rows, name))))
        .collect()
}

/// Build the summary rows for the latest date present in `long_rows`.
///
/// Commodities without a unit entry get `unit: None`.
pub fn build(long_rows: &[LongSeriesRow], units: &UnitMap) -> Vec<SummaryRow> {
    let Some(as_of) = long_rows.iter().map(|r| r.date).max() else {
        return Vec::new();
    };

    let mut latest: Vec<&LongSeriesRow> = long_rows.iter().filter(|r| r.date == as_of).collect();
    latest.sort_by(|a, b| a.commodity.cmp(&b.commodity));
    latest.dedup_by(|a, b| a.commodity == b.commodity);

    let mut charts = sparklines(long_rows);

    latest
        .into_iter()
        .map(|r| {
            let unit = units.get(&r.commodity).map(str::to_string);
            if unit.is_none() {
                log::warn!("no unit of measurement for '{}'", r.commodity);
            }
            let symbol = currency_symbol(unit.as_deref());
            let sparkline = charts
                .remove(&r.commodity)
                .unwrap_or_else(|| ChartSpec::new(crate::chart::ChartKind::Sparkline))
                .with_hover_template(&format!("%{{x}}<br>Price: {symbol}%{{y:,.2f}}"));
            SummaryRow {
                date: r.date,
                commodity: r.commodity.clone(),
                unit,
                price: r.price,
                price_prev_month: r.price_prev_month,
                price_prev_year: r.price_prev_year,
                mom_change: r.mom_change,
                yoy_change: r.yoy_change,
                sparkline,
            }
        })
        .collect()
}

/// The summary rows plus the as-of date they describe.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub as_of: NaiveDate,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(long_rows: &[LongSeriesRow], units: &UnitMap) -> Result<Self, AppError> {
        let rows = build(long_rows, units);
        let as_of = rows
            .first()
            .map(|r| r.date)
            .ok_or_else(|| AppError::no_data("The table window contains no rows."))?;
        Ok(Self { as_of, rows })
    }

    pub fn labels(&self) -> PeriodLabels {
        PeriodLabels::for_date(self.as_of)
    }

    pub fn row(&self, commodity: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.commodity == commodity)
    }

    /// Header keys of the CSV export.
    pub fn export_header(&self) -> Vec<&'static str> {
        SummaryColumn::exportable().map(SummaryColumn::key).collect()
    }

    /// Row values of the CSV export, aligned with `export_header`.
    pub fn export_records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| SummaryColumn::exportable().map(|c| cell_value(row, c)).collect())
            .collect()
    }
}

fn cell_value(row: &SummaryRow, column: SummaryColumn) -> String {
    let num = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    match column {
        SummaryColumn::Date => row.date.format("%Y-%m-%d").to_string(),
        SummaryColumn::Commodity => row.commodity.clone(),
        SummaryColumn::Unit => row.unit.clone().unwrap_or_default(),
        SummaryColumn::Price => num(row.price),
        SummaryColumn::PricePrevMonth => num(row.price_prev_month),
        SummaryColumn::PricePrevYear => num(row.price_prev_year),
        SummaryColumn::MomChange => num(row.mom_change),
        SummaryColumn::YoyChange => num(row.yoy_change),
        SummaryColumn::Trend => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::sparkline::{SPARK_LINE, SPARK_MAX};
    use crate::domain::{RawSeriesTable, SeriesColumn};
    use crate::reshape::reshape;

    fn window() -> Vec<LongSeriesRow> {
        let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let dates: Vec<_> = (0..13).map(|i| start + Months::new(i)).collect();
        let cols = vec![
            SeriesColumn {
                name: "Maize".to_string(),
                values: (0..13).map(|i| Some(200.0 + i as f64)).collect(),
            },
            SeriesColumn {
                name: "Cocoa".to_string(),
                values: (0..13).map(|i| Some(4.0 + (i % 3) as f64)).collect(),
            },
        ];
        reshape(&RawSeriesTable::new(dates, cols).unwrap())
    }

    #[test]
    fn one_row_per_commodity_on_latest_date() {
        let units: UnitMap = [("Maize", "$/mt")].into_iter().collect();
        let table = SummaryTable::new(&window(), &units).unwrap();

        assert_eq!(table.as_of, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.date == table.as_of));

        let maize = table.row("Maize").unwrap();
        assert_eq!(maize.price, Some(212.0));
        assert_eq!(maize.price_prev_month, Some(211.0));
        assert_eq!(maize.price_prev_year, Some(200.0));
        assert_eq!(maize.yoy_change, Some(212.0 / 200.0 - 1.0));
        assert_eq!(maize.unit.as_deref(), Some("$/mt"));
        assert_eq!(maize.mom_delta(), Some(1.0));
        assert_eq!(maize.yoy_delta(), Some(12.0));
    }

    #[test]
    fn missing_unit_is_blank_not_an_error() {
        let table = SummaryTable::new(&window(), &UnitMap::default()).unwrap();
        assert!(table.rows.iter().all(|r| r.unit.is_none()));
        assert_eq!(table.export_records()[0][2], "");
    }

    #[test]
    fn sparkline_spans_the_whole_window() {
        let table = SummaryTable::new(&window(), &UnitMap::default()).unwrap();
        let maize = table.row("Maize").unwrap();
        assert_eq!(maize.sparkline.trace(SPARK_LINE).unwrap().x.len(), 13);
        assert_eq!(maize.sparkline.trace(SPARK_MAX).unwrap().y, vec![212.0]);
    }

    #[test]
    fn sparkline_hover_uses_the_unit_currency() {
        let units: UnitMap = [("Maize", "$/mt"), ("Cocoa", "¢/kg")].into_iter().collect();
        let table = SummaryTable::new(&window(), &units).unwrap();
        let hover = |name: &str| {
            let row = table.row(name).unwrap();
            row.sparkline.trace(SPARK_LINE).unwrap().hover_template.clone().unwrap()
        };
        assert_eq!(hover("Maize"), "%{x}<br>Price: $%{y:,.2f}");
        assert_eq!(hover("Cocoa"), "%{x}<br>Price: ¢%{y:,.2f}");
    }

    #[test]
    fn export_drops_only_the_chart_column() {
        let table = SummaryTable::new(&window(), &UnitMap::default()).unwrap();
        let all: Vec<_> = SummaryColumn::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(table.export_header(), all[..all.len() - 1].to_vec());
        assert!(table.export_records().iter().all(|r| r.len() == 8));
    }

    #[test]
    fn period_labels_name_the_compared_months() {
        let labels = PeriodLabels::for_date(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        assert_eq!(labels.latest, "Nov 2024");
        assert_eq!(labels.prev_month, "Oct 2024");
        assert_eq!(labels.prev_year, "Nov 2023");
        assert_eq!(labels.trend(), "Nov 2023 - Nov 2024");
    }

    #[test]
    fn empty_window_is_reported() {
        assert!(build(&[], &UnitMap::default()).is_empty());
        assert_eq!(
            SummaryTable::new(&[], &UnitMap::default()).unwrap_err().exit_code(),
            crate::error::EXIT_NO_DATA
        );
    }
}
