//! End-to-end checks through the public API: sheet text in, table/charts/CSV out.

use chrono::{Months, NaiveDate};

use cmo_dash::app::pipeline::{build_context_from, detail_charts};
use cmo_dash::chart::area_with_gradient;
use cmo_dash::chart::style::GREEN;
use cmo_dash::domain::{
    DashboardConfig, DataSource, PriceSeries, RawSeriesTable, SeriesColumn, UnitMap,
};
use cmo_dash::io::{parse_cmo_str, write_summary_csv};
use cmo_dash::reshape::reshape;
use cmo_dash::summary::{SummaryColumn, SummaryTable};

fn month(i: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + Months::new(i)
}

#[test]
fn rising_series_reports_a_green_doubling_trend() {
    let points: Vec<_> = (0..24)
        .map(|i| (month(i), 100.0 + 100.0 * f64::from(i) / 23.0))
        .collect();
    let series = PriceSeries::new("Copper", points);

    let spec = area_with_gradient(&series, "Monthly Price of Copper", None);
    let trend = spec
        .annotations
        .iter()
        .find(|a| a.label.ends_with("-years trend"))
        .expect("trend annotation");

    assert_eq!(trend.value_text, "+100.0%");
    assert_eq!(trend.color, GREEN);
    assert!((trend.value.unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn thirteen_month_window_yields_one_row_per_commodity() {
    let dates: Vec<_> = (0..13).map(month).collect();
    let names = ["Cocoa", "Gold", "Maize", "Tin", "Urea"];
    let columns = names
        .iter()
        .enumerate()
        .map(|(k, name)| SeriesColumn {
            name: name.to_string(),
            values: (0..13).map(|i| Some(10.0 * (k + 1) as f64 + f64::from(i))).collect(),
        })
        .collect();
    let table = RawSeriesTable::new(dates, columns).unwrap();

    let units: UnitMap = names.iter().map(|n| (*n, "$/mt")).collect();
    let summary = SummaryTable::new(&reshape(&table), &units).unwrap();

    assert_eq!(summary.rows.len(), 5);
    assert!(summary.rows.iter().all(|r| r.date == month(12)));
    let gold = summary.row("Gold").unwrap();
    assert_eq!(gold.price, Some(32.0));
    assert_eq!(gold.price_prev_month, Some(31.0));
    assert_eq!(gold.price_prev_year, Some(20.0));
    assert!((gold.yoy_change.unwrap() - 0.6).abs() < 1e-12);
}

#[test]
fn export_has_every_column_but_the_chart_in_table_order() {
    let mut sheet = String::from(",Gold,Silver\n,($/troy oz),($/troy oz)\n");
    for i in 0..14 {
        let d = month(i);
        let (gold, silver) = (1800 + 10 * i, 20 + i);
        sheet.push_str(&format!("{}M{:02},{gold},{silver}\n", d.format("%Y"), d.format("%m")));
    }
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    let json = r#"[{"group": "Precious Metals", "commodities": ["Gold", "Silver"]}]"#;
    std::fs::write(&schema, json).unwrap();

    let config = DashboardConfig {
        source: DataSource::File("sheet.csv".into()),
        history_start_year: 2022,
        schema_path: Some(schema),
        ..DashboardConfig::default()
    };
    let data = parse_cmo_str(&sheet, &config).unwrap();
    let ctx = build_context_from(config, data).unwrap();

    let path = dir.path().join("commodities-prices.csv");
    write_summary_csv(&path, &ctx.summary).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();

    let expected: Vec<&str> = SummaryColumn::exportable().map(SummaryColumn::key).collect();
    assert_eq!(lines.next().unwrap(), expected.join(","));
    assert!(!expected.contains(&"graph"));
    let gold: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(gold[..6], ["2023-02-01", "Gold", "$/toz", "1930", "1920", "1810"]);
    let mom: f64 = gold[6].parse().unwrap();
    let yoy: f64 = gold[7].parse().unwrap();
    assert!((mom - (1930.0 / 1920.0 - 1.0)).abs() < 1e-12);
    assert!((yoy - (1930.0 / 1810.0 - 1.0)).abs() < 1e-12);
    assert_eq!(lines.count(), 1);

    let (area, change) = detail_charts(&ctx, "Silver").unwrap();
    assert_eq!(area.layout.y_axis.tick_suffix.as_deref(), Some("$"));
    assert_eq!(change.traces[0].x.len(), 14);
}
