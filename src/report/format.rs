//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::DashboardContext;
use crate::domain::{ChangeSign, SummaryRow};
use crate::groups::CommodityGroups;
use crate::plot::sparkline_glyphs;
use crate::summary::SummaryTable;

/// Unit abbreviations used in the sheet, with their meaning.
pub const UNIT_ABBREVIATIONS: [(&str, &str); 9] = [
    ("$", "US dollar"),
    ("bbl", "barrel"),
    ("cum", "cubic meter"),
    ("dmt", "dry metric ton"),
    ("kg", "kilogram"),
    ("mmbtu", "million British thermal units"),
    ("mt", "metric ton"),
    ("toz", "troy oz"),
    ("¢/sheets", "cents per sheet"),
];

const SPARK_WIDTH: usize = 13;

/// Header block: source, as-of month, and ingest notes.
pub fn format_run_summary(ctx: &DashboardContext) -> String {
    let mut out = String::new();

    out.push_str("=== cmo - World Bank Commodity Prices ===\n");
    out.push_str(&format!("Source: {}\n", ctx.config.source));
    out.push_str(&format!("As-of: {}\n", ctx.summary.as_of.format("%B %Y")));
    out.push_str(&format!(
        "History: {} months from {} | table window: {} months\n",
        ctx.history.len(),
        ctx.history.first_date().map(|d| d.format("%Y-%m").to_string()).unwrap_or_default(),
        ctx.config.table_months
    ));
    if !ctx.row_errors.is_empty() {
        out.push_str(&format!("Skipped rows: {}\n", ctx.row_errors.len()));
    }
    out.push('\n');
    out
}

/// Format the summary table with a sparkline glyph column.
pub fn format_summary_table(summary: &SummaryTable) -> String {
    let labels = summary.labels();
    let mut out = String::new();

    out.push_str(
        format!(
            "{:<30} {:<10} {:>12} {:>12} {:>12} {:>9} {:>9}  {}\n",
            "Commodity",
            "Unit",
            labels.latest,
            labels.prev_month,
            labels.prev_year,
            "PM",
            "PY",
            labels.trend()
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<30} {:-<10} {:-<12} {:-<12} {:-<12} {:-<9} {:-<9}  {:-<13}\n",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in &summary.rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

fn format_row(row: &SummaryRow) -> String {
    format!(
        "{:<30} {:<10} {:>12} {:>12} {:>12} {:>9} {:>9}  {}",
        truncate(&row.commodity, 30),
        row.unit.as_deref().unwrap_or(""),
        fmt_price(row.price),
        fmt_price(row.price_prev_month),
        fmt_price(row.price_prev_year),
        fmt_change(row.mom_change),
        fmt_change(row.yoy_change),
        sparkline_glyphs(&row.sparkline, SPARK_WIDTH),
    )
    .trim_end()
    .to_string()
}

/// One block per group with its member commodities.
pub fn format_groups(groups: &CommodityGroups) -> String {
    let mut out = String::new();
    for (group, members) in groups.iter() {
        out.push_str(&format!("{group} ({})\n", members.len()));
        for m in members {
            out.push_str(&format!("  - {m}\n"));
        }
    }
    out
}

pub fn format_units_legend() -> String {
    let mut out = String::from("Abbreviations of units:\n");
    for (abbr, meaning) in UNIT_ABBREVIATIONS {
        out.push_str(&format!("  {abbr:<9} {meaning}\n"));
    }
    out
}

/// `1234.5` → `1,234.50`; missing → `-`.
pub fn fmt_price(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => fmt_thousands(v, 2),
        _ => "-".to_string(),
    }
}

/// Ratio as a percentage with a direction marker: `0.053` → `▲5.3%`.
pub fn fmt_change(v: Option<f64>) -> String {
    let Some(r) = v.filter(|r| r.is_finite()) else {
        return "-".to_string();
    };
    format!("{}{:.1}%", sign_marker(ChangeSign::of(v)), r.abs() * 100.0)
}

pub fn sign_marker(sign: ChangeSign) -> &'static str {
    match sign {
        ChangeSign::Positive => "▲",
        ChangeSign::Negative => "▼",
        ChangeSign::Neutral => "",
    }
}

/// Fixed decimals with `,` thousands separators.
pub fn fmt_thousands(v: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, v.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let mut grouped = String::with_capacity(s.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0') { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, ChartSpec};
    use chrono::NaiveDate;

    #[test]
    fn thousands_grouping() {
        assert_eq!(fmt_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(fmt_thousands(999.0, 2), "999.00");
        assert_eq!(fmt_thousands(-1000.0, 0), "-1,000");
        assert_eq!(fmt_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn change_cells_carry_direction() {
        assert_eq!(fmt_change(Some(0.053)), "▲5.3%");
        assert_eq!(fmt_change(Some(-0.25)), "▼25.0%");
        assert_eq!(fmt_change(Some(0.0)), "0.0%");
        assert_eq!(fmt_change(None), "-");
    }

    #[test]
    fn table_has_period_headers() {
        let as_of = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        let summary = SummaryTable {
            as_of,
            rows: vec![SummaryRow {
                date: as_of,
                commodity: "Gold".to_string(),
                unit: Some("$/toz".to_string()),
                price: Some(2650.5),
                price_prev_month: Some(2700.0),
                price_prev_year: None,
                mom_change: Some(2650.5 / 2700.0 - 1.0),
                yoy_change: None,
                sparkline: ChartSpec::new(ChartKind::Sparkline),
            }],
        };
        let txt = format_summary_table(&summary);
        let mut lines = txt.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("Nov 2024"));
        assert!(header.contains("Oct 2024"));
        assert!(header.ends_with("Nov 2023 - Nov 2024"));
        let row = lines.nth(1).unwrap();
        assert!(row.starts_with("Gold"));
        assert!(row.contains("2,650.50"));
        assert!(row.contains("▼1.8%"));
    }

    #[test]
    fn units_legend_lists_every_abbreviation() {
        let txt = format_units_legend();
        assert_eq!(txt.lines().count(), 1 + UNIT_ABBREVIATIONS.len());
        assert!(txt.contains("cents per sheet"));
    }
}
