//! Wide → long reshaping and lag metrics.
//!
//! The long table is sorted by (commodity, date) so each commodity forms one
//! contiguous, chronological block. Lags and percent changes are computed block
//! by block; a lag never reaches into a neighbouring commodity.
//!
//! Lookbacks are positional within the supplied window: the first row of each
//! commodity has no MoM values and the first twelve have no YoY values. Callers
//! needing a valid YoY for a month must include the twelve months before it.

use crate::domain::{LongSeriesRow, PriceSeries, RawSeriesTable};

pub const MOM_LAG: usize = 1;
pub const YOY_LAG: usize = 12;

/// Pivot the wide table into one row per (commodity, date), without lag metrics.
pub fn melt(table: &RawSeriesTable) -> Vec<LongSeriesRow> {
    let mut rows = Vec::with_capacity(table.len() * table.columns().len());
    for col in table.columns() {
        for (date, price) in table.dates().iter().zip(col.values.iter()) {
            rows.push(LongSeriesRow {
                date: *date,
                commodity: col.name.clone(),
                price: *price,
                price_prev_month: None,
                price_prev_year: None,
                mom_change: None,
                yoy_change: None,
            });
        }
    }
    rows.sort_by(|a, b| a.commodity.cmp(&b.commodity).then(a.date.cmp(&b.date)));
    rows
}

/// Melt the table and fill in previous-month/previous-year prices and changes.
pub fn reshape(table: &RawSeriesTable) -> Vec<LongSeriesRow> {
    let mut rows = melt(table);
    for block in rows.chunk_by_mut(|a, b| a.commodity == b.commodity) {
        apply_lags(block);
    }
    log::debug!(
        "reshaped {} months x {} commodities into {} rows",
        table.len(),
        table.columns().len(),
        rows.len()
    );
    rows
}

fn apply_lags(block: &mut [LongSeriesRow]) {
    let prices: Vec<Option<f64>> = block.iter().map(|r| r.price).collect();
    for (i, row) in block.iter_mut().enumerate() {
        row.price_prev_month = lagged(&prices, i, MOM_LAG);
        row.price_prev_year = lagged(&prices, i, YOY_LAG);
        row.mom_change = ratio_change(row.price, row.price_prev_month);
        row.yoy_change = ratio_change(row.price, row.price_prev_year);
    }
}

fn lagged(prices: &[Option<f64>], i: usize, lag: usize) -> Option<f64> {
    i.checked_sub(lag).and_then(|j| prices[j])
}

/// `current / previous - 1`, undefined when either side is missing or the base is zero.
fn ratio_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let (cur, prev) = (current?, previous?);
    if prev == 0.0 {
        return None;
    }
    Some(cur / prev - 1.0)
}

/// The observed prices of one commodity from a long table, oldest first.
pub fn series_for(rows: &[LongSeriesRow], commodity: &str) -> PriceSeries {
    let points = rows
        .iter()
        .filter(|r| r.commodity == commodity)
        .filter_map(|r| r.price.map(|p| (r.date, p)))
        .collect();
    PriceSeries::new(commodity, points)
}
