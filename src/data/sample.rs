//! Synthetic monthly history for offline runs (`--demo`).
//!
//! Every commodity of the built-in schema gets a seeded log-normal random walk
//! from January 2000 to the last month of the published sheet. The result goes
//! through the same history cut as real data, so it can stand in for ingest.

use chrono::{Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CommodityGroup, DashboardConfig, RawSeriesTable, SeriesColumn, UnitMap};
use crate::error::AppError;
use crate::groups::GroupSchema;
use crate::io::IngestedData;

/// Monthly log-return volatility of the random walk.
const MONTHLY_VOL: f64 = 0.045;

const FIRST_MONTH: (i32, u32) = (2000, 1);
const LAST_MONTH: (i32, u32) = (2024, 11);

/// Generate a full dataset for the built-in schema.
pub fn generate_history(seed: u64, config: &DashboardConfig) -> Result<IngestedData, AppError> {
    let start = NaiveDate::from_ymd_opt(FIRST_MONTH.0, FIRST_MONTH.1, 1)
        .ok_or_else(|| AppError::runtime("Invalid demo start month."))?;
    let end = NaiveDate::from_ymd_opt(LAST_MONTH.0, LAST_MONTH.1, 1)
        .ok_or_else(|| AppError::runtime("Invalid demo end month."))?;

    let mut dates = Vec::new();
    let mut d = start;
    while d <= end {
        dates.push(d);
        d = d
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::runtime("Demo calendar overflow."))?;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, MONTHLY_VOL)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let schema = GroupSchema::builtin();
    let mut columns = Vec::with_capacity(schema.commodity_count());
    let mut units = Vec::with_capacity(schema.commodity_count());

    for (group, members) in schema.iter() {
        for name in members {
            let unit = demo_unit(group, name);
            let mut level = starting_level(unit) * rng.gen_range(0.5..2.0);
            let values = dates
                .iter()
                .map(|_| {
                    let price = level;
                    level *= normal.sample(&mut rng).exp();
                    Some(round2(price))
                })
                .collect();
            columns.push(SeriesColumn {
                name: name.clone(),
                values,
            });
            units.push((name.clone(), unit.to_string()));
        }
    }

    let rows_read = dates.len();
    let table = RawSeriesTable::new(dates, columns)?.since_year(config.history_start_year);
    if table.is_empty() {
        return Err(AppError::no_data(format!(
            "Demo history ends in {}; nothing on or after {}.",
            LAST_MONTH.0, config.history_start_year
        )));
    }

    log::info!(
        "generated demo history: {} months x {} commodities (seed {seed})",
        table.len(),
        table.columns().len()
    );

    Ok(IngestedData {
        table,
        units: units.into_iter().collect::<UnitMap>(),
        row_errors: Vec::new(),
        rows_read,
        dropped_columns: Vec::new(),
    })
}

/// Unit labels in the cleaned form the real sheet produces.
fn demo_unit(group: CommodityGroup, name: &str) -> &'static str {
    match name {
        n if n.starts_with("Crude oil") => "$/bbl",
        n if n.starts_with("Coal") => "$/mt",
        n if n.contains("natural gas") || n.starts_with("Natural gas") => "$/mmbtu",
        "Plywood" => "¢/sheets",
        "Iron ore, cfr spot" => "$/dmt",
        n if n.starts_with("Banana") || n.starts_with("Orange") => "$/kg",
        n if n.starts_with("Sugar") || n.starts_with("Tobacco") => "$/kg",
        _ => match group {
            CommodityGroup::Energy => "$/mmbtu",
            CommodityGroup::Beverages => "$/kg",
            CommodityGroup::OtherFood => "$/kg",
            CommodityGroup::Timber => "$/cum",
            CommodityGroup::OtherRawMaterials => "$/kg",
            CommodityGroup::PreciousMetals => "$/toz",
            CommodityGroup::OilsAndMeals
            | CommodityGroup::Grains
            | CommodityGroup::Fertilizers
            | CommodityGroup::MetalsAndMinerals => "$/mt",
        },
    }
}

/// Rough 2000-era price scale for a unit so charts look plausible.
fn starting_level(unit: &str) -> f64 {
    match unit {
        "$/bbl" => 30.0,
        "$/mmbtu" => 4.0,
        "$/kg" => 2.0,
        "$/cum" => 300.0,
        "¢/sheets" => 450.0,
        "$/toz" => 400.0,
        "$/dmt" => 30.0,
        _ => 250.0,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
