//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once at startup and shared read-only by every view
//! - exported to JSON/CSV
//! - handed to the presentation layer without further conversion

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::error::AppError;

/// World Bank "Pink Sheet" monthly history used when no other source is configured.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/plotly/Figure-Friday/refs/heads/main/2024/week-50/CMO-Historical-Data-Monthly.csv";

/// Columns that are mostly empty in the source file and are dropped at ingest.
pub const DEFAULT_DROPPED_COLUMNS: [&str; 4] =
    ["Barley", "Sorghum", "Shrimps, Mexican", "Phosphate rock"];

pub const DEFAULT_HISTORY_START_YEAR: i32 = 2010;

/// Summary window: latest month plus twelve months of lookback.
pub const DEFAULT_TABLE_MONTHS: usize = 13;

/// Smallest window that still yields a valid YoY value on its latest row.
pub const MIN_TABLE_MONTHS: usize = 13;

/// One of the ten fixed commodity groups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum CommodityGroup {
    #[serde(rename = "Energy")]
    Energy,
    #[serde(rename = "Beverages")]
    Beverages,
    #[serde(rename = "Oils and Meals")]
    OilsAndMeals,
    #[serde(rename = "Grains")]
    Grains,
    #[serde(rename = "Other Food")]
    OtherFood,
    #[serde(rename = "Timber")]
    Timber,
    #[serde(rename = "Other Raw Materials")]
    OtherRawMaterials,
    #[serde(rename = "Fertilizers")]
    Fertilizers,
    #[serde(rename = "Metals and Minerals")]
    MetalsAndMinerals,
    #[serde(rename = "Precious Metals")]
    PreciousMetals,
}

impl CommodityGroup {
    pub const ALL: [CommodityGroup; 10] = [
        CommodityGroup::Energy,
        CommodityGroup::Beverages,
        CommodityGroup::OilsAndMeals,
        CommodityGroup::Grains,
        CommodityGroup::OtherFood,
        CommodityGroup::Timber,
        CommodityGroup::OtherRawMaterials,
        CommodityGroup::Fertilizers,
        CommodityGroup::MetalsAndMinerals,
        CommodityGroup::PreciousMetals,
    ];

    /// Human-readable label (also the legend title of group charts).
    pub fn label(self) -> &'static str {
        match self {
            CommodityGroup::Energy => "Energy",
            CommodityGroup::Beverages => "Beverages",
            CommodityGroup::OilsAndMeals => "Oils and Meals",
            CommodityGroup::Grains => "Grains",
            CommodityGroup::OtherFood => "Other Food",
            CommodityGroup::Timber => "Timber",
            CommodityGroup::OtherRawMaterials => "Other Raw Materials",
            CommodityGroup::Fertilizers => "Fertilizers",
            CommodityGroup::MetalsAndMinerals => "Metals and Minerals",
            CommodityGroup::PreciousMetals => "Precious Metals",
        }
    }
}

impl std::fmt::Display for CommodityGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One commodity column of the wide table.
///
/// `None` marks a value that could not be parsed and had no earlier value to
/// forward-fill from.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Wide monthly table: one row per month, one column per commodity.
///
/// Invariant: dates are first-of-month, strictly increasing, one per calendar
/// month with no gaps, and every column has exactly one value per date.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeriesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<SeriesColumn>,
}

impl RawSeriesTable {
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<SeriesColumn>) -> Result<Self, AppError> {
        for pair in dates.windows(2) {
            let expected = pair[0].checked_add_months(Months::new(1));
            if expected != Some(pair[1]) {
                return Err(AppError::input(format!(
                    "Dates must be consecutive months: {} is followed by {}.",
                    pair[0], pair[1]
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if col.values.len() != dates.len() {
                return Err(AppError::input(format!(
                    "Column '{}' has {} values but the table has {} dates.",
                    col.name,
                    col.values.len(),
                    dates.len()
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(AppError::input(format!("Duplicate commodity column '{}'.", col.name)));
            }
        }

        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[SeriesColumn] {
        &self.columns
    }

    pub fn commodity_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&SeriesColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// The last `n` months (all of them if the table is shorter).
    pub fn tail(&self, n: usize) -> RawSeriesTable {
        let start = self.dates.len().saturating_sub(n);
        self.slice_rows(start)
    }

    /// Rows dated in `year` or later.
    pub fn since_year(&self, year: i32) -> RawSeriesTable {
        let start = self
            .dates
            .iter()
            .position(|d| chrono::Datelike::year(d) >= year)
            .unwrap_or(self.dates.len());
        self.slice_rows(start)
    }

    /// Restrict the table to the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<RawSeriesTable, AppError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let col = self
                .column(name)
                .ok_or_else(|| AppError::input(format!("Unknown commodity '{name}'.")))?;
            columns.push(col.clone());
        }
        Ok(RawSeriesTable {
            dates: self.dates.clone(),
            columns,
        })
    }

    /// The observed (non-missing) points of one commodity, oldest first.
    pub fn series(&self, name: &str) -> Option<PriceSeries> {
        let col = self.column(name)?;
        let points = self
            .dates
            .iter()
            .zip(col.values.iter())
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
            .collect();
        Some(PriceSeries {
            commodity: col.name.clone(),
            points,
        })
    }

    fn slice_rows(&self, start: usize) -> RawSeriesTable {
        RawSeriesTable {
            dates: self.dates[start..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| SeriesColumn {
                    name: c.name.clone(),
                    values: c.values[start..].to_vec(),
                })
                .collect(),
        }
    }
}

/// A single commodity's observed prices in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub commodity: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    pub fn new(commodity: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            commodity: commodity.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|(d, _)| *d).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }

    /// The first point holding the maximum value.
    pub fn max_point(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .copied()
            .fold(None, |best, p| match best {
                Some((_, v)) if p.1 <= v => best,
                _ => Some(p),
            })
    }

    /// The first point holding the minimum value.
    pub fn min_point(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .copied()
            .fold(None, |best, p| match best {
                Some((_, v)) if p.1 >= v => best,
                _ => Some(p),
            })
    }
}

/// Commodity name → unit-of-measurement label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitMap {
    units: BTreeMap<String, String>,
}

impl UnitMap {
    pub fn get(&self, commodity: &str) -> Option<&str> {
        self.units.get(commodity).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.units.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UnitMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One (commodity, month) observation of the long table plus its lag metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongSeriesRow {
    pub date: NaiveDate,
    pub commodity: String,
    pub price: Option<f64>,
    pub price_prev_month: Option<f64>,
    pub price_prev_year: Option<f64>,
    pub mom_change: Option<f64>,
    pub yoy_change: Option<f64>,
}

/// One display row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub commodity: String,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub price_prev_month: Option<f64>,
    pub price_prev_year: Option<f64>,
    pub mom_change: Option<f64>,
    pub yoy_change: Option<f64>,
    pub sparkline: ChartSpec,
}

impl SummaryRow {
    /// Absolute price move vs the previous month.
    pub fn mom_delta(&self) -> Option<f64> {
        Some(self.price? - self.price_prev_month?)
    }

    /// Absolute price move vs the same month last year.
    pub fn yoy_delta(&self) -> Option<f64> {
        Some(self.price? - self.price_prev_year?)
    }
}

/// Display class of a percent-change value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSign {
    Positive,
    Negative,
    Neutral,
}

impl ChangeSign {
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 => ChangeSign::Positive,
            Some(v) if v < 0.0 => ChangeSign::Negative,
            _ => ChangeSign::Neutral,
        }
    }
}

/// Where the monthly dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
    /// Seeded synthetic history covering the default schema.
    Demo { seed: u64 },
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
            DataSource::Demo { seed } => write!(f, "demo (seed {seed})"),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags and environment (plus defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    /// First calendar year kept from the history.
    pub history_start_year: i32,
    /// Number of trailing months used for the summary table.
    pub table_months: usize,
    pub dropped_columns: Vec<String>,
    /// Optional JSON group schema replacing the built-in one.
    pub schema_path: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.table_months < MIN_TABLE_MONTHS {
            return Err(AppError::input(format!(
                "Table window must cover at least {MIN_TABLE_MONTHS} months (got {}).",
                self.table_months
            )));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Url(DEFAULT_DATA_URL.to_string()),
            history_start_year: DEFAULT_HISTORY_START_YEAR,
            table_months: DEFAULT_TABLE_MONTHS,
            dropped_columns: DEFAULT_DROPPED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            schema_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn table_rejects_gaps_between_months() {
        let dates = vec![month(2024, 1), month(2024, 3)];
        let cols = vec![SeriesColumn {
            name: "Gold".to_string(),
            values: vec![Some(1.0), Some(2.0)],
        }];
        let err = RawSeriesTable::new(dates, cols).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn table_rejects_duplicate_columns() {
        let dates = vec![month(2024, 1)];
        let cols = vec![
            SeriesColumn { name: "Gold".to_string(), values: vec![Some(1.0)] },
            SeriesColumn { name: "Gold".to_string(), values: vec![Some(2.0)] },
        ];
        assert!(RawSeriesTable::new(dates, cols).is_err());
    }

    #[test]
    fn tail_and_since_year_slice_rows() {
        let dates: Vec<_> = (1..=12)
            .map(|m| month(2023, m))
            .chain((1..=3).map(|m| month(2024, m)))
            .collect();
        let values = (0..dates.len()).map(|i| Some(i as f64)).collect();
        let column = SeriesColumn { name: "Tin".to_string(), values };
        let table = RawSeriesTable::new(dates, vec![column]).unwrap();

        let tail = table.tail(4);
        assert_eq!(tail.len(), 4);
        assert_eq!(tail.first_date(), Some(month(2023, 12)));
        assert_eq!(tail.columns()[0].values[0], Some(11.0));

        let recent = table.since_year(2024);
        assert_eq!(recent.len(), 3);
        assert_eq!(table.since_year(2030).len(), 0);
    }

    #[test]
    fn series_skips_missing_values_and_finds_first_extremes() {
        let dates = vec![month(2024, 1), month(2024, 2), month(2024, 3), month(2024, 4)];
        let values = vec![None, Some(5.0), Some(1.0), Some(5.0)];
        let column = SeriesColumn { name: "Zinc".to_string(), values };
        let table = RawSeriesTable::new(dates, vec![column]).unwrap();

        let s = table.series("Zinc").unwrap();
        assert_eq!(s.points.len(), 3);
        assert_eq!(s.max_point(), Some((month(2024, 2), 5.0)));
        assert_eq!(s.min_point(), Some((month(2024, 3), 1.0)));
        assert!(table.series("Lead").is_none());
    }

    #[test]
    fn change_sign_classifies_values() {
        assert_eq!(ChangeSign::of(Some(0.1)), ChangeSign::Positive);
        assert_eq!(ChangeSign::of(Some(-0.1)), ChangeSign::Negative);
        assert_eq!(ChangeSign::of(Some(0.0)), ChangeSign::Neutral);
        assert_eq!(ChangeSign::of(None), ChangeSign::Neutral);
    }

    #[test]
    fn config_requires_a_full_year_of_lookback() {
        let config = DashboardConfig {
            table_months: 12,
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(DashboardConfig::default().validate().is_ok());
    }
}
