//! CSV ingest and normalization.
//!
//! Turns the World Bank monthly price sheet into a clean wide table plus the
//! commodity → unit map.
//!
//! Layout of the sheet:
//! - header row: an unnamed period column, then one column per commodity
//! - one or more metadata rows before the first period label; the first of
//!   them holds the parenthesised units (`($/mt)`), the rest are skipped
//! - one row per month, period labels like `2024M11`
//!
//! Design goals:
//! - **Strict schema** for structure (clear errors + exit code 2)
//! - **Lenient cells**: non-numeric values become missing and are forward-filled
//! - **Row-level reporting**: bad period labels are skipped and reported
//! - **Separation of concerns**: no reshaping or grouping logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::ByteRecord;

use crate::domain::{DashboardConfig, RawSeriesTable, SeriesColumn, UnitMap};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the filtered wide table, units, and what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub table: RawSeriesTable,
    pub units: UnitMap,
    pub row_errors: Vec<RowError>,
    /// Data records read (metadata rows excluded).
    pub rows_read: usize,
    /// Configured drop-list entries that were actually present.
    pub dropped_columns: Vec<String>,
}

/// Load and normalize a CMO sheet from a file on disk.
pub fn load_cmo_file(path: &Path, config: &DashboardConfig) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_cmo_csv(file, config)
}

/// Load and normalize a CMO sheet already held in memory.
pub fn parse_cmo_str(text: &str, config: &DashboardConfig) -> Result<IngestedData, AppError> {
    read_cmo_csv(text.as_bytes(), config)
}

pub fn read_cmo_csv<R: Read>(
    reader: R,
    config: &DashboardConfig,
) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .byte_headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.len() < 2 {
        return Err(AppError::input(
            "CSV must have a period column followed by at least one commodity column.",
        ));
    }

    // Column 0 is the period; keep the remaining columns that are not dropped.
    let names: Vec<String> = headers
        .iter()
        .skip(1)
        .map(|h| clean_column_name(&String::from_utf8_lossy(h)))
        .collect();
    let mut kept: Vec<(usize, String)> = Vec::with_capacity(names.len());
    let mut dropped_columns = Vec::new();
    for (i, name) in names.into_iter().enumerate() {
        if config.dropped_columns.iter().any(|d| d == &name) {
            dropped_columns.push(name);
        } else {
            kept.push((i + 1, name));
        }
    }
    if !dropped_columns.is_empty() {
        log::warn!("dropping sparse columns: {}", dropped_columns.join("; "));
    }
    if kept.is_empty() {
        return Err(AppError::input(
            "No commodity columns remain after dropping configured columns.",
        ));
    }

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); kept.len()];
    let mut units: Option<UnitMap> = None;
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.byte_records().enumerate() {
        // +2: records start after the header and CSV lines are 1-based.
        let line = idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let period = field(&record, 0).unwrap_or("");
        let Some(date) = parse_period(period) else {
            if dates.is_empty() {
                // Still in the metadata block.
                if units.is_none() {
                    units = Some(parse_units_row(&record, &kept));
                } else {
                    log::debug!("skipping metadata row at line {line}");
                }
            } else {
                let raw = String::from_utf8_lossy(record.get(0).unwrap_or_default());
                row_errors.push(RowError {
                    line,
                    message: format!(
                        "Invalid period label '{raw}'. Expected YYYYMmm, YYYY-MM or YYYY-MM-DD."
                    ),
                });
            }
            continue;
        };

        rows_read += 1;
        if record.len() != headers.len() {
            row_errors.push(RowError {
                line,
                message: format!(
                    "Expected {} fields, found {}; missing cells treated as empty.",
                    headers.len(),
                    record.len()
                ),
            });
        }

        dates.push(date);
        for (col, (field_idx, _)) in values.iter_mut().zip(&kept) {
            col.push(parse_price(field(&record, *field_idx)));
        }
    }

    for err in &row_errors {
        log::warn!("line {}: {}", err.line, err.message);
    }

    if dates.is_empty() {
        return Err(AppError::no_data("No monthly data rows found in the CSV."));
    }

    let columns = kept
        .into_iter()
        .zip(values)
        .map(|((_, name), mut values)| {
            forward_fill(&mut values);
            SeriesColumn { name, values }
        })
        .collect();

    let table = RawSeriesTable::new(dates, columns)?.since_year(config.history_start_year);
    if table.is_empty() {
        return Err(AppError::no_data(format!(
            "No monthly rows on or after {} remain.",
            config.history_start_year
        )));
    }

    log::info!(
        "ingested {} monthly rows, kept {} months x {} commodities from {}",
        rows_read,
        table.len(),
        table.columns().len(),
        config.history_start_year
    );

    Ok(IngestedData {
        table,
        units: units.unwrap_or_default(),
        row_errors,
        rows_read,
        dropped_columns,
    })
}

/// Trim spaces and `*` footnote markers from both ends and remove dots.
pub fn clean_column_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim_matches(|c| c == ' ' || c == '*')
        .replace('.', "")
}

/// Strip the parentheses and shorten the verbose unit spellings.
pub fn clean_unit(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '(' || c == ')')
        .replace("$/cubic meter", "$/cum")
        .replace("$/troy oz", "$/toz")
        .replace("cents/sheet", "¢/sheets")
}

fn parse_units_row(record: &ByteRecord, kept: &[(usize, String)]) -> UnitMap {
    kept.iter()
        .filter_map(|(idx, name)| {
            let unit = clean_unit(field(record, *idx)?);
            (!unit.is_empty()).then(|| (name.clone(), unit))
        })
        .collect()
}

/// Parse a period label to the first day of its month.
pub fn parse_period(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some((year, month)) = s.split_once('M') {
        return first_of_month(year, month);
    }

    const FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.with_day(1);
        }
    }

    let (year, month) = s.split_once('-')?;
    first_of_month(year, month)
}

fn first_of_month(year: &str, month: &str) -> Option<NaiveDate> {
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// A field as text; bytes that are not UTF-8 read as a missing cell.
fn field(record: &ByteRecord, idx: usize) -> Option<&str> {
    std::str::from_utf8(record.get(idx)?).ok()
}

fn parse_price(s: Option<&str>) -> Option<f64> {
    let v = s?.replace(',', "").parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for v in values.iter_mut() {
        match v {
            Some(x) => last = Some(*x),
            None => *v = last,
        }
    }
}
