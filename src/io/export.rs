//! Export the summary table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: the summary columns in table order, minus the embedded chart.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::summary::SummaryTable;

/// File name used when no explicit output path is given.
pub const DEFAULT_EXPORT_FILE: &str = "commodities-prices.csv";

/// Write the summary rows to a CSV file.
pub fn write_summary_csv(path: &Path, summary: &SummaryTable) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_summary(file, summary)?;
    log::info!("exported {} rows to {}", summary.rows.len(), path.display());
    Ok(())
}

/// Write the summary rows as CSV to any writer.
pub fn write_summary<W: std::io::Write>(writer: W, summary: &SummaryTable) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(summary.export_header())
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for record in summary.export_records() {
        out.write_record(&record)
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))
}
