//! ChartSpec JSON output.

use std::fs;
use std::path::Path;

use crate::chart::ChartSpec;
use crate::error::AppError;

/// Serialize one or more charts as a JSON array.
pub fn charts_to_json(charts: &[&ChartSpec]) -> Result<String, AppError> {
    serde_json::to_string_pretty(charts)
        .map_err(|e| AppError::runtime(format!("Failed to serialize charts: {e}")))
}

/// Write charts to `path` as a JSON array.
pub fn write_charts_json(path: &Path, charts: &[&ChartSpec]) -> Result<(), AppError> {
    let json = charts_to_json(charts)?;
    fs::write(path, json)
        .map_err(|e| AppError::runtime(format!("Failed to write '{}': {e}", path.display())))
}
