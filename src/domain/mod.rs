//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the wide monthly price table (`RawSeriesTable`) and unit metadata (`UnitMap`)
//! - the fixed commodity groups (`CommodityGroup`)
//! - reshaped rows (`LongSeriesRow`) and summary rows (`SummaryRow`)
//! - run configuration (`DashboardConfig`, `DataSource`)

pub mod types;

pub use types::*;
