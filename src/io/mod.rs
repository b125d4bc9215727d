//! Input/output helpers.
//!
//! - CSV ingest + normalization (`ingest`)
//! - summary CSV export (`export`)
//! - chart JSON output (`chart`)

pub mod chart;
pub mod export;
pub mod ingest;

pub use chart::*;
pub use export::*;
pub use ingest::*;
