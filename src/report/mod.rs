//! Reporting utilities: formatted terminal output for the summary table,
//! group listing, and unit legend.

pub mod format;

pub use format::*;
