//! `cmo-dash` library crate.
//!
//! The binary (`cmo`) is a thin wrapper around this library so that:
//!
//! - the ingest → reshape → summary pipeline is testable without a terminal
//! - chart specs can be produced for other front-ends (JSON output)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod groups;
pub mod io;
pub mod plot;
pub mod report;
pub mod reshape;
pub mod summary;
pub mod tui;
