//! Dataset sources: local CSV, published URL, or a seeded demo history.

pub mod sample;
pub mod source;

pub use source::{SourceArgs, load_dataset, resolve_source};
