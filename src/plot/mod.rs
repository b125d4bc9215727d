//! Terminal rendering of chart specs.

pub mod ascii;

pub use ascii::{chart_bounds, day_number, from_day_number, render_chart, sparkline_glyphs};
