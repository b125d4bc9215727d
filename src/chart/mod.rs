//! Chart builders.
//!
//! Each builder is a pure function of its input series and styling
//! parameters, returning a freshly constructed `ChartSpec`:
//!
//! - `sparkline`: inline trend for a table cell
//! - `area_with_gradient`: price history with extremes and trend
//! - `signed_change_line`: month-over-month change colored by sign
//! - `group_comparison`: one line per group member, one highlighted

pub mod area;
pub mod change;
pub mod group;
pub mod sparkline;
pub mod spec;
pub mod style;

pub use area::{area_with_gradient, trend_ratio};
pub use change::{diverging_scale, pct_changes, signed_change_line, zero_position};
pub use group::group_comparison;
pub use sparkline::sparkline;
pub use spec::*;
pub use style::{Rgba, TickFormat};
