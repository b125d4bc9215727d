//! Command-line parsing for the commodity price dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and presentation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CommodityGroup, DEFAULT_HISTORY_START_YEAR, DEFAULT_TABLE_MONTHS};
use crate::io::DEFAULT_EXPORT_FILE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cmo",
    version,
    about = "World Bank commodity price dashboard (Pink Sheet monthly data)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the summary table: latest price, previous month and year, changes, trend.
    Table(DataArgs),
    /// Detail charts (price history and monthly change) for one commodity.
    Chart(ChartArgs),
    /// Comparison chart of one commodity against the rest of its group.
    Group(GroupArgs),
    /// List the commodity groups and their members.
    Groups(DataArgs),
    /// Write the summary table to CSV.
    Export(ExportArgs),
    /// Print the legend of unit abbreviations.
    Units,
    /// Launch the interactive TUI.
    ///
    /// This uses the same dashboard pipeline as `cmo table`, but renders the
    /// table and charts in a terminal UI using Ratatui.
    Tui(DataArgs),
}

/// Data source and windowing options shared by every data-backed command.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Read the monthly sheet from a local CSV file.
    #[arg(long, value_name = "CSV", conflicts_with_all = ["url", "demo"])]
    pub file: Option<PathBuf>,

    /// Download the monthly sheet (CSV) from this URL.
    #[arg(long, conflicts_with = "demo")]
    pub url: Option<String>,

    /// Use seeded synthetic prices instead of the published sheet.
    #[arg(long, value_name = "SEED", num_args = 0..=1, default_missing_value = "42")]
    pub demo: Option<u64>,

    /// First calendar year kept from the history.
    #[arg(long, default_value_t = DEFAULT_HISTORY_START_YEAR)]
    pub history_start: i32,

    /// Trailing months used for the summary table (at least 13).
    #[arg(long, default_value_t = DEFAULT_TABLE_MONTHS)]
    pub months: usize,

    /// JSON group schema replacing the built-in grouping.
    #[arg(long, value_name = "JSON")]
    pub schema: Option<PathBuf>,

    /// Column to drop from the sheet (repeatable; replaces the default list).
    #[arg(long = "drop", value_name = "COLUMN")]
    pub drop: Vec<String>,
}

/// Options for the detail charts.
#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Commodity name as it appears in the sheet (e.g. "Crude oil, Brent").
    pub commodity: String,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Options for the group comparison chart.
#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Commodity group.
    #[arg(value_enum)]
    pub group: CommodityGroup,

    /// Highlighted member of the group.
    pub commodity: String,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// How chart commands emit their charts.
#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Render the chart(s) as ASCII plots instead of JSON.
    #[arg(long)]
    pub ascii: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Write the chart JSON to a file instead of stdout.
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}

/// Options for the CSV export.
#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output path.
    #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
    pub out: PathBuf,
}
