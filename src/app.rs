//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data source and builds the dashboard context
//! - prints tables, chart JSON or ASCII plots
//! - writes exports

use std::io::Write;

use clap::Parser;

use crate::chart::ChartSpec;
use crate::cli::{ChartArgs, Command, DataArgs, ExportArgs, GroupArgs, RenderArgs};
use crate::data::{SourceArgs, resolve_source};
use crate::domain::{DEFAULT_DROPPED_COLUMNS, DashboardConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `cmo` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // `cmo` and `cmo --demo` behave like `cmo tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Table(args) => handle_table(args),
        Command::Chart(args) => handle_chart(args),
        Command::Group(args) => handle_group(args),
        Command::Groups(args) => handle_groups(args),
        Command::Export(args) => handle_export(args),
        Command::Units => {
            print!("{}", crate::report::format_units_legend());
            Ok(())
        }
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_table(args: DataArgs) -> Result<(), AppError> {
    let ctx = pipeline::build_context(config_from_args(&args))?;
    print!("{}", crate::report::format_run_summary(&ctx));
    print!("{}", crate::report::format_summary_table(&ctx.summary));
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let ctx = pipeline::build_context(config_from_args(&args.data))?;
    let (area, change) = pipeline::detail_charts(&ctx, &args.commodity)?;
    emit_charts(&[&area, &change], &args.render)
}

fn handle_group(args: GroupArgs) -> Result<(), AppError> {
    let ctx = pipeline::build_context(config_from_args(&args.data))?;
    let chart = pipeline::group_chart(&ctx, args.group, &args.commodity)?;
    emit_charts(&[&chart], &args.render)
}

fn handle_groups(args: DataArgs) -> Result<(), AppError> {
    let ctx = pipeline::build_context(config_from_args(&args))?;
    print!("{}", crate::report::format_groups(&ctx.groups));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let ctx = pipeline::build_context(config_from_args(&args.data))?;
    crate::io::write_summary_csv(&args.out, &ctx.summary)?;
    println!("Wrote {} rows to {}", ctx.summary.rows.len(), args.out.display());
    Ok(())
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    // Loading happens before the terminal switches to the alternate screen so
    // source errors print normally.
    let ctx = pipeline::build_context(config_from_args(&args))?;
    crate::tui::run(ctx)
}

fn emit_charts(charts: &[&ChartSpec], render: &RenderArgs) -> Result<(), AppError> {
    if render.ascii {
        for chart in charts {
            println!("{}", crate::plot::render_chart(chart, render.width, render.height));
        }
        return Ok(());
    }

    match &render.out {
        Some(path) => {
            crate::io::write_charts_json(path, charts)?;
            println!("Wrote {} chart(s) to {}", charts.len(), path.display());
        }
        None => {
            let json = crate::io::charts_to_json(charts)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")
                .map_err(|e| AppError::runtime(format!("Failed to write output: {e}")))?;
        }
    }
    Ok(())
}

pub fn config_from_args(args: &DataArgs) -> DashboardConfig {
    let source = resolve_source(&SourceArgs {
        file: args.file.clone(),
        url: args.url.clone(),
        demo_seed: args.demo,
    });
    let dropped_columns = if args.drop.is_empty() {
        DEFAULT_DROPPED_COLUMNS.iter().map(|s| s.to_string()).collect()
    } else {
        args.drop.clone()
    };

    DashboardConfig {
        source,
        history_start_year: args.history_start,
        table_months: args.months,
        dropped_columns,
        schema_path: args.schema.clone(),
    }
}

/// Rewrite argv so `cmo` defaults to `cmo tui`.
///
/// Rules:
/// - `cmo`                      -> `cmo tui`
/// - `cmo --demo ...`           -> `cmo tui --demo ...`
/// - `cmo --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "table" | "chart" | "group" | "groups" | "export" | "units" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataSource;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["cmo"])), argv(&["cmo", "tui"]));
        assert_eq!(rewrite_args(argv(&["cmo", "--demo"])), argv(&["cmo", "tui", "--demo"]));
        assert_eq!(rewrite_args(argv(&["cmo", "--help"])), argv(&["cmo", "--help"]));
        assert_eq!(rewrite_args(argv(&["cmo", "units"])), argv(&["cmo", "units"]));
    }

    #[test]
    fn config_takes_flags_and_default_drops() {
        let cli = crate::cli::Cli::parse_from(["cmo", "table", "--demo", "5", "--months", "24"]);
        let Command::Table(args) = cli.command else {
            panic!("expected table");
        };
        let config = config_from_args(&args);
        assert_eq!(config.source, DataSource::Demo { seed: 5 });
        assert_eq!(config.table_months, 24);
        assert_eq!(config.dropped_columns.len(), DEFAULT_DROPPED_COLUMNS.len());
    }

    #[test]
    fn explicit_drops_replace_defaults() {
        let cli = crate::cli::Cli::parse_from(["cmo", "groups", "--drop", "Barley", "--demo"]);
        let Command::Groups(args) = cli.command else {
            panic!("expected groups");
        };
        assert_eq!(config_from_args(&args).dropped_columns, ["Barley"]);
    }
}
