//! Ratatui-based terminal UI.
//!
//! The main view is the commodity summary table (sortable, filterable). Enter
//! opens the detail charts of the selected commodity; `g` opens the comparison
//! chart of its group.

use std::cmp::Ordering;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};

use crate::app::pipeline::{DashboardContext, detail_charts, group_chart};
use crate::chart::style::change_color;
use crate::chart::{ChartSpec, Visibility};
use crate::domain::{ChangeSign, CommodityGroup, SummaryRow};
use crate::error::AppError;
use crate::io::{DEFAULT_EXPORT_FILE, write_summary_csv};
use crate::plot::{chart_bounds, from_day_number, sparkline_glyphs};
use crate::report::{fmt_change, fmt_price};
use crate::summary::SummaryTable;

mod plotters_chart;

use plotters_chart::{SpecChart, ratatui_color};

const SPARK_WIDTH: u16 = 13;

/// Start the TUI on a prepared dashboard.
pub fn run(ctx: DashboardContext) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(ctx);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Table ordering. Prices and changes sort descending, missing values last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Commodity,
    Price,
    MomChange,
    YoyChange,
}

impl SortKey {
    fn next(self) -> Self {
        match self {
            SortKey::Commodity => SortKey::Price,
            SortKey::Price => SortKey::MomChange,
            SortKey::MomChange => SortKey::YoyChange,
            SortKey::YoyChange => SortKey::Commodity,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SortKey::Commodity => "commodity",
            SortKey::Price => "price",
            SortKey::MomChange => "PM change",
            SortKey::YoyChange => "PY change",
        }
    }
}

enum Modal {
    Detail {
        commodity: String,
        area: ChartSpec,
        change: ChartSpec,
    },
    Group {
        group: CommodityGroup,
        commodity: String,
        chart: ChartSpec,
        show_all: bool,
    },
}

struct App {
    ctx: DashboardContext,
    sort: SortKey,
    filter: String,
    editing_filter: bool,
    selected: usize,
    modal: Option<Modal>,
    status: String,
}

impl App {
    fn new(ctx: DashboardContext) -> Self {
        let status = format!("{} commodities loaded.", ctx.summary.rows.len());
        Self {
            ctx,
            sort: SortKey::Commodity,
            filter: String::new(),
            editing_filter: false,
            selected: 0,
            modal: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_filter {
            self.handle_filter_edit(code);
            return false;
        }
        if self.modal.is_some() {
            self.handle_modal_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let n = self.visible_rows().len();
                if self.selected + 1 < n {
                    self.selected += 1;
                }
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.visible_rows().len().saturating_sub(1),
            KeyCode::Char('s') => {
                self.sort = self.sort.next();
                self.selected = 0;
                self.status = format!("sort: {}", self.sort.label());
            }
            KeyCode::Char('/') => {
                self.editing_filter = true;
                self.status =
                    "Filter: type to match commodity, unit or group. Enter to keep, Esc to clear."
                        .to_string();
            }
            KeyCode::Char('x') => {
                self.sort = SortKey::Commodity;
                self.filter.clear();
                self.selected = 0;
                self.status = "Sort and filter reset.".to_string();
            }
            KeyCode::Enter => self.open_detail(),
            KeyCode::Char('g') => self.open_group(),
            KeyCode::Char('e') => self.export_view(Path::new(DEFAULT_EXPORT_FILE)),
            _ => {}
        }
        false
    }

    fn handle_filter_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_filter = false;
                self.filter.clear();
                self.status = "Filter cleared.".to_string();
            }
            KeyCode::Enter => {
                self.editing_filter = false;
                self.status = format!("{} rows match.", self.visible_rows().len());
            }
            KeyCode::Backspace => {
                self.filter.pop();
            }
            KeyCode::Char(c) => {
                self.filter.push(c);
            }
            _ => {}
        }
        self.selected = 0;
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.modal = None;
            }
            KeyCode::Char('a') => {
                if let Some(Modal::Group { chart, show_all, .. }) = &mut self.modal {
                    *show_all = !*show_all;
                    set_members_visible(chart, *show_all);
                }
            }
            KeyCode::Left => self.cycle_group_member(-1),
            KeyCode::Right => self.cycle_group_member(1),
            _ => {}
        }
    }

    /// Rows after filtering and sorting; indices into this list are what
    /// `selected` refers to.
    fn visible_rows(&self) -> Vec<&SummaryRow> {
        visible_rows(&self.ctx, &self.filter, self.sort)
    }

    fn selected_commodity(&self) -> Option<String> {
        self.visible_rows().get(self.selected).map(|r| r.commodity.clone())
    }

    fn open_detail(&mut self) {
        let Some(commodity) = self.selected_commodity() else {
            self.status = "No commodity selected.".to_string();
            return;
        };
        match detail_charts(&self.ctx, &commodity) {
            Ok((area, change)) => {
                self.status = format!("Detail: {commodity}");
                self.modal = Some(Modal::Detail { commodity, area, change });
            }
            Err(err) => self.status = err.message().to_string(),
        }
    }

    fn open_group(&mut self) {
        let Some(commodity) = self.selected_commodity() else {
            self.status = "No commodity selected.".to_string();
            return;
        };
        let Some(group) = self.ctx.group_of(&commodity) else {
            self.status = format!("'{commodity}' is not in any group.");
            return;
        };
        self.show_group(group, commodity);
    }

    fn show_group(&mut self, group: CommodityGroup, commodity: String) {
        match group_chart(&self.ctx, group, &commodity) {
            Ok(chart) => {
                self.status = format!("{group}: {commodity}");
                self.modal = Some(Modal::Group {
                    group,
                    commodity,
                    chart,
                    show_all: false,
                });
            }
            Err(err) => self.status = err.message().to_string(),
        }
    }

    fn cycle_group_member(&mut self, delta: isize) {
        let Some(Modal::Group { group, commodity, show_all, .. }) = &self.modal else {
            return;
        };
        let (group, show_all) = (*group, *show_all);
        let Some(members) = self.ctx.groups.members(group) else {
            return;
        };
        let Some(pos) = members.iter().position(|m| m == commodity) else {
            return;
        };
        let n = members.len() as isize;
        let next = members[(pos as isize + delta).rem_euclid(n) as usize].clone();
        self.show_group(group, next);
        if let Some(Modal::Group { chart, show_all: flag, .. }) = &mut self.modal {
            *flag = show_all;
            set_members_visible(chart, show_all);
        }
    }

    fn export_view(&mut self, path: &Path) {
        let table = SummaryTable {
            as_of: self.ctx.summary.as_of,
            rows: self.visible_rows().into_iter().cloned().collect(),
        };
        self.status = match write_summary_csv(path, &table) {
            Ok(()) => format!("Exported {} rows to {}", table.rows.len(), path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.modal {
            Some(Modal::Detail { commodity, area, change }) => {
                draw_detail(frame, size, commodity, area, change)
            }
            Some(Modal::Group { group, commodity, chart, .. }) => {
                draw_group(frame, size, &self.ctx, *group, commodity, chart)
            }
            None => {}
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("cmo", Style::default().fg(Color::Cyan)),
            Span::raw(" | World Bank Commodity Price Data (The Pink Sheet)"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "as of {} | {} | source: {}",
                self.ctx.summary.as_of.format("%B %Y"),
                self.ctx.history_period(),
                self.ctx.config.source
            ),
            Style::default().fg(Color::Gray),
        )));

        let mut counts = format!(
            "{} commodities in {} groups",
            self.ctx.summary.rows.len(),
            self.ctx.groups.iter().count()
        );
        if !self.ctx.row_errors.is_empty() {
            counts.push_str(&format!(" | {} rows skipped", self.ctx.row_errors.len()));
        }
        lines.push(Line::from(Span::styled(counts, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let labels = self.ctx.summary.labels();
        let header = Row::new(vec![
            Cell::from("Commodity"),
            Cell::from("Unit"),
            Cell::from(labels.latest.clone()),
            Cell::from(labels.prev_month.clone()),
            Cell::from(labels.prev_year.clone()),
            Cell::from("PM"),
            Cell::from("PY"),
            Cell::from(labels.trend()),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.visible_rows().into_iter().map(|r| {
            Row::new(vec![
                Cell::from(r.commodity.clone()),
                Cell::from(r.unit.clone().unwrap_or_default()),
                Cell::from(fmt_price(r.price)),
                Cell::from(fmt_price(r.price_prev_month)),
                Cell::from(fmt_price(r.price_prev_year)),
                change_cell(r.mom_change),
                change_cell(r.yoy_change),
                Cell::from(Span::styled(
                    sparkline_glyphs(&r.sparkline, SPARK_WIDTH as usize),
                    Style::default().fg(Color::Gray),
                )),
            ])
        });

        let mut title = format!(" Commodity Prices | sort: {} ", self.sort.label());
        if !self.filter.is_empty() || self.editing_filter {
            let cursor = if self.editing_filter { "_" } else { "" };
            title.push_str(&format!("| filter: {}{cursor} ", self.filter));
        }

        let widths = [
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(SPARK_WIDTH.max(19)),
        ];
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if let Some(row) = self.visible_rows().get(self.selected) {
            let deltas = selection_deltas(row, &labels.prev_month, &labels.prev_year);
            block = block.title_bottom(deltas);
        }
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match &self.modal {
            Some(Modal::Group { .. }) => "←/→ member  a all members  Esc close",
            Some(Modal::Detail { .. }) => "Esc close",
            None => {
                "↑/↓ select  Enter detail  g group  s sort  / filter  x reset  e export  q quit"
            }
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Filter on commodity, unit or group label (case-insensitive), then sort.
fn visible_rows<'a>(ctx: &'a DashboardContext, filter: &str, sort: SortKey) -> Vec<&'a SummaryRow> {
    let needle = filter.trim().to_lowercase();
    let mut rows: Vec<&SummaryRow> = ctx
        .summary
        .rows
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.commodity.to_lowercase().contains(&needle)
                || r.unit.as_deref().is_some_and(|u| u.to_lowercase().contains(&needle))
                || ctx
                    .group_of(&r.commodity)
                    .is_some_and(|g| g.label().to_lowercase().contains(&needle))
        })
        .collect();

    match sort {
        SortKey::Commodity => rows.sort_by(|a, b| a.commodity.cmp(&b.commodity)),
        SortKey::Price => rows.sort_by(|a, b| descending(a.price, b.price)),
        SortKey::MomChange => rows.sort_by(|a, b| descending(a.mom_change, b.mom_change)),
        SortKey::YoyChange => rows.sort_by(|a, b| descending(a.yoy_change, b.yoy_change)),
    }
    rows
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `Gold: +12.50 vs Oct 2024 | -30.00 vs Nov 2023`
fn selection_deltas(row: &SummaryRow, prev_month: &str, prev_year: &str) -> String {
    let fmt = |d: Option<f64>| match d {
        Some(d) => format!("{}{}", if d < 0.0 { "-" } else { "+" }, fmt_price(Some(d.abs()))),
        None => "-".to_string(),
    };
    format!(
        " {}: {} vs {prev_month} | {} vs {prev_year} ",
        row.commodity,
        fmt(row.mom_delta()),
        fmt(row.yoy_delta())
    )
}

fn change_cell(v: Option<f64>) -> Cell<'static> {
    Cell::from(Span::styled(fmt_change(v), change_style(v)))
}

/// Positive and negative changes take the chart palette; neutral keeps the
/// terminal's own foreground.
fn change_style(v: Option<f64>) -> Style {
    match ChangeSign::of(v) {
        ChangeSign::Neutral => Style::default(),
        sign => Style::default().fg(ratatui_color(change_color(sign))),
    }
}

fn set_members_visible(chart: &mut ChartSpec, all: bool) {
    for trace in chart.traces.iter_mut().filter(|t| t.z_order == 0) {
        trace.visibility = if all { Visibility::Visible } else { Visibility::LegendOnly };
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_detail(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    commodity: &str,
    price: &ChartSpec,
    change: &ChartSpec,
) {
    let popup = centered_rect(90, 85, area);
    frame.render_widget(Clear, popup);
    let block = Block::default().title(format!(" {commodity} ")).borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);
    draw_spec(frame, chunks[0], price);
    draw_spec(frame, chunks[1], change);
}

fn draw_group(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    ctx: &DashboardContext,
    group: CommodityGroup,
    commodity: &str,
    chart: &ChartSpec,
) {
    let popup = centered_rect(90, 85, area);
    frame.render_widget(Clear, popup);
    let block = Block::default().title(format!(" {group} ")).borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(32)])
        .split(inner);
    draw_spec(frame, chunks[0], chart);

    let members = ctx.groups.members(group).unwrap_or(&[]);
    let mut lines: Vec<Line> = Vec::with_capacity(members.len());
    for name in members {
        let trace = chart.trace(name);
        let visible = trace.is_some_and(|t| t.is_visible());
        let color = trace
            .and_then(|t| t.line)
            .map(|l| ratatui_color(l.color))
            .unwrap_or(Color::Gray);
        let mut style = Style::default().fg(if visible { color } else { Color::DarkGray });
        if name == commodity {
            style = style.add_modifier(Modifier::BOLD);
        }
        let dot = if visible { "● " } else { "○ " };
        lines.push(Line::from(Span::styled(format!("{dot}{name}"), style)));
    }
    let legend_title = chart
        .layout
        .legend_title
        .clone()
        .unwrap_or_else(|| group.label().to_string());
    let legend = Paragraph::new(Text::from(lines))
        .block(Block::default().title(legend_title).borders(Borders::ALL));
    frame.render_widget(legend, chunks[1]);
}

/// One chart pane: titled block, plot, tick labels and annotation lines.
fn draw_spec(frame: &mut ratatui::Frame<'_>, area: Rect, spec: &ChartSpec) {
    let title = spec
        .layout
        .title
        .as_ref()
        .map(|t| match &t.subtitle {
            Some(sub) => format!(" {} | {sub} ", t.text),
            None => format!(" {} ", t.text),
        })
        .unwrap_or_default();
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let notes = spec.annotations.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(notes)])
        .split(inner);

    let Some((x_bounds, y_bounds)) = chart_bounds(spec) else {
        let msg = Paragraph::new("No data.").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    };

    let (chart_rect, insets) = chart_layout(chunks[0]);
    frame.render_widget(
        SpecChart {
            spec,
            x_bounds,
            y_bounds,
        },
        chart_rect,
    );
    if let Some(insets) = insets {
        draw_axis_ticks(frame, chunks[0], chart_rect, insets, x_bounds, y_bounds, |v| {
            fmt_axis_y(spec, v)
        });
    }

    let note_lines: Vec<Line> = spec
        .annotations
        .iter()
        .map(|a| {
            Line::from(vec![
                Span::styled(format!("{}: ", a.label), Style::default().fg(Color::Gray)),
                Span::styled(
                    a.value_text.clone(),
                    Style::default().fg(ratatui_color(a.color)).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Text::from(note_lines)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn fmt_axis_y(spec: &ChartSpec, v: f64) -> String {
    let body = match spec.layout.y_axis.tick_format {
        Some(fmt) => fmt.apply(v),
        None => format!("{v:.1}"),
    };
    format!("{body}{}", spec.layout.y_axis.tick_suffix.as_deref().unwrap_or(""))
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 1,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    fmt_y: impl Fn(f64) -> String,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = from_day_number(x_val);
        let label_len = label.chars().count() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .min((chart.x + chart.width).saturating_sub(label_len));
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_y(y_val);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}
