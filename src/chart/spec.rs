//! Renderer-neutral chart description.
//!
//! A `ChartSpec` is a plain data object: traces (x/y series plus style), shapes
//! (guide lines), annotations, and layout metadata. Builders return a fresh
//! value per call; callers own it and may apply the chained `with_*` style
//! updates before serializing it to JSON or drawing it in the terminal.

use chrono::NaiveDate;
use serde::Serialize;

use crate::chart::style::{Rgba, TickFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Sparkline,
    AreaGradient,
    SignedChange,
    GroupComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub traces: Vec<Trace>,
    pub shapes: Vec<Shape>,
    pub annotations: Vec<Annotation>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            traces: Vec::new(),
            shapes: Vec::new(),
            annotations: Vec::new(),
            layout: Layout::default(),
        }
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }

    pub fn with_backgrounds(mut self, paper: Rgba, plot: Rgba) -> Self {
        self.layout.paper_background = Some(paper);
        self.layout.plot_background = Some(plot);
        self
    }

    pub fn with_y_tick_suffix(mut self, suffix: &str) -> Self {
        self.layout.y_axis.tick_suffix = Some(suffix.to_string());
        self
    }

    /// Replace the hover template of every trace.
    pub fn with_hover_template(mut self, template: &str) -> Self {
        for trace in &mut self.traces {
            trace.hover_template = Some(template.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    /// Drawn only after the user enables it from the legend.
    LegendOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    Solid,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Rgba,
    pub width: f64,
    pub dash: Dash,
}

impl LineStyle {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self { color, width, dash: Dash::Solid }
    }

    pub fn dotted(color: Rgba, width: f64) -> Self {
        Self { color, width, dash: Dash::Dot }
    }
}

/// Marker colors are either one per point or a single color for all points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub colors: Vec<Rgba>,
    pub size: f64,
}

impl MarkerStyle {
    pub fn color_for(&self, idx: usize) -> Option<Rgba> {
        match self.colors.len() {
            0 => None,
            1 => Some(self.colors[0]),
            _ => self.colors.get(idx).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub orientation: Orientation,
    pub stops: Vec<ColorStop>,
}

/// Area fill down to `y = 0`, either flat or graded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub mode: TraceMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    pub visibility: Visibility,
    pub z_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_template: Option<String>,
}

impl Trace {
    pub fn lines(name: impl Into<String>, x: Vec<NaiveDate>, y: Vec<f64>, line: LineStyle) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode: TraceMode::Lines,
            line: Some(line),
            marker: None,
            fill: None,
            visibility: Visibility::Visible,
            z_order: 0,
            hover_template: None,
        }
    }

    pub fn markers(
        name: impl Into<String>,
        x: Vec<NaiveDate>,
        y: Vec<f64>,
        marker: MarkerStyle,
    ) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode: TraceMode::Markers,
            line: None,
            marker: Some(marker),
            fill: None,
            visibility: Visibility::Visible,
            z_order: 0,
            hover_template: None,
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_hover(mut self, template: &str) -> Self {
        self.hover_template = Some(template.to_string());
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Full-width horizontal guide line.
    HLine { y: f64, line: LineStyle },
    /// Vertical guide segment from `y0` to `y1` at date `x`.
    VSegment { x: NaiveDate, y0: f64, y1: f64, line: LineStyle },
}

/// Text anchored to the right edge of the plot at height `y`.
///
/// `label` is the plain caption ("Max", "15-years trend"); `value_text` is the
/// emphasized figure drawn in `color`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub y: f64,
    pub label: String,
    pub value_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub font_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStep {
    Month,
    Year,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeButton {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub step: RangeStep,
}

impl RangeButton {
    pub fn backward(label: &str, count: u32, step: RangeStep) -> Self {
        Self {
            label: label.to_string(),
            count: Some(count),
            step,
        }
    }

    pub fn all() -> Self {
        Self {
            label: "ALL".to_string(),
            count: None,
            step: RangeStep::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSelector {
    pub buttons: Vec<RangeButton>,
    pub background: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSlider {
    /// Height of the slider as a fraction of the plot.
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[NaiveDate; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_selector: Option<RangeSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_slider: Option<RangeSlider>,
}

impl Default for XAxis {
    fn default() -> Self {
        Self {
            visible: true,
            range: None,
            range_selector: None,
            range_slider: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<TickFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_suffix: Option<String>,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            visible: true,
            tick_format: None,
            tick_suffix: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverMode {
    /// One hover label per x position across all traces.
    X,
    Closest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub show_legend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    pub margin: Margin,
    pub hover_mode: HoverMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_background: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_background: Option<Rgba>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: None,
            height: None,
            show_legend: false,
            legend_title: None,
            x_axis: XAxis::default(),
            y_axis: YAxis::default(),
            margin: Margin::default(),
            hover_mode: HoverMode::Closest,
            paper_background: None,
            plot_background: None,
        }
    }
}
