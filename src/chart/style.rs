//! Colors and formatting conventions shared by the chart builders.

use serde::{Serialize, Serializer};

/// An RGBA color, serialized as `#rrggbb` when opaque and `rgba(r, g, b, a)` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const GREEN: Rgba = Rgba::opaque(0, 128, 0);
pub const RED: Rgba = Rgba::opaque(255, 0, 0);
pub const CRIMSON: Rgba = Rgba::opaque(220, 20, 60);
pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
pub const GREY: Rgba = Rgba::opaque(128, 128, 128);
pub const LIGHTGREY: Rgba = Rgba::opaque(211, 211, 211);

/// Positive period-over-period change.
pub const POS_COLOR: Rgba = Rgba::new(0, 160, 0, 0.7);
/// Negative period-over-period change.
pub const NEG_COLOR: Rgba = Rgba::new(255, 0, 0, 0.7);

/// Outline of the price area chart.
pub const AREA_LINE_COLOR: Rgba = Rgba::new(31, 119, 180, 0.7);
/// Bottom, middle and top stops of the price area gradient.
pub const AREA_SCALE: [(f64, Rgba); 3] = [
    (0.0, Rgba::new(255, 255, 255, 0.1)),
    (0.5, Rgba::new(31, 119, 180, 0.2)),
    (1.0, Rgba::new(31, 119, 180, 0.5)),
];

/// Emphasized line and fill of the selected commodity in a group chart.
pub const HIGHLIGHT_LINE: Rgba = Rgba::opaque(111, 171, 212);
pub const HIGHLIGHT_FILL: Rgba = Rgba::new(31, 119, 180, 0.1);
pub const RANGE_SELECTOR_BG: Rgba = Rgba::new(31, 119, 180, 0.1);

/// Colors used for percent-change cells: positive, negative, neutral.
pub fn change_color(sign: crate::domain::ChangeSign) -> Rgba {
    match sign {
        crate::domain::ChangeSign::Positive => GREEN,
        crate::domain::ChangeSign::Negative => CRIMSON,
        crate::domain::ChangeSign::Neutral => BLACK,
    }
}

/// Y-axis tick format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// `,.1f` for small-magnitude prices.
    OneDecimal,
    /// `,.0f` for everything else.
    Integer,
}

impl TickFormat {
    pub fn d3(self) -> &'static str {
        match self {
            TickFormat::OneDecimal => ",.1f",
            TickFormat::Integer => ",.0f",
        }
    }

    /// Format a tick value the way the d3 format would.
    pub fn apply(self, v: f64) -> String {
        match self {
            TickFormat::OneDecimal => format!("{v:.1}"),
            TickFormat::Integer => format!("{v:.0}"),
        }
    }
}

impl Serialize for TickFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.d3())
    }
}

/// Currency prefix implied by a unit label (`¢/sheets` → `¢`, otherwise `$`).
pub fn currency_symbol(unit: Option<&str>) -> &'static str {
    match unit {
        Some(u) if u.starts_with('¢') || u.starts_with("cents") => "¢",
        _ => "$",
    }
}

/// Format a ratio as a signed percentage with one decimal (`0.25` → `+25.0%`).
pub fn fmt_ratio_pct(ratio: f64) -> String {
    format!("{:+.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_render_as_css() {
        assert_eq!(GREEN.to_string(), "#008000");
        assert_eq!(POS_COLOR.to_string(), "rgba(0, 160, 0, 0.7)");
        assert_eq!(serde_json::to_string(&RED).unwrap(), "\"#ff0000\"");
    }

    #[test]
    fn currency_symbol_follows_unit() {
        assert_eq!(currency_symbol(Some("¢/sheets")), "¢");
        assert_eq!(currency_symbol(Some("$/mt")), "$");
        assert_eq!(currency_symbol(None), "$");
    }

    #[test]
    fn ratio_formatting_is_signed() {
        assert_eq!(fmt_ratio_pct(1.0), "+100.0%");
        assert_eq!(fmt_ratio_pct(-0.125), "-12.5%");
        assert_eq!(TickFormat::Integer.apply(1234.6), "1235");
        assert_eq!(TickFormat::OneDecimal.d3(), ",.1f");
    }
}
