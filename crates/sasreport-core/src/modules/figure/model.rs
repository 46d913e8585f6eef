//! Renderer-independent figure instructions.
//!
//! Builders translate records into a [`FigureSpec`] made of a small fixed
//! instruction set: line/point series, reference lines, shaded spans, range
//! markers, an optional secondary axis, and an optional residual strip. The
//! bitmap renderer executes these without knowing anything about the
//! records, and panel-construction logic is testable without a graphics
//! stack.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Marker color for per-frame calculated values on a single series.
pub const CALC_RED: Rgb = Rgb::new(0xD7, 0x19, 0x1C);
/// Shading for buffer frame ranges.
pub const BUFFER_GREEN: Rgb = Rgb::new(0x2C, 0xA0, 0x2C);
/// Shading for sample frame ranges.
pub const SAMPLE_PURPLE: Rgb = Rgb::new(0xB8, 0x79, 0xCB);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
/// 60% gray, used for fit extrapolations and guide lines.
pub const DIM_GRAY: Rgb = Rgb::new(0x99, 0x99, 0x99);

/// Either a fixed color or the n-th entry of the renderer's color cycle.
/// Cycle indices keep one record's color consistent across panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    Cycle(usize),
    Fixed(Rgb),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    /// Unconnected markers with the given radius in pixels.
    Points { size: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub points: Vec<(f64, f64)>,
    pub color: SeriesColor,
    pub style: LineStyle,
    /// Legend entry; `None` keeps the trace out of the legend.
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefLine {
    Horizontal { y: f64, color: Rgb, dashed: bool },
    Vertical { x: f64, color: Rgb, dashed: bool },
}

/// Vertical band shaded across the full panel height at half opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedSpan {
    pub from: f64,
    pub to: f64,
    pub color: Rgb,
}

/// Marks a data range on the x axis: dashed vertical lines at `from` and
/// `to` rising to `height_fraction` of the panel height, joined there by a
/// double-headed horizontal arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeMarker {
    pub from: f64,
    pub to: f64,
    pub height_fraction: f64,
    pub color: SeriesColor,
}

/// Additional series drawn against a second y axis on the right side.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryAxis {
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

/// Narrow strip below the main panel sharing its x axis, with a zero line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualStrip {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub row: usize,
    pub column: usize,
    pub spans_row: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub slot: GridSlot,
    pub letter: Option<char>,
    pub x_label: String,
    pub y_label: String,
    pub log_y: bool,
    pub series: Vec<LineSeries>,
    pub ref_lines: Vec<RefLine>,
    pub spans: Vec<ShadedSpan>,
    pub range_markers: Vec<RangeMarker>,
    pub secondary: Option<SecondaryAxis>,
    pub residuals: Option<ResidualStrip>,
    pub show_legend: bool,
    /// `(floor, cap)`: the natural y range is clamped to start no lower than
    /// `floor` and end no higher than `cap`.
    pub y_clamp: Option<(f64, f64)>,
    pub hide_y_tick_labels: bool,
}

impl PanelSpec {
    pub fn new(slot: GridSlot) -> Self {
        Self {
            slot,
            letter: None,
            x_label: String::new(),
            y_label: String::new(),
            log_y: false,
            series: Vec::new(),
            ref_lines: Vec::new(),
            spans: Vec::new(),
            range_markers: Vec::new(),
            secondary: None,
            residuals: None,
            show_legend: false,
            y_clamp: None,
            hide_y_tick_labels: false,
        }
    }
}

/// A complete figure: a two-column grid of panels plus its physical size.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    pub width_in: f64,
    pub height_in: f64,
    pub rows: usize,
    pub panels: Vec<PanelSpec>,
}
