//! Bitmap figure rendering on top of plotters.
//!
//! Figure specs are resolution-independent; everything here is scaled from
//! typographic points to pixels by the backend DPI so a 6x4 inch figure
//! rasterizes the same at any density.

use std::path::Path;

use plotters::chart::SeriesLabelPosition;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::common::constants::FIGURE_DPI;
use crate::domain::errors::{ReportError, ReportResult};
use crate::modules::figure as spec;
use crate::render::FigureRenderer;

type DrawError = DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>;
type PanelArea<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type PanelChart<'a, 'b, Y> = ChartContext<'b, BitMapBackend<'a>, Cartesian2d<RangedCoordf64, Y>>;

/// Default line-color cycle, matching the palette the captions describe
/// (series traces start blue, deconvolution components follow in order).
const CYCLE: [RGBColor; 10] = [
    RGBColor(0x1F, 0x77, 0xB4),
    RGBColor(0xFF, 0x7F, 0x0E),
    RGBColor(0x2C, 0xA0, 0x2C),
    RGBColor(0xD6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xBD),
    RGBColor(0x8C, 0x56, 0x4B),
    RGBColor(0xE3, 0x77, 0xC2),
    RGBColor(0x7F, 0x7F, 0x7F),
    RGBColor(0xBC, 0xBD, 0x22),
    RGBColor(0x17, 0xBE, 0xCF),
];

/// Renders figure specs to PNG files.
pub struct BitmapFigureRenderer {
    dpi: u32,
}

impl BitmapFigureRenderer {
    pub fn new() -> Self {
        Self { dpi: FIGURE_DPI }
    }

    pub fn with_dpi(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl Default for BitmapFigureRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FigureRenderer for BitmapFigureRenderer {
    fn render(&self, figure: &spec::FigureSpec, path: &Path) -> ReportResult<()> {
        draw_figure(figure, path, self.dpi).map_err(|err| {
            ReportError::render(
                "RENDER.FIGURE",
                format!("failed to draw figure {}: {err}", path.display()),
            )
        })
    }
}

/// Point-to-pixel conversion for one render pass.
#[derive(Clone, Copy)]
struct Scale {
    px_per_pt: f64,
}

impl Scale {
    fn new(dpi: u32) -> Self {
        Self {
            px_per_pt: f64::from(dpi) / 72.0,
        }
    }

    fn px(self, points: f64) -> i32 {
        (points * self.px_per_pt).round().max(1.0) as i32
    }

    fn stroke(self, points: f64) -> u32 {
        self.px(points) as u32
    }

    fn font(self, points: f64) -> f64 {
        points * self.px_per_pt
    }

    /// Marker radius for a marker diameter given in points.
    fn radius(self, size: u32) -> i32 {
        self.px(f64::from(size) / 2.0)
    }
}

fn draw_figure(figure: &spec::FigureSpec, path: &Path, dpi: u32) -> Result<(), DrawError> {
    let width_px = (figure.width_in * f64::from(dpi)).round() as u32;
    let height_px = (figure.height_in * f64::from(dpi)).round() as u32;
    let scale = Scale::new(dpi);

    let root = BitMapBackend::new(path, (width_px, height_px)).into_drawing_area();
    root.fill(&WHITE)?;

    let rows = row_areas(&root, figure.rows.max(1));
    for panel in &figure.panels {
        let area = panel_area(&rows, &panel.slot);
        draw_panel(&area, panel, scale)?;
    }

    root.present()
}

fn row_areas<'a>(root: &PanelArea<'a>, rows: usize) -> Vec<PanelArea<'a>> {
    let (_, height) = root.dim_in_pixel();
    let row_height = height / rows as u32;

    let mut areas = Vec::with_capacity(rows);
    let mut rest = root.clone();
    for row in 0..rows {
        if row + 1 == rows {
            areas.push(rest.clone());
        } else {
            let (top, bottom) = rest.split_vertically(row_height);
            areas.push(top);
            rest = bottom;
        }
    }
    areas
}

fn panel_area<'a>(rows: &[PanelArea<'a>], slot: &spec::GridSlot) -> PanelArea<'a> {
    let row = &rows[slot.row.min(rows.len() - 1)];
    if slot.spans_row {
        return row.clone();
    }

    let (width, _) = row.dim_in_pixel();
    let (left, right) = row.split_horizontally(width / 2);
    if slot.column == 0 { left } else { right }
}

fn draw_panel(area: &PanelArea<'_>, panel: &spec::PanelSpec, scale: Scale) -> Result<(), DrawError> {
    if let Some(residuals) = &panel.residuals {
        // Fit panel above, residual strip below, sharing the x range.
        let (_, height) = area.dim_in_pixel();
        let main_height = (f64::from(height) / 1.3).round() as u32;
        let (main, strip) = area.split_vertically(main_height);

        let x_range = shared_x_range(panel, residuals);
        draw_chart(&main, panel, x_range, scale)?;
        draw_residual_strip(&strip, residuals, x_range, scale)?;
    } else {
        let x_range = panel_x_range(panel);
        draw_chart(area, panel, x_range, scale)?;
    }

    if let Some(letter) = panel.letter {
        let style = ("sans-serif", scale.font(12.0))
            .into_font()
            .style(FontStyle::Bold);
        area.draw(&Text::new(letter.to_string(), (scale.px(4.0), scale.px(2.0)), style))?;
    }

    Ok(())
}

fn draw_chart(
    area: &PanelArea<'_>,
    panel: &spec::PanelSpec,
    x_range: (f64, f64),
    scale: Scale,
) -> Result<(), DrawError> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(scale.px(4.0))
        .x_label_area_size(scale.px(22.0))
        .y_label_area_size(scale.px(28.0));

    if panel.log_y {
        let y_range = log_y_range(panel);
        let mut chart =
            builder.build_cartesian_2d(x_range.0..x_range.1, (y_range.0..y_range.1).log_scale())?;
        configure_panel_mesh(&mut chart, panel, scale)?;
        draw_content(&mut chart, panel, y_range, scale, true)?;
        draw_legend(&mut chart, panel, scale)?;
    } else if let Some(secondary) = &panel.secondary {
        let y_range = linear_y_range(panel);
        let y2_range = secondary_y_range(secondary);
        let mut chart = builder
            .right_y_label_area_size(scale.px(28.0))
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?
            .set_secondary_coord(x_range.0..x_range.1, y2_range.0..y2_range.1);

        configure_panel_mesh(&mut *chart, panel, scale)?;
        chart
            .configure_secondary_axes()
            .y_desc(secondary.y_label.as_str())
            .axis_desc_style(("sans-serif", scale.font(9.0)))
            .label_style(("sans-serif", scale.font(8.0)))
            .draw()?;
        draw_content(&mut *chart, panel, y_range, scale, false)?;

        for series in &secondary.series {
            let color = series_color(&series.color);
            let points = drawable_points(series, false);
            let radius = match series.style {
                spec::LineStyle::Points { size } => scale.radius(size),
                _ => scale.radius(1),
            };
            let anno = chart.draw_secondary_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, radius, color.filled())),
            )?;
            if panel.show_legend
                && let Some(label) = &series.label
            {
                anno.label(label).legend(legend_line(color, scale));
            }
        }

        draw_legend(&mut *chart, panel, scale)?;
    } else {
        let y_range = linear_y_range(panel);
        let mut chart = builder.build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
        configure_panel_mesh(&mut chart, panel, scale)?;
        draw_content(&mut chart, panel, y_range, scale, false)?;
        draw_legend(&mut chart, panel, scale)?;
    }

    Ok(())
}

fn configure_panel_mesh<Y>(
    chart: &mut PanelChart<'_, '_, Y>,
    panel: &spec::PanelSpec,
    scale: Scale,
) -> Result<(), DrawError>
where
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let empty_labels = |_: &f64| String::new();

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .disable_y_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .axis_desc_style(("sans-serif", scale.font(9.0)))
        .label_style(("sans-serif", scale.font(8.0)));
    if panel.hide_y_tick_labels {
        mesh.y_label_formatter(&empty_labels);
    }
    mesh.draw()?;
    Ok(())
}

fn draw_content<Y>(
    chart: &mut PanelChart<'_, '_, Y>,
    panel: &spec::PanelSpec,
    y_range: (f64, f64),
    scale: Scale,
    positive_only: bool,
) -> Result<(), DrawError>
where
    Y: Ranged<ValueType = f64>,
{
    for span in &panel.spans {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(span.from, y_range.0), (span.to, y_range.1)],
            rgb(span.color).mix(0.5).filled(),
        )))?;
    }

    for line in &panel.ref_lines {
        let (points, color, dashed) = match *line {
            spec::RefLine::Horizontal { y, color, dashed } => {
                let x = chart.x_range();
                (vec![(x.start, y), (x.end, y)], color, dashed)
            }
            spec::RefLine::Vertical { x, color, dashed } => {
                (vec![(x, y_range.0), (x, y_range.1)], color, dashed)
            }
        };
        draw_line(chart, points, rgb(color).to_rgba(), dashed, scale)?;
    }

    for series in &panel.series {
        let color = series_color(&series.color);
        let points = drawable_points(series, positive_only);
        let label = if panel.show_legend {
            series.label.as_deref()
        } else {
            None
        };

        match series.style {
            spec::LineStyle::Solid => {
                let anno = chart.draw_series(LineSeries::new(
                    points,
                    color.stroke_width(scale.stroke(1.0)),
                ))?;
                if let Some(label) = label {
                    anno.label(label).legend(legend_line(color, scale));
                }
            }
            spec::LineStyle::Dashed => {
                let anno = chart.draw_series(DashedLineSeries::new(
                    points,
                    scale.px(4.0),
                    scale.px(3.0),
                    color.stroke_width(scale.stroke(1.0)),
                ))?;
                if let Some(label) = label {
                    anno.label(label).legend(legend_line(color, scale));
                }
            }
            spec::LineStyle::Points { size } => {
                let radius = scale.radius(size);
                let anno = chart.draw_series(
                    points
                        .into_iter()
                        .map(|point| Circle::new(point, radius, color.filled())),
                )?;
                if let Some(label) = label {
                    anno.label(label).legend(legend_line(color, scale));
                }
            }
        }
    }

    for marker in &panel.range_markers {
        let color = series_color(&marker.color);
        let y = y_range.0 + marker.height_fraction * (y_range.1 - y_range.0);

        draw_line(
            chart,
            vec![(marker.from, y_range.0), (marker.from, y)],
            color,
            true,
            scale,
        )?;
        draw_line(
            chart,
            vec![(marker.to, y_range.0), (marker.to, y)],
            color,
            true,
            scale,
        )?;
        draw_line(chart, vec![(marker.from, y), (marker.to, y)], color, false, scale)?;
    }

    Ok(())
}

fn draw_line<Y>(
    chart: &mut PanelChart<'_, '_, Y>,
    points: Vec<(f64, f64)>,
    color: RGBAColor,
    dashed: bool,
    scale: Scale,
) -> Result<(), DrawError>
where
    Y: Ranged<ValueType = f64>,
{
    let style = color.stroke_width(scale.stroke(1.0));
    if dashed {
        chart.draw_series(DashedLineSeries::new(points, scale.px(4.0), scale.px(3.0), style))?;
    } else {
        chart.draw_series(LineSeries::new(points, style))?;
    }
    Ok(())
}

fn draw_legend<'a, 'b, Y>(
    chart: &mut PanelChart<'a, 'b, Y>,
    panel: &spec::PanelSpec,
    scale: Scale,
) -> Result<(), DrawError>
where
    'a: 'b,
    Y: Ranged<ValueType = f64>,
{
    if !panel.show_legend {
        return Ok(());
    }

    let labeled = panel.series.iter().any(|s| s.label.is_some())
        || panel
            .secondary
            .as_ref()
            .is_some_and(|axis| axis.series.iter().any(|s| s.label.is_some()));
    if !labeled {
        return Ok(());
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", scale.font(8.0)))
        .draw()?;
    Ok(())
}

fn draw_residual_strip(
    area: &PanelArea<'_>,
    strip: &spec::ResidualStrip,
    x_range: (f64, f64),
    scale: Scale,
) -> Result<(), DrawError> {
    let y_range = residual_y_range(strip);

    let mut chart = ChartBuilder::on(area)
        .margin(scale.px(4.0))
        .x_label_area_size(scale.px(22.0))
        .y_label_area_size(scale.px(28.0))
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(strip.x_label.as_str())
        .y_desc(strip.y_label.as_str())
        .axis_desc_style(("sans-serif", scale.font(9.0)))
        .label_style(("sans-serif", scale.font(8.0)))
        .draw()?;

    chart.draw_series(LineSeries::new(
        vec![(x_range.0, 0.0), (x_range.1, 0.0)],
        BLACK.stroke_width(scale.stroke(1.0)),
    ))?;

    for series in &strip.series {
        let color = series_color(&series.color);
        let radius = match series.style {
            spec::LineStyle::Points { size } => scale.radius(size),
            _ => scale.radius(3),
        };
        chart.draw_series(
            drawable_points(series, false)
                .into_iter()
                .map(|point| Circle::new(point, radius, color.filled())),
        )?;
    }

    Ok(())
}

fn rgb(color: spec::Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn series_color(color: &spec::SeriesColor) -> RGBAColor {
    match color {
        spec::SeriesColor::Cycle(index) => CYCLE[index % CYCLE.len()].to_rgba(),
        spec::SeriesColor::Fixed(fixed) => rgb(*fixed).to_rgba(),
    }
}

fn legend_line(color: RGBAColor, scale: Scale) -> impl Fn((i32, i32)) -> PathElement<(i32, i32)> {
    let length = scale.px(10.0);
    move |(x, y)| PathElement::new(vec![(x, y), (x + length, y)], color)
}

fn drawable_points(series: &spec::LineSeries, positive_only: bool) -> Vec<(f64, f64)> {
    series
        .points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && (!positive_only || *y > 0.0))
        .copied()
        .collect()
}

fn finite_points<'a>(
    series: impl IntoIterator<Item = &'a spec::LineSeries>,
) -> impl Iterator<Item = (f64, f64)> {
    series
        .into_iter()
        .flat_map(|s| s.points.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .copied()
}

fn pad_range(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * fraction;
    (lo - pad, hi + pad)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
}

fn panel_x_range(panel: &spec::PanelSpec) -> (f64, f64) {
    let points = finite_points(&panel.series).map(|(x, _)| x);
    let spans = panel
        .spans
        .iter()
        .flat_map(|span| [span.from, span.to])
        .chain(
            panel
                .range_markers
                .iter()
                .flat_map(|marker| [marker.from, marker.to]),
        );
    let secondary = panel
        .secondary
        .iter()
        .flat_map(|axis| finite_points(&axis.series).map(|(x, _)| x));

    match min_max(points.chain(spans).chain(secondary)) {
        Some((lo, hi)) => pad_range(lo, hi, 0.015),
        None => (0.0, 1.0),
    }
}

fn shared_x_range(panel: &spec::PanelSpec, residuals: &spec::ResidualStrip) -> (f64, f64) {
    let panel_points = finite_points(&panel.series).map(|(x, _)| x);
    let strip_points = finite_points(&residuals.series).map(|(x, _)| x);

    match min_max(panel_points.chain(strip_points)) {
        Some((lo, hi)) => pad_range(lo, hi, 0.015),
        None => (0.0, 1.0),
    }
}

fn linear_y_range(panel: &spec::PanelSpec) -> (f64, f64) {
    let (mut lo, mut hi) = match min_max(finite_points(&panel.series).map(|(_, y)| y)) {
        Some(bounds) => pad_range(bounds.0, bounds.1, 0.02),
        None => (0.0, 1.0),
    };

    if let Some((floor, cap)) = panel.y_clamp {
        lo = lo.max(floor);
        hi = hi.min(cap);
        if lo >= hi {
            hi = lo + 1.0;
        }
    }

    (lo, hi)
}

fn log_y_range(panel: &spec::PanelSpec) -> (f64, f64) {
    let positive = finite_points(&panel.series)
        .map(|(_, y)| y)
        .filter(|y| *y > 0.0);

    match min_max(positive) {
        Some((lo, hi)) => (lo / 1.2, hi * 1.2),
        None => (0.1, 1.0),
    }
}

fn secondary_y_range(axis: &spec::SecondaryAxis) -> (f64, f64) {
    match min_max(finite_points(&axis.series).map(|(_, y)| y)) {
        Some((lo, hi)) => pad_range(lo, hi, 0.02),
        None => (0.0, 1.0),
    }
}

fn residual_y_range(strip: &spec::ResidualStrip) -> (f64, f64) {
    let values = finite_points(&strip.series).map(|(_, y)| y).chain([0.0]);
    match min_max(values) {
        Some((lo, hi)) => pad_range(lo, hi, 0.05),
        None => (-1.0, 1.0),
    }
}
