//! Builders for the overview and factor-analysis figures.

mod model;

pub use model::{
    BLACK, BUFFER_GREEN, CALC_RED, DIM_GRAY, FigureSpec, GridSlot, LineSeries, LineStyle,
    PanelSpec, RangeMarker, RefLine, ResidualStrip, Rgb, SAMPLE_PURPLE, SecondaryAxis,
    SeriesColor, ShadedSpan,
};

use crate::common::constants::FIGURE_WIDTH_IN;
use crate::domain::records::{DistributionRecord, EfaAnalysis, ProfileRecord, SeriesRecord};
use crate::modules::layout::{PanelKind, PanelLayout, PanelSlot};

/// Builds the adaptive overview figure for the given layout, or `None` when
/// the layout has no panels.
pub fn overview_figure(
    layout: &PanelLayout,
    profiles: &[ProfileRecord],
    distributions: &[DistributionRecord],
    series: &[SeriesRecord],
) -> Option<FigureSpec> {
    if layout.is_empty() {
        return None;
    }

    let panels = layout
        .panels
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let grid = grid_slot(slot);
            let letter = layout.panel_letter(index);
            match slot.kind {
                PanelKind::Series => series_panel(grid, letter, series),
                PanelKind::Profile => profile_panel(grid, letter, profiles),
                PanelKind::Guinier => guinier_panel(grid, letter, profiles),
                PanelKind::Kratky => kratky_panel(grid, letter, profiles),
                PanelKind::Distribution => distribution_panel(grid, letter, distributions),
            }
        })
        .collect();

    Some(FigureSpec {
        width_in: FIGURE_WIDTH_IN,
        height_in: f64::from(layout.height_units),
        rows: layout.rows,
        panels,
    })
}

/// Builds the factor-analysis figure for one series. The two range panels
/// are always drawn; the chi-square, concentration, and component-profile
/// panels need the captured deconvolution output.
pub fn efa_figure(series: &SeriesRecord, efa: &EfaAnalysis) -> FigureSpec {
    let extra = efa.has_extra_data();

    let mut panels = vec![
        efa_series_panel(series, efa),
        efa_range_panel(series, efa),
    ];

    if extra {
        panels.push(efa_chi_panel(efa));
        panels.push(efa_concentration_panel(efa));
        panels.push(efa_profiles_panel(efa));
    }

    FigureSpec {
        width_in: FIGURE_WIDTH_IN,
        height_in: if extra { 6.0 } else { 2.0 },
        rows: if extra { 3 } else { 1 },
        panels,
    }
}

fn grid_slot(slot: &PanelSlot) -> GridSlot {
    GridSlot {
        row: slot.row,
        column: slot.column,
        spans_row: slot.spans_row,
    }
}

fn zip_points(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().zip(y).map(|(x, y)| (*x, *y)).collect()
}

/// Pairs up x/y values, keeping only strictly positive y. Used for per-frame
/// calculated traces where zero marks frames without a value.
fn positive_pairs(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter(|(_, y)| **y > 0.0)
        .map(|(x, y)| (*x, *y))
        .collect()
}

fn intensity_label(profiles: &[ProfileRecord]) -> String {
    if profiles.iter().all(|p| p.metadata.absolute_scale) {
        "Intensity [1/cm]".to_string()
    } else {
        "Intensity [Arb.]".to_string()
    }
}

fn guinier_fit(q: f64, rg: f64, i0: f64) -> f64 {
    i0 * (-rg * rg * q * q / 3.0).exp()
}

/// Clamps the inclusive fit window `[n_min, n_max]` to `[start, end)` array
/// bounds.
fn fit_window(n_min: i64, n_max: i64, len: usize) -> (usize, usize) {
    let end = (n_max + 1).clamp(0, len as i64) as usize;
    let start = n_min.clamp(0, end as i64) as usize;
    (start, end)
}

fn series_panel(slot: GridSlot, letter: Option<char>, series: &[SeriesRecord]) -> PanelSpec {
    let mut panel = PanelSpec::new(slot);
    panel.letter = letter;
    panel.x_label = "Frames".to_string();
    panel.y_label = "Total Intensity [Arb.]".to_string();
    panel.show_legend = series.len() > 1;

    let mut calc_series = Vec::new();

    for (index, record) in series.iter().enumerate() {
        panel.series.push(LineSeries {
            points: zip_points(&record.frames, &record.total_i),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Solid,
            label: Some(record.filename.clone()),
        });

        if record.has_calc_data {
            let color = if series.len() == 1 {
                SeriesColor::Fixed(CALC_RED)
            } else {
                SeriesColor::Cycle(index)
            };

            calc_series.push(LineSeries {
                points: positive_pairs(&record.frames, &record.rg),
                color,
                style: LineStyle::Points { size: 1 },
                label: Some(format!("{} Rg", record.filename)),
            });
        }
    }

    // Buffer/sample shading only reads cleanly for a single series.
    if let [record] = series {
        for &(lo, hi) in &record.buffer_range {
            panel.spans.push(ShadedSpan {
                from: lo as f64,
                to: hi as f64,
                color: BUFFER_GREEN,
            });
        }
        for &(lo, hi) in &record.sample_range {
            panel.spans.push(ShadedSpan {
                from: lo as f64,
                to: hi as f64,
                color: SAMPLE_PURPLE,
            });
        }
    }

    if !calc_series.is_empty() {
        panel.secondary = Some(SecondaryAxis {
            y_label: "Rg [A]".to_string(),
            series: calc_series,
        });
    }

    panel
}

fn profile_panel(slot: GridSlot, letter: Option<char>, profiles: &[ProfileRecord]) -> PanelSpec {
    let mut panel = PanelSpec::new(slot);
    panel.letter = letter;
    panel.log_y = true;
    panel.x_label = "q [1/A]".to_string();
    panel.y_label = intensity_label(profiles);
    panel.show_legend = profiles.len() > 1;

    for (index, profile) in profiles.iter().enumerate() {
        panel.series.push(LineSeries {
            points: zip_points(&profile.q, &profile.i),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Solid,
            label: Some(profile.filename.clone()),
        });
    }

    panel
}

fn guinier_panel(slot: GridSlot, letter: Option<char>, profiles: &[ProfileRecord]) -> PanelSpec {
    let mut panel = PanelSpec::new(slot);
    panel.letter = letter;
    panel.log_y = true;
    panel.y_label = intensity_label(profiles);
    panel.show_legend = profiles.len() > 1;

    let mut residual_series = Vec::new();

    for (index, profile) in profiles.iter().enumerate() {
        let guinier = &profile.guinier;
        if !guinier.has_fit() {
            continue;
        }

        let (start, end) = fit_window(guinier.n_min, guinier.n_max, profile.q.len());

        let fit: Vec<f64> = profile
            .q
            .iter()
            .map(|&q| guinier_fit(q, guinier.rg, guinier.i0))
            .collect();

        // Measured points over the full low-q region up to the fit end.
        panel.series.push(LineSeries {
            points: (0..end)
                .map(|j| (profile.q[j] * profile.q[j], profile.i[j]))
                .collect(),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Points { size: 3 },
            label: Some(profile.filename.clone()),
        });

        panel.series.push(LineSeries {
            points: (start..end)
                .map(|j| (profile.q[j] * profile.q[j], fit[j]))
                .collect(),
            color: SeriesColor::Fixed(BLACK),
            style: LineStyle::Solid,
            label: None,
        });

        // Extrapolation of the fit below the first fitted point.
        if start > 0 {
            panel.series.push(LineSeries {
                points: (0..start)
                    .map(|j| (profile.q[j] * profile.q[j], fit[j]))
                    .collect(),
                color: SeriesColor::Fixed(DIM_GRAY),
                style: LineStyle::Dashed,
                label: None,
            });
        }

        residual_series.push(LineSeries {
            points: (start..end)
                .filter_map(|j| {
                    let res = (profile.i[j] - fit[j]) / profile.err[j];
                    res.is_finite()
                        .then(|| (profile.q[j] * profile.q[j], res))
                })
                .collect(),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Points { size: 3 },
            label: None,
        });
    }

    panel.residuals = Some(ResidualStrip {
        x_label: "q^2 [1/A^2]".to_string(),
        y_label: "dI/sigma".to_string(),
        series: residual_series,
    });

    panel
}

fn kratky_panel(slot: GridSlot, letter: Option<char>, profiles: &[ProfileRecord]) -> PanelSpec {
    let mut panel = PanelSpec::new(slot);
    panel.letter = letter;
    panel.x_label = "qRg".to_string();
    panel.y_label = "(qRg)^2 I(q)/I(0)".to_string();
    panel.show_legend = profiles.len() > 1;
    panel.y_clamp = Some((-0.1, 3.0));

    // A globular particle peaks at qRg = sqrt(3), height 3/e.
    panel.ref_lines.push(RefLine::Vertical {
        x: 3f64.sqrt(),
        color: DIM_GRAY,
        dashed: true,
    });
    panel.ref_lines.push(RefLine::Horizontal {
        y: 3.0 / std::f64::consts::E,
        color: DIM_GRAY,
        dashed: true,
    });
    panel.ref_lines.push(RefLine::Horizontal {
        y: 0.0,
        color: BLACK,
        dashed: false,
    });

    for (index, profile) in profiles.iter().enumerate() {
        let guinier = &profile.guinier;
        if !guinier.has_fit() || guinier.i0 <= 0.0 {
            continue;
        }

        panel.series.push(LineSeries {
            points: profile
                .q
                .iter()
                .zip(&profile.i)
                .map(|(&q, &i)| {
                    let q_rg = q * guinier.rg;
                    (q_rg, q_rg * q_rg * i / guinier.i0)
                })
                .collect(),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Solid,
            label: Some(profile.filename.clone()),
        });
    }

    panel
}

fn distribution_panel(
    slot: GridSlot,
    letter: Option<char>,
    distributions: &[DistributionRecord],
) -> PanelSpec {
    let mut panel = PanelSpec::new(slot);
    panel.letter = letter;
    panel.x_label = "r [A]".to_string();
    panel.y_label = "P(r)/I(0)".to_string();
    panel.show_legend = distributions.len() > 1;

    panel.ref_lines.push(RefLine::Horizontal {
        y: 0.0,
        color: BLACK,
        dashed: false,
    });

    for (index, distribution) in distributions.iter().enumerate() {
        panel.series.push(LineSeries {
            points: zip_points(&distribution.r, &distribution.p),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Solid,
            label: Some(distribution.filename.clone()),
        });
    }

    panel
}

/// Index window `[start, end)` for the frames selected for deconvolution.
fn efa_index_window(efa: &EfaAnalysis, len: usize) -> (usize, usize) {
    let end = (efa.frame_end + 1).clamp(0, len as i64) as usize;
    let start = efa.frame_start.clamp(0, end as i64) as usize;
    (start, end)
}

fn efa_series_panel(series: &SeriesRecord, efa: &EfaAnalysis) -> PanelSpec {
    let mut panel = PanelSpec::new(GridSlot {
        row: 0,
        column: 0,
        spans_row: false,
    });
    panel.letter = Some('a');
    panel.x_label = "Frames".to_string();
    panel.y_label = "Total Intensity [Arb.]".to_string();

    panel.series.push(LineSeries {
        points: zip_points(&series.frames, &series.total_i),
        color: SeriesColor::Cycle(0),
        style: LineStyle::Solid,
        label: Some(series.filename.clone()),
    });

    let (start, end) = efa_index_window(efa, series.frames.len());
    panel.series.push(LineSeries {
        points: zip_points(&series.frames[start..end], &series.total_i[start..end]),
        color: SeriesColor::Fixed(BLACK),
        style: LineStyle::Solid,
        label: None,
    });

    if series.has_calc_data {
        panel.secondary = Some(SecondaryAxis {
            y_label: "Rg [A]".to_string(),
            series: vec![LineSeries {
                points: positive_pairs(&series.frames, &series.rg),
                color: SeriesColor::Fixed(CALC_RED),
                style: LineStyle::Points { size: 1 },
                label: Some(format!("{} Rg", series.filename)),
            }],
        });
    }

    panel
}

fn efa_range_panel(series: &SeriesRecord, efa: &EfaAnalysis) -> PanelSpec {
    let mut panel = PanelSpec::new(GridSlot {
        row: 0,
        column: 1,
        spans_row: false,
    });
    panel.letter = Some('b');
    panel.x_label = "Frames".to_string();
    panel.y_label = "Total Intensity [Arb.]".to_string();
    panel.hide_y_tick_labels = true;

    let (start, end) = efa_index_window(efa, series.frames.len());
    panel.series.push(LineSeries {
        points: zip_points(&series.frames[start..end], &series.total_i[start..end]),
        color: SeriesColor::Fixed(BLACK),
        style: LineStyle::Solid,
        label: None,
    });

    for (index, &(lo, hi)) in efa.ranges.iter().enumerate() {
        panel.range_markers.push(RangeMarker {
            from: lo as f64,
            to: hi as f64,
            height_fraction: 0.975 - 0.05 * index as f64,
            color: SeriesColor::Cycle(index),
        });
    }

    panel
}

fn efa_chi_panel(efa: &EfaAnalysis) -> PanelSpec {
    let mut panel = PanelSpec::new(GridSlot {
        row: 1,
        column: 0,
        spans_row: false,
    });
    panel.letter = Some('c');
    panel.x_label = "Frames".to_string();
    panel.y_label = "Mean Chi^2".to_string();

    panel.series.push(LineSeries {
        points: efa
            .frames
            .iter()
            .zip(&efa.rotation_chi_sq)
            .map(|(&frame, &chi)| (frame as f64, chi))
            .collect(),
        color: SeriesColor::Fixed(BLACK),
        style: LineStyle::Solid,
        label: None,
    });

    panel
}

fn efa_concentration_panel(efa: &EfaAnalysis) -> PanelSpec {
    let mut panel = PanelSpec::new(GridSlot {
        row: 1,
        column: 1,
        spans_row: false,
    });
    panel.letter = Some('d');
    panel.x_label = "Frames".to_string();
    panel.y_label = "Norm. Concentration".to_string();

    let components = efa
        .concentrations
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    for component in 0..components {
        panel.series.push(LineSeries {
            points: efa
                .frames
                .iter()
                .zip(&efa.concentrations)
                .filter_map(|(&frame, row)| row.get(component).map(|&c| (frame as f64, c)))
                .collect(),
            color: SeriesColor::Cycle(component),
            style: LineStyle::Solid,
            label: None,
        });
    }

    panel
}

fn efa_profiles_panel(efa: &EfaAnalysis) -> PanelSpec {
    let mut panel = PanelSpec::new(GridSlot {
        row: 2,
        column: 0,
        spans_row: true,
    });
    panel.letter = Some('e');
    panel.log_y = true;
    panel.x_label = "q [1/A]".to_string();
    panel.y_label = "Intensity [Arb.]".to_string();

    for (index, profile) in efa.component_profiles.iter().enumerate() {
        panel.series.push(LineSeries {
            points: zip_points(&profile.q, &profile.i),
            color: SeriesColor::Cycle(index),
            style: LineStyle::Solid,
            label: None,
        });
    }

    panel
}
