//! Overview figure layout selection.
//!
//! The overview figure adapts to which record categories are present. Each
//! of the eight presence combinations maps to one fixed arrangement; the
//! match in [`PanelLayout::select`] is the single source of truth for panel
//! order, grid placement, and figure height.

/// The five overview panel types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Series,
    Profile,
    Guinier,
    Kratky,
    Distribution,
}

impl PanelKind {
    /// Caption fragment for this panel. The series fragment names the trace
    /// colors only when a single series is shown, since multi-series panels
    /// use cycled colors.
    pub fn caption_fragment(self, series_count: usize) -> &'static str {
        match self {
            PanelKind::Series => {
                if series_count == 1 {
                    "Series intensity (blue, left axis) vs. frame, and, if available, \
                     Rg vs. frame (red, right axis). Green shaded regions are buffer \
                     regions, purple shaded regions are sample regions."
                } else {
                    "Series intensity (left axis) vs. frame, and, if available, Rg vs. \
                     frame (right axis). Green shaded regions are buffer regions, \
                     purple shaded regions are sample regions."
                }
            }
            PanelKind::Profile => "Scattering profile(s) on a log-lin scale.",
            PanelKind::Guinier => "Guinier fit(s) (top) and fit residuals (bottom).",
            PanelKind::Kratky => {
                "Normalized Kratky plot. Dashed lines show where a globular system \
                 would peak."
            }
            PanelKind::Distribution => "P(r) function(s), normalized by I(0).",
        }
    }
}

/// One panel's position in the figure grid. A spanning panel occupies its
/// whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSlot {
    pub kind: PanelKind,
    pub row: usize,
    pub column: usize,
    pub spans_row: bool,
}

impl PanelSlot {
    const fn cell(kind: PanelKind, row: usize, column: usize) -> Self {
        Self {
            kind,
            row,
            column,
            spans_row: false,
        }
    }

    const fn full_row(kind: PanelKind, row: usize) -> Self {
        Self {
            kind,
            row,
            column: 0,
            spans_row: true,
        }
    }
}

/// The selected arrangement: a two-column grid with `rows` rows, drawn at
/// `height_units` inches tall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub rows: usize,
    pub height_units: u32,
    pub panels: Vec<PanelSlot>,
}

pub const LAYOUT_COLUMNS: usize = 2;

impl PanelLayout {
    pub fn select(has_profiles: bool, has_distributions: bool, has_series: bool) -> Self {
        use PanelKind::*;

        match (has_profiles, has_distributions, has_series) {
            (true, true, true) => Self {
                rows: 3,
                height_units: 6,
                panels: vec![
                    PanelSlot::full_row(Series, 0),
                    PanelSlot::cell(Profile, 1, 0),
                    PanelSlot::cell(Guinier, 1, 1),
                    PanelSlot::cell(Kratky, 2, 0),
                    PanelSlot::cell(Distribution, 2, 1),
                ],
            },
            (true, true, false) => Self {
                rows: 2,
                height_units: 4,
                panels: vec![
                    PanelSlot::cell(Profile, 0, 0),
                    PanelSlot::cell(Guinier, 0, 1),
                    PanelSlot::cell(Kratky, 1, 0),
                    PanelSlot::cell(Distribution, 1, 1),
                ],
            },
            (true, false, true) => Self {
                rows: 3,
                height_units: 6,
                panels: vec![
                    PanelSlot::full_row(Series, 0),
                    PanelSlot::full_row(Profile, 1),
                    PanelSlot::cell(Guinier, 2, 0),
                    PanelSlot::cell(Kratky, 2, 1),
                ],
            },
            (true, false, false) => Self {
                rows: 2,
                height_units: 4,
                panels: vec![
                    PanelSlot::full_row(Profile, 0),
                    PanelSlot::cell(Guinier, 1, 0),
                    PanelSlot::cell(Kratky, 1, 1),
                ],
            },
            (false, true, true) => Self {
                rows: 2,
                height_units: 4,
                panels: vec![
                    PanelSlot::full_row(Series, 0),
                    PanelSlot::full_row(Distribution, 1),
                ],
            },
            (false, false, true) => Self {
                rows: 1,
                height_units: 2,
                panels: vec![PanelSlot::full_row(Series, 0)],
            },
            (false, true, false) => Self {
                rows: 1,
                height_units: 2,
                panels: vec![PanelSlot::full_row(Distribution, 0)],
            },
            (false, false, false) => Self {
                rows: 0,
                height_units: 0,
                panels: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panel letter for in-figure labeling. Single-panel figures are left
    /// unlettered.
    pub fn panel_letter(&self, index: usize) -> Option<char> {
        if self.panels.len() > 1 {
            char::from_u32('a' as u32 + index as u32)
        } else {
            None
        }
    }

    /// Figure caption: an introductory sentence naming the data, then the
    /// fragment for each selected panel in order, lettered when more than one
    /// panel is shown.
    pub fn caption(&self, name_str: &str, series_count: usize) -> String {
        let mut caption = if name_str.is_empty() {
            "SAXS data summary figure.".to_string()
        } else {
            format!("SAXS data summary figure for {name_str}.")
        };

        for (index, slot) in self.panels.iter().enumerate() {
            let fragment = slot.kind.caption_fragment(series_count);
            match self.panel_letter(index) {
                Some(letter) => {
                    caption.push_str(&format!(" {letter}) {fragment}"));
                }
                None => {
                    caption.push(' ');
                    caption.push_str(fragment);
                }
            }
        }

        caption
    }
}
