//! Factor-analysis results: file parsing and attachment to series records.

mod parser;

pub use parser::{EfaFileSections, parse_efa_results, read_efa_results};

use crate::domain::records::{EfaAnalysis, SeriesRecord};

/// Merges file-parsed deconvolution output into a series' factor-analysis
/// record, enabling the extended report panels (chi-square trace and
/// concentration profiles). A series without its own analysis namespace gets
/// a fresh record holding only the file data; empty sections leave the
/// series untouched.
pub fn attach_efa_results(series: &mut SeriesRecord, sections: &EfaFileSections) {
    if sections.is_empty() {
        return;
    }

    let efa = series.efa.get_or_insert_with(EfaAnalysis::default);

    if !sections.frames.is_empty() {
        efa.frames = sections.frames.clone();
    }
    if !sections.concentrations.is_empty() {
        efa.concentrations = sections.concentrations.clone();
    }
    if !sections.rotation_chi_sq.is_empty() {
        efa.rotation_chi_sq = sections.rotation_chi_sq.clone();
    }
}
