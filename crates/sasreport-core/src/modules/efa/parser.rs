//! Line-oriented parser for factor-analysis result files.
//!
//! The deconvolution tool writes comma-separated tables separated by literal
//! marker lines. Each section's data rows start two lines after its marker
//! (the marker itself plus a column-header row) and stop one line before the
//! next marker. A missing marker yields an empty section and an unparseable
//! row is skipped, so partial or truncated files still produce usable output.

use std::fs;
use std::path::Path;

use crate::domain::{ReportError, ReportResult};

const CONCENTRATION_MARKER: &str = "Concentration Matrix";
const ROTATION_CHI_MARKER: &str = "Rotation Chi^2";
const FORWARD_MARKER: &str = "Forward EFA Results";
const BACKWARD_MARKER: &str = "Backward EFA Results";
const SINGULAR_VALUE_MARKER: &str = "Singular Value Results";

/// The four data sections of a factor-analysis results file. The singular
/// value marker only terminates the backward section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EfaFileSections {
    pub frames: Vec<i64>,
    pub concentrations: Vec<Vec<f64>>,
    pub rotation_chi_sq: Vec<f64>,
    pub forward: Vec<Vec<f64>>,
    pub backward: Vec<Vec<f64>>,
}

impl EfaFileSections {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
            && self.concentrations.is_empty()
            && self.rotation_chi_sq.is_empty()
            && self.forward.is_empty()
            && self.backward.is_empty()
    }
}

pub fn read_efa_results(path: &Path) -> ReportResult<EfaFileSections> {
    let text = fs::read_to_string(path).map_err(|err| {
        ReportError::io_system(
            "IO.EFA_READ",
            format!(
                "failed to read factor-analysis results '{}': {}",
                path.display(),
                err
            ),
        )
    })?;

    Ok(parse_efa_results(&text))
}

pub fn parse_efa_results(text: &str) -> EfaFileSections {
    let lines: Vec<&str> = text.lines().collect();

    let conc_idx = find_marker(&lines, CONCENTRATION_MARKER);
    let chi_idx = find_marker(&lines, ROTATION_CHI_MARKER);
    let fwd_idx = find_marker(&lines, FORWARD_MARKER);
    let bck_idx = find_marker(&lines, BACKWARD_MARKER);
    let svd_idx = find_marker(&lines, SINGULAR_VALUE_MARKER);

    let mut sections = EfaFileSections::default();

    for line in section(&lines, conc_idx, chi_idx) {
        if let Some((frame, row)) = parse_frame_row(line) {
            sections.frames.push(frame);
            sections.concentrations.push(row);
        }
    }

    for line in section(&lines, chi_idx, fwd_idx) {
        let value = line
            .split(',')
            .nth(1)
            .and_then(|field| field.trim().parse().ok());
        if let Some(value) = value {
            sections.rotation_chi_sq.push(value);
        }
    }

    for line in section(&lines, fwd_idx, bck_idx) {
        if let Some((_, row)) = parse_frame_row(line) {
            sections.forward.push(row);
        }
    }

    for line in section(&lines, bck_idx, svd_idx) {
        if let Some((_, row)) = parse_frame_row(line) {
            sections.backward.push(row);
        }
    }

    sections
}

fn find_marker(lines: &[&str], marker: &str) -> Option<usize> {
    lines.iter().position(|line| line.contains(marker))
}

fn section<'a>(lines: &'a [&'a str], start: Option<usize>, end: Option<usize>) -> &'a [&'a str] {
    let (Some(start), Some(end)) = (start, end) else {
        return &[];
    };

    let lo = start + 2;
    let hi = end.saturating_sub(1).min(lines.len());
    if lo >= hi {
        return &[];
    }

    &lines[lo..hi]
}

/// Splits a comma-separated row into its leading frame index and the
/// remaining float fields. The frame column is written as a float and
/// truncated here. Returns `None` if any field fails to parse.
fn parse_frame_row(line: &str) -> Option<(i64, Vec<f64>)> {
    let mut fields = line.split(',');

    let frame = fields
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())? as i64;

    let mut row = Vec::new();
    for field in fields {
        row.push(field.trim().parse().ok()?);
    }

    Some((frame, row))
}
