//! Deserialization of saved-analysis snapshots.
//!
//! A snapshot is a single JSON document holding the profiles, inverse
//! transforms, and series selected for a report. Free-form header content
//! stays as raw JSON maps in `parameters`; the extraction stage applies the
//! translation tables to it. Loading validates array shapes up front so the
//! downstream stages can assume consistent records.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{ReportError, ReportResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceSnapshot {
    pub profiles: Vec<ProfileSource>,
    pub ifts: Vec<IftSource>,
    pub series: Vec<SeriesSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileSource {
    pub filename: String,
    pub q: Vec<f64>,
    pub i: Vec<f64>,
    pub err: Vec<f64>,
    /// Header namespaces (`analysis`, `counters`, `calibration_params`,
    /// `metadata`, `normalizations`, `raw_version`) as raw JSON.
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IftSource {
    pub filename: String,
    pub r: Vec<f64>,
    pub p: Vec<f64>,
    pub p_err: Vec<f64>,
    pub q: Vec<f64>,
    pub i: Vec<f64>,
    pub i_err: Vec<f64>,
    pub i_fit: Vec<f64>,
    pub q_extrap: Vec<f64>,
    pub i_extrap: Vec<f64>,
    pub dmax: f64,
    pub rg: f64,
    pub i0: f64,
    pub rg_err: f64,
    pub i0_err: f64,
    pub chi_sq: f64,
    /// Inversion algorithm label, e.g. `"GNOM"` or `"BIFT"`.
    pub algorithm: String,
    pub dmax_err: f64,
    pub total_estimate: f64,
    pub quality: String,
    pub ambiguity: Option<AmbiguitySource>,
}

impl Default for IftSource {
    fn default() -> Self {
        Self {
            filename: String::new(),
            r: Vec::new(),
            p: Vec::new(),
            p_err: Vec::new(),
            q: Vec::new(),
            i: Vec::new(),
            i_err: Vec::new(),
            i_fit: Vec::new(),
            q_extrap: Vec::new(),
            i_extrap: Vec::new(),
            dmax: -1.0,
            rg: -1.0,
            i0: -1.0,
            rg_err: -1.0,
            i0_err: -1.0,
            chi_sq: -1.0,
            algorithm: String::new(),
            dmax_err: -1.0,
            total_estimate: -1.0,
            quality: String::new(),
            ambiguity: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AmbiguitySource {
    pub score: f64,
    pub categories: i64,
    pub interpretation: String,
}

impl Default for AmbiguitySource {
    fn default() -> Self {
        Self {
            score: -1.0,
            categories: -1,
            interpretation: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeriesSource {
    pub filename: String,
    pub frames: Vec<f64>,
    pub total_i: Vec<f64>,
    pub mean_i: Vec<f64>,
    pub rg: Vec<f64>,
    pub rg_err: Vec<f64>,
    pub i0: Vec<f64>,
    pub i0_err: Vec<f64>,
    pub vpmw: Vec<f64>,
    pub vcmw: Vec<f64>,
    pub vcmw_err: Vec<f64>,
    pub has_calc_data: bool,
    pub buffer_range: Vec<[i64; 2]>,
    pub sample_range: Vec<[i64; 2]>,
    pub baseline_start_range: Option<[i64; 2]>,
    pub baseline_end_range: Option<[i64; 2]>,
    pub baseline_type: String,
    pub baseline_corrected: bool,
    pub subtracted: bool,
    /// Series-level analysis namespaces as raw JSON (`analysis.efa` among
    /// them).
    pub parameters: Map<String, Value>,
    /// First profile of the series; source of the series metadata.
    pub representative_profile: Option<ProfileSource>,
    /// Captured deconvolution output, when the EFA run was re-executed at
    /// save time.
    pub efa_extra: Option<EfaExtraSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EfaExtraSource {
    pub concentrations: Vec<Vec<f64>>,
    pub chisq: Vec<f64>,
    pub profiles: Vec<ComponentProfileSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentProfileSource {
    pub q: Vec<f64>,
    pub i: Vec<f64>,
}

pub fn load_snapshot(path: &Path) -> ReportResult<SourceSnapshot> {
    let text = fs::read_to_string(path).map_err(|err| {
        ReportError::io_system(
            "IO.SNAPSHOT_READ",
            format!("failed to read snapshot '{}': {}", path.display(), err),
        )
    })?;
    parse_snapshot(&text)
}

pub fn parse_snapshot(text: &str) -> ReportResult<SourceSnapshot> {
    let snapshot: SourceSnapshot = serde_json::from_str(text).map_err(|err| {
        ReportError::input_validation(
            "INPUT.SNAPSHOT_PARSE",
            format!("snapshot is not valid JSON: {err}"),
        )
    })?;
    validate(&snapshot)?;
    Ok(snapshot)
}

fn validate(snapshot: &SourceSnapshot) -> ReportResult<()> {
    for profile in &snapshot.profiles {
        validate_profile(profile, false)?;
    }

    for ift in &snapshot.ifts {
        validate_ift(ift)?;
    }

    for series in &snapshot.series {
        validate_series(series)?;
        if let Some(profile) = &series.representative_profile {
            validate_profile(profile, true)?;
        }
    }

    Ok(())
}

fn validate_profile(profile: &ProfileSource, allow_empty: bool) -> ReportResult<()> {
    if profile.q.is_empty() && !allow_empty {
        return Err(ReportError::input_validation(
            "INPUT.PROFILE_EMPTY",
            format!("profile '{}' has no data points", profile.filename),
        ));
    }

    if profile.q.len() != profile.i.len() || profile.q.len() != profile.err.len() {
        return Err(ReportError::input_validation(
            "INPUT.PROFILE_LENGTH_MISMATCH",
            format!(
                "profile '{}' has mismatched array lengths (q: {}, i: {}, err: {})",
                profile.filename,
                profile.q.len(),
                profile.i.len(),
                profile.err.len()
            ),
        ));
    }

    if profile.q.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(ReportError::input_validation(
            "INPUT.PROFILE_Q_ORDER",
            format!("profile '{}' has unsorted q values", profile.filename),
        ));
    }

    Ok(())
}

fn validate_ift(ift: &IftSource) -> ReportResult<()> {
    if ift.r.len() != ift.p.len() || ift.r.len() != ift.p_err.len() {
        return Err(ReportError::input_validation(
            "INPUT.DISTRIBUTION_LENGTH_MISMATCH",
            format!(
                "ift '{}' has mismatched distribution arrays (r: {}, p: {}, p_err: {})",
                ift.filename,
                ift.r.len(),
                ift.p.len(),
                ift.p_err.len()
            ),
        ));
    }

    if ift.q.len() != ift.i.len() || ift.q.len() != ift.i_err.len() {
        return Err(ReportError::input_validation(
            "INPUT.DISTRIBUTION_LENGTH_MISMATCH",
            format!(
                "ift '{}' has mismatched data arrays (q: {}, i: {}, i_err: {})",
                ift.filename,
                ift.q.len(),
                ift.i.len(),
                ift.i_err.len()
            ),
        ));
    }

    Ok(())
}

fn validate_series(series: &SeriesSource) -> ReportResult<()> {
    if series.frames.len() != series.total_i.len() || series.frames.len() != series.mean_i.len() {
        return Err(ReportError::input_validation(
            "INPUT.SERIES_LENGTH_MISMATCH",
            format!(
                "series '{}' has mismatched intensity arrays (frames: {}, total: {}, mean: {})",
                series.filename,
                series.frames.len(),
                series.total_i.len(),
                series.mean_i.len()
            ),
        ));
    }

    let calc_traces = [
        ("rg", series.rg.len()),
        ("i0", series.i0.len()),
        ("vcmw", series.vcmw.len()),
        ("vpmw", series.vpmw.len()),
    ];

    for (name, len) in calc_traces {
        if len != 0 && len != series.frames.len() {
            return Err(ReportError::input_validation(
                "INPUT.SERIES_LENGTH_MISMATCH",
                format!(
                    "series '{}' has a {} trace of length {} for {} frames",
                    series.filename,
                    name,
                    len,
                    series.frames.len()
                ),
            ));
        }
    }

    Ok(())
}
