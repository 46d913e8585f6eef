//! Column schemas and cell formatting for every report table.
//!
//! Each builder lays out one table: columns in display order, a `required`
//! flag per column, and one formatted cell per record. Column pruning and
//! empty-table suppression are handled by [`compose`].

use crate::common::format::{
    float_repr, round_decimals, text_round, trimmed_number, value_with_error,
};
use crate::domain::records::{
    BeadModelRecord, DistributionRecord, EfaAnalysis, GuinierRecord, MetadataRecord,
    ProfileRecord, SeriesRecord,
};
use crate::modules::table::{Table, TableColumn, compose};

/// Drops the final `:`-separated segment, turning `2024-06-01 12:30:05`
/// into `2024-06-01 12:30`. A value without a colon becomes empty.
pub(crate) fn strip_seconds(date: &str) -> String {
    match date.rsplit_once(':') {
        Some((head, _)) => head.to_string(),
        None => String::new(),
    }
}

/// Label/metadata pairs for the summary header, drawn from series when
/// present, then profiles, then distributions.
fn summary_records<'a>(
    profiles: &'a [ProfileRecord],
    distributions: &'a [DistributionRecord],
    series: &'a [SeriesRecord],
) -> Vec<(&'a str, &'a MetadataRecord)> {
    if !series.is_empty() {
        series.iter().map(|s| (s.label(), &s.metadata)).collect()
    } else if !profiles.is_empty() {
        profiles.iter().map(|p| (p.label(), &p.metadata)).collect()
    } else {
        distributions
            .iter()
            .map(|d| (d.label(), &d.metadata))
            .collect()
    }
}

pub(crate) fn display_names(
    profiles: &[ProfileRecord],
    distributions: &[DistributionRecord],
    series: &[SeriesRecord],
) -> Vec<String> {
    summary_records(profiles, distributions, series)
        .into_iter()
        .map(|(label, _)| label.to_string())
        .collect()
}

pub(crate) fn collection_dates(
    profiles: &[ProfileRecord],
    distributions: &[DistributionRecord],
    series: &[SeriesRecord],
) -> Vec<String> {
    summary_records(profiles, distributions, series)
        .into_iter()
        .map(|(_, metadata)| {
            if metadata.date.is_empty() {
                "N/A".to_string()
            } else {
                strip_seconds(&metadata.date)
            }
        })
        .collect()
}

fn mw_cell(mw: f64) -> String {
    if mw != -1.0 {
        text_round(mw, 1)
    } else {
        String::new()
    }
}

fn guinier_cell(guinier: &GuinierRecord, value: f64, error: f64) -> String {
    if guinier.has_fit() {
        value_with_error(value, error, 2)
    } else {
        String::new()
    }
}

pub(crate) fn overview_table(profiles: &[ProfileRecord]) -> Option<Table> {
    let columns = vec![
        TableColumn::new(
            "",
            true,
            profiles.iter().map(|p| p.filename.clone()).collect(),
        ),
        TableColumn::new(
            "Guinier Rg",
            true,
            profiles
                .iter()
                .map(|p| guinier_cell(&p.guinier, p.guinier.rg, p.guinier.rg_err))
                .collect(),
        ),
        TableColumn::new(
            "Guinier I(0)",
            true,
            profiles
                .iter()
                .map(|p| guinier_cell(&p.guinier, p.guinier.i0, p.guinier.i0_err))
                .collect(),
        ),
        TableColumn::new(
            "M.W. (Vp)",
            true,
            profiles.iter().map(|p| mw_cell(p.mw.porod.mw)).collect(),
        ),
        TableColumn::new(
            "M.W. (Vc)",
            true,
            profiles
                .iter()
                .map(|p| mw_cell(p.mw.volume_of_correlation.mw))
                .collect(),
        ),
        TableColumn::new(
            "M.W. (S&S)",
            false,
            profiles
                .iter()
                .map(|p| mw_cell(p.mw.shape_and_size.mw))
                .collect(),
        ),
        TableColumn::new(
            "M.W. (Bayes)",
            false,
            profiles.iter().map(|p| mw_cell(p.mw.bayes.mw)).collect(),
        ),
        TableColumn::new(
            "M.W. (Abs.)",
            false,
            profiles.iter().map(|p| mw_cell(p.mw.absolute.mw)).collect(),
        ),
        TableColumn::new(
            "M.W. (Ref.)",
            false,
            profiles
                .iter()
                .map(|p| mw_cell(p.mw.reference.mw))
                .collect(),
        ),
        TableColumn::new(
            "GNOM Dmax",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.gnom.has_fit() {
                        text_round(p.gnom.dmax, 0)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "GNOM Rg",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.gnom.has_fit() {
                        value_with_error(p.gnom.rg, p.gnom.rg_err, 2)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "GNOM I(0)",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.gnom.has_fit() {
                        value_with_error(p.gnom.i0, p.gnom.i0_err, 2)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "BIFT Dmax",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.bift.has_fit() {
                        value_with_error(p.bift.dmax, p.bift.dmax_err, 0)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "BIFT Rg",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.bift.has_fit() {
                        value_with_error(p.bift.rg, p.bift.rg_err, 2)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "BIFT I(0)",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.bift.has_fit() {
                        value_with_error(p.bift.i0, p.bift.i0_err, 2)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
    ];

    compose(columns)
}

fn optional_number(value: f64) -> String {
    if value != -1.0 {
        trimmed_number(value)
    } else {
        String::new()
    }
}

/// Attenuation shown as the inverse of the recorded transmission.
fn attenuation_cell(transmission: f64) -> String {
    if transmission == -1.0 {
        String::new()
    } else if transmission == 1.0 {
        "None".to_string()
    } else {
        float_repr(round_decimals(1.0 / transmission, 4))
    }
}

pub(crate) fn experimental_parameters_table(
    profiles: &[ProfileRecord],
    series: &[SeriesRecord],
) -> Option<Table> {
    let records: Vec<(String, &MetadataRecord)> = if !series.is_empty() {
        series
            .iter()
            .map(|s| (s.label().to_string(), &s.metadata))
            .collect()
    } else {
        profiles
            .iter()
            .map(|p| (p.filename.clone(), &p.metadata))
            .collect()
    };

    let text =
        |cell: fn(&MetadataRecord) -> String| records.iter().map(|(_, m)| cell(m)).collect();

    let columns = vec![
        TableColumn::new(
            "",
            true,
            records.iter().map(|(label, _)| label.clone()).collect(),
        ),
        TableColumn::new("Date", true, text(|m| strip_seconds(&m.date))),
        TableColumn::new("Instrument", false, text(|m| m.instrument.clone())),
        TableColumn::new("Experiment Type", false, text(|m| m.experiment_type.clone())),
        TableColumn::new("Column", false, text(|m| m.column.clone())),
        TableColumn::new("Mixer", false, text(|m| m.mixer.clone())),
        TableColumn::new("Sample", false, text(|m| m.sample.clone())),
        TableColumn::new("Buffer", false, text(|m| m.buffer.clone())),
        TableColumn::new("Temperature [C]", false, text(|m| optional_number(m.temperature))),
        TableColumn::new(
            "Loaded volume [uL]",
            false,
            text(|m| optional_number(m.loaded_volume)),
        ),
        TableColumn::new(
            "Concentration [mg/ml]",
            false,
            text(|m| optional_number(m.concentration)),
        ),
        TableColumn::new("Detector", false, text(|m| m.detector.clone())),
        TableColumn::new(
            "Wavelength (A)",
            true,
            text(|m| {
                if m.wavelength != -1.0 {
                    text_round(m.wavelength, 3)
                } else {
                    String::new()
                }
            }),
        ),
        TableColumn::new(
            "Camera length (m)",
            true,
            text(|m| {
                if m.sample_to_detector_distance != -1.0 {
                    text_round(m.sample_to_detector_distance / 1000.0, 3)
                } else {
                    String::new()
                }
            }),
        ),
        TableColumn::new("q-measurement range (1/A)", false, text(|m| m.q_range.clone())),
        TableColumn::new(
            "Exposure time (s)",
            true,
            text(|m| optional_number(m.exposure_time)),
        ),
        TableColumn::new(
            "Exposure period (s)",
            false,
            text(|m| optional_number(m.exposure_period)),
        ),
        TableColumn::new(
            "Flow rate (ml/min)",
            false,
            text(|m| optional_number(m.flow_rate)),
        ),
        TableColumn::new("Attenuation", false, text(|m| attenuation_cell(m.transmission))),
        TableColumn::new("RAW version", false, text(|m| m.raw_version.clone())),
        TableColumn::new("Notes", false, text(|m| m.notes.clone())),
    ];

    compose(columns)
}

fn ranges_cell(ranges: &[(i64, i64)]) -> String {
    ranges
        .iter()
        .map(|(lo, hi)| format!("{lo} to {hi}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn series_table(series: &[SeriesRecord]) -> Option<Table> {
    let baseline_range = |range: Option<(i64, i64)>, corrected: bool| match range {
        Some((lo, hi)) if corrected => format!("{lo} to {hi}"),
        _ => String::new(),
    };

    let columns = vec![
        TableColumn::new(
            "",
            true,
            series.iter().map(|s| s.label().to_string()).collect(),
        ),
        TableColumn::new(
            "Buffer range",
            true,
            series.iter().map(|s| ranges_cell(&s.buffer_range)).collect(),
        ),
        TableColumn::new(
            "Sample range",
            true,
            series.iter().map(|s| ranges_cell(&s.sample_range)).collect(),
        ),
        TableColumn::new(
            "Baseline correction",
            true,
            series
                .iter()
                .map(|s| {
                    if s.baseline_corrected {
                        s.baseline_type.clone()
                    } else {
                        "None".to_string()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Baseline start range",
            false,
            series
                .iter()
                .map(|s| baseline_range(s.baseline_start_range, s.baseline_corrected))
                .collect(),
        ),
        TableColumn::new(
            "Baseline end range",
            false,
            series
                .iter()
                .map(|s| baseline_range(s.baseline_end_range, s.baseline_corrected))
                .collect(),
        ),
    ];

    compose(columns)
}

/// Table summarizing one series' deconvolution setup. One table per series,
/// so every column holds a single cell.
pub(crate) fn efa_table(label: &str, efa: &EfaAnalysis) -> Option<Table> {
    let mut columns = vec![
        TableColumn::new("", true, vec![label.to_string()]),
        TableColumn::new(
            "EFA data range",
            true,
            vec![format!("{} to {}", efa.frame_start, efa.frame_end)],
        ),
        TableColumn::new(
            "Number of components",
            true,
            vec![efa.n_components.to_string()],
        ),
    ];

    for (index, (lo, hi)) in efa.ranges.iter().enumerate() {
        columns.push(TableColumn::new(
            format!("Component {index}"),
            false,
            vec![format!("{lo} to {hi}")],
        ));
    }

    compose(columns)
}

pub(crate) fn guinier_table(profiles: &[ProfileRecord]) -> Option<Table> {
    let i0_header = if profiles.iter().all(|p| p.metadata.absolute_scale) {
        "I(0) [1/cm]"
    } else {
        "I(0) [Arb.]"
    };

    let fitted = |cell: fn(&GuinierRecord) -> String| {
        profiles
            .iter()
            .map(|p| {
                if p.guinier.has_fit() {
                    cell(&p.guinier)
                } else {
                    String::new()
                }
            })
            .collect()
    };

    let columns = vec![
        TableColumn::new(
            "",
            true,
            profiles.iter().map(|p| p.filename.clone()).collect(),
        ),
        TableColumn::new("Rg [A]", true, fitted(|g| value_with_error(g.rg, g.rg_err, 2))),
        TableColumn::new(i0_header, true, fitted(|g| value_with_error(g.i0, g.i0_err, 2))),
        TableColumn::new(
            "q-range [1/A]",
            true,
            fitted(|g| format!("{} to {}", text_round(g.q_min, 4), text_round(g.q_max, 4))),
        ),
        TableColumn::new("qmin*Rg", true, fitted(|g| text_round(g.q_rg_min, 3))),
        TableColumn::new("qmax*Rg", true, fitted(|g| text_round(g.q_rg_max, 3))),
        TableColumn::new("r^2", true, fitted(|g| text_round(g.r_sq, 3))),
    ];

    compose(columns)
}

pub(crate) fn molecular_weight_table(profiles: &[ProfileRecord]) -> Option<Table> {
    let columns = vec![
        TableColumn::new(
            "",
            true,
            profiles.iter().map(|p| p.filename.clone()).collect(),
        ),
        TableColumn::new(
            "M.W. (Vp) [kDa]",
            true,
            profiles.iter().map(|p| mw_cell(p.mw.porod.mw)).collect(),
        ),
        TableColumn::new(
            "Porod Volume [A^3]",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.mw.porod.mw != -1.0 {
                        text_round(p.mw.porod.corrected_volume, 2)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "M.W. (Vc) [kDa]",
            true,
            profiles
                .iter()
                .map(|p| mw_cell(p.mw.volume_of_correlation.mw))
                .collect(),
        ),
        TableColumn::new(
            "M.W. (S&S) [kDa]",
            false,
            profiles
                .iter()
                .map(|p| mw_cell(p.mw.shape_and_size.mw))
                .collect(),
        ),
        TableColumn::new(
            "Shape (S&S)",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.mw.shape_and_size.mw != -1.0 {
                        p.mw.shape_and_size.shape.clone()
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Dmax (S&S)",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.mw.shape_and_size.mw != -1.0 {
                        text_round(p.mw.shape_and_size.dmax, 1)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "M.W. (Bayes) [kDa]",
            false,
            profiles.iter().map(|p| mw_cell(p.mw.bayes.mw)).collect(),
        ),
        TableColumn::new(
            "Bayes Probability",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.mw.bayes.mw != -1.0 {
                        text_round(p.mw.bayes.probability, 1)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Bayes Confidence\nInterval [kDa]",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.mw.bayes.mw != -1.0 {
                        format!(
                            "{} to {}",
                            text_round(p.mw.bayes.ci_lower, 1),
                            text_round(p.mw.bayes.ci_upper, 1)
                        )
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Bayes C.I. Prob.",
            false,
            profiles
                .iter()
                .map(|p| {
                    if p.mw.bayes.mw != -1.0 {
                        text_round(p.mw.bayes.ci_probability, 1)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "M.W. (Abs.) [kDa]",
            false,
            profiles.iter().map(|p| mw_cell(p.mw.absolute.mw)).collect(),
        ),
        TableColumn::new(
            "M.W. (Ref.) [kDa]",
            false,
            profiles
                .iter()
                .map(|p| mw_cell(p.mw.reference.mw))
                .collect(),
        ),
    ];

    compose(columns)
}

fn q_range_cell(q: &[f64]) -> String {
    match (q.first(), q.last()) {
        (Some(first), Some(last)) => {
            format!("{} to {}", text_round(*first, 4), text_round(*last, 4))
        }
        _ => String::new(),
    }
}

pub(crate) fn gnom_table(distributions: &[&DistributionRecord]) -> Option<Table> {
    use crate::domain::records::Ambiguity;

    let ambiguity =
        |cell: fn(f64, i64, &str) -> String| -> Vec<String> {
            distributions
                .iter()
                .map(|d| match &d.ambiguity {
                    Ambiguity::Computed {
                        score,
                        categories,
                        interpretation,
                    } => cell(*score, *categories, interpretation),
                    Ambiguity::NotComputed => String::new(),
                })
                .collect()
        };

    let columns = vec![
        TableColumn::new(
            "",
            true,
            distributions.iter().map(|d| d.filename.clone()).collect(),
        ),
        TableColumn::new(
            "Dmax [A]",
            true,
            distributions
                .iter()
                .map(|d| text_round(d.dmax, 0))
                .collect(),
        ),
        TableColumn::new(
            "Rg [A]",
            true,
            distributions
                .iter()
                .map(|d| value_with_error(d.rg, d.rg_err, 2))
                .collect(),
        ),
        TableColumn::new(
            "I(0)",
            true,
            distributions
                .iter()
                .map(|d| value_with_error(d.i0, d.i0_err, 2))
                .collect(),
        ),
        TableColumn::new(
            "Chi^2",
            false,
            distributions
                .iter()
                .map(|d| text_round(d.chi_sq, 3))
                .collect(),
        ),
        TableColumn::new(
            "Total Estimate",
            false,
            distributions
                .iter()
                .map(|d| text_round(d.total_estimate, 3))
                .collect(),
        ),
        TableColumn::new(
            "Quality",
            false,
            distributions.iter().map(|d| d.quality.clone()).collect(),
        ),
        TableColumn::new(
            "q-range [1/A]",
            false,
            distributions.iter().map(|d| q_range_cell(&d.q)).collect(),
        ),
        TableColumn::new(
            "Ambiguity score",
            false,
            ambiguity(|score, _, _| text_round(score, 2)),
        ),
        TableColumn::new(
            "Ambiguity cats.",
            false,
            ambiguity(|_, categories, _| categories.to_string()),
        ),
        TableColumn::new(
            "Ambiguity",
            false,
            ambiguity(|_, _, interpretation| interpretation.to_string()),
        ),
    ];

    compose(columns)
}

pub(crate) fn bift_table(distributions: &[&DistributionRecord]) -> Option<Table> {
    let columns = vec![
        TableColumn::new(
            "",
            true,
            distributions.iter().map(|d| d.filename.clone()).collect(),
        ),
        TableColumn::new(
            "Dmax [A]",
            true,
            distributions
                .iter()
                .map(|d| value_with_error(d.dmax, d.dmax_err, 1))
                .collect(),
        ),
        TableColumn::new(
            "Rg [A]",
            true,
            distributions
                .iter()
                .map(|d| value_with_error(d.rg, d.rg_err, 2))
                .collect(),
        ),
        TableColumn::new(
            "I(0)",
            true,
            distributions
                .iter()
                .map(|d| value_with_error(d.i0, d.i0_err, 2))
                .collect(),
        ),
        TableColumn::new(
            "Chi^2",
            false,
            distributions
                .iter()
                .map(|d| text_round(d.chi_sq, 3))
                .collect(),
        ),
        TableColumn::new(
            "q-range [1/A]",
            false,
            distributions.iter().map(|d| q_range_cell(&d.q)).collect(),
        ),
    ];

    compose(columns)
}

fn int_cell(value: i64) -> String {
    if value != -1 {
        value.to_string()
    } else {
        String::new()
    }
}

fn flag_cell(value: bool) -> String {
    if value { "True".to_string() } else { "False".to_string() }
}

pub(crate) fn bead_model_table(models: &[&BeadModelRecord]) -> Option<Table> {
    let columns = vec![
        TableColumn::new(
            "",
            true,
            models.iter().map(|m| m.prefix.clone()).collect(),
        ),
        TableColumn::new(
            "Program",
            true,
            models.iter().map(|m| m.program.clone()).collect(),
        ),
        TableColumn::new("Mode", true, models.iter().map(|m| m.mode.clone()).collect()),
        TableColumn::new(
            "Symmetry",
            true,
            models.iter().map(|m| m.symmetry.clone()).collect(),
        ),
        TableColumn::new(
            "Anisometry",
            true,
            models.iter().map(|m| m.anisometry.clone()).collect(),
        ),
        TableColumn::new(
            "Number of reconstructions",
            true,
            models.iter().map(|m| int_cell(m.reconstructions)).collect(),
        ),
        TableColumn::new(
            "Ran DAMAVER",
            true,
            models.iter().map(|m| flag_cell(m.damaver)).collect(),
        ),
        TableColumn::new(
            "Ran DAMCLUST",
            true,
            models.iter().map(|m| flag_cell(m.damclust)).collect(),
        ),
        TableColumn::new(
            "Refined with DAMMIN",
            true,
            models.iter().map(|m| flag_cell(m.refined)).collect(),
        ),
        TableColumn::new(
            "Mean NSD",
            false,
            models
                .iter()
                .map(|m| {
                    if m.nsd != -1.0 {
                        value_with_error(m.nsd, m.nsd_std, 3)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Included models",
            false,
            models
                .iter()
                .map(|m| {
                    if m.included_models != -1 {
                        format!("{} of {}", m.included_models, m.reconstructions)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Resolution (SASRES)",
            false,
            models
                .iter()
                .map(|m| {
                    if m.resolution != -1.0 {
                        value_with_error(m.resolution, m.resolution_err, 0)
                    } else {
                        String::new()
                    }
                })
                .collect(),
        ),
        TableColumn::new(
            "Representative model",
            false,
            models
                .iter()
                .map(|m| int_cell(m.representative_model))
                .collect(),
        ),
        TableColumn::new(
            "Number of clusters",
            false,
            models.iter().map(|m| int_cell(m.clusters)).collect(),
        ),
    ];

    compose(columns)
}
