//! Translation of raw snapshot sources into canonical records.
//!
//! Extraction is total: any key that is missing, of the wrong type, or not
//! coercible to the declared field type simply leaves the record's sentinel
//! default in place. Only a structurally unusable source (an inverse
//! transform with an unknown algorithm label) produces an error.

pub(crate) mod tables;

use serde_json::{Map, Value};

use crate::common::format::text_round;
use crate::domain::records::{
    Ambiguity, BiftAnalysis, ComponentProfile, DistributionMethod, DistributionRecord,
    EfaAnalysis, GnomAnalysis, GuinierRecord, MetadataRecord, MwAnalysis, MwMethod, ProfileRecord,
    SeriesRecord,
};
use crate::domain::{ReportError, ReportResult};
use crate::source::{EfaExtraSource, IftSource, ProfileSource, SeriesSource};

use tables::{
    AbsoluteMwField, BayesMwField, BiftField, GnomField, GuinierField, MetadataField, PorodMwField,
    ReferenceMwField, ShapeSizeMwField, VcMwField,
};

pub struct RecordExtractor;

impl RecordExtractor {
    pub fn profile(&self, source: &ProfileSource) -> ProfileRecord {
        let analysis = namespace(&source.parameters, "analysis");

        ProfileRecord {
            filename: source.filename.clone(),
            q: source.q.clone(),
            i: source.i.clone(),
            err: source.err.clone(),
            guinier: guinier_record(analysis),
            mw: mw_analysis(analysis),
            gnom: gnom_analysis(analysis),
            bift: bift_analysis(analysis),
            metadata: metadata_record(&source.parameters, &source.q),
        }
    }

    pub fn distribution(&self, source: &IftSource) -> ReportResult<DistributionRecord> {
        let method = DistributionMethod::parse(&source.algorithm).ok_or_else(|| {
            ReportError::input_validation(
                "INPUT.DISTRIBUTION_METHOD",
                format!(
                    "ift '{}' uses unsupported inversion algorithm '{}'",
                    source.filename, source.algorithm
                ),
            )
        })?;

        // P(r) is reported normalized by I(0).
        let (p, p_err) = if source.i0 > 0.0 {
            (
                divide_all(&source.p, source.i0),
                divide_all(&source.p_err, source.i0),
            )
        } else {
            (source.p.clone(), source.p_err.clone())
        };

        let ambiguity = match &source.ambiguity {
            Some(assessment) => Ambiguity::Computed {
                score: assessment.score,
                categories: assessment.categories,
                interpretation: assessment.interpretation.clone(),
            },
            None => Ambiguity::NotComputed,
        };

        Ok(DistributionRecord {
            filename: source.filename.clone(),
            r: source.r.clone(),
            p,
            p_err,
            q: source.q.clone(),
            i: source.i.clone(),
            i_err: source.i_err.clone(),
            i_fit: source.i_fit.clone(),
            q_extrap: source.q_extrap.clone(),
            i_extrap: source.i_extrap.clone(),
            dmax: source.dmax,
            rg: source.rg,
            i0: source.i0,
            rg_err: source.rg_err,
            i0_err: source.i0_err,
            chi_sq: source.chi_sq,
            method,
            dmax_err: source.dmax_err,
            total_estimate: source.total_estimate,
            quality: source.quality.clone(),
            ambiguity,
            metadata: MetadataRecord::default(),
        })
    }

    pub fn series(&self, source: &SeriesSource) -> SeriesRecord {
        let metadata = match &source.representative_profile {
            Some(profile) => metadata_record(&profile.parameters, &profile.q),
            None => MetadataRecord::default(),
        };

        SeriesRecord {
            filename: source.filename.clone(),
            frames: source.frames.clone(),
            total_i: source.total_i.clone(),
            mean_i: source.mean_i.clone(),
            rg: source.rg.clone(),
            rg_err: source.rg_err.clone(),
            i0: source.i0.clone(),
            i0_err: source.i0_err.clone(),
            vpmw: source.vpmw.clone(),
            vcmw: source.vcmw.clone(),
            vcmw_err: source.vcmw_err.clone(),
            has_calc_data: source.has_calc_data,
            buffer_range: pair_list(&source.buffer_range),
            sample_range: pair_list(&source.sample_range),
            baseline_start_range: source.baseline_start_range.map(|r| (r[0], r[1])),
            baseline_end_range: source.baseline_end_range.map(|r| (r[0], r[1])),
            baseline_type: source.baseline_type.clone(),
            baseline_corrected: source.baseline_corrected,
            subtracted: source.subtracted,
            metadata,
            efa: efa_analysis(&source.parameters, source.efa_extra.as_ref()),
        }
    }
}

fn namespace<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    params.get(key)?.as_object()
}

fn value_as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|float| float as i64))
}

fn float_value(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn int_value(map: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = map.get(key)?;
    match value {
        Value::Number(_) => value_as_int(value),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn string_value(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(if *flag { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

fn assign_float(slot: &mut f64, map: &Map<String, Value>, key: &str) {
    if let Some(value) = float_value(map, key) {
        *slot = value;
    }
}

fn assign_int(slot: &mut i64, map: &Map<String, Value>, key: &str) {
    if let Some(value) = int_value(map, key) {
        *slot = value;
    }
}

fn assign_string(slot: &mut String, map: &Map<String, Value>, key: &str) {
    if let Some(value) = string_value(map, key) {
        *slot = value;
    }
}

fn divide_all(values: &[f64], by: f64) -> Vec<f64> {
    values.iter().map(|value| value / by).collect()
}

fn pair_list(ranges: &[[i64; 2]]) -> Vec<(i64, i64)> {
    ranges.iter().map(|range| (range[0], range[1])).collect()
}

fn guinier_record(analysis: Option<&Map<String, Value>>) -> GuinierRecord {
    let mut record = GuinierRecord::default();
    let Some(map) = analysis
        .and_then(|a| a.get("guinier"))
        .and_then(Value::as_object)
    else {
        return record;
    };

    for (key, field) in tables::GUINIER_TABLE {
        match field {
            GuinierField::Rg => assign_float(&mut record.rg, map, key),
            GuinierField::I0 => assign_float(&mut record.i0, map, key),
            GuinierField::RgErr => assign_float(&mut record.rg_err, map, key),
            GuinierField::I0Err => assign_float(&mut record.i0_err, map, key),
            GuinierField::NMin => assign_int(&mut record.n_min, map, key),
            GuinierField::NMax => assign_int(&mut record.n_max, map, key),
            GuinierField::QMin => assign_float(&mut record.q_min, map, key),
            GuinierField::QMax => assign_float(&mut record.q_max, map, key),
            GuinierField::QRgMin => assign_float(&mut record.q_rg_min, map, key),
            GuinierField::QRgMax => assign_float(&mut record.q_rg_max, map, key),
            GuinierField::RSq => assign_float(&mut record.r_sq, map, key),
        }
    }

    record
}

fn mw_analysis(analysis: Option<&Map<String, Value>>) -> MwAnalysis {
    let mut mw = MwAnalysis::default();
    let Some(methods) = analysis
        .and_then(|a| a.get("molecularWeight"))
        .and_then(Value::as_object)
    else {
        return mw;
    };

    for method in MwMethod::ALL {
        let Some(map) = methods.get(method.source_key()).and_then(Value::as_object) else {
            continue;
        };

        match method {
            MwMethod::Absolute => {
                for (key, field) in tables::ABSOLUTE_MW_TABLE {
                    match field {
                        AbsoluteMwField::Mw => assign_float(&mut mw.absolute.mw, map, key),
                        AbsoluteMwField::BufferDensity => {
                            assign_float(&mut mw.absolute.buffer_density, map, key)
                        }
                        AbsoluteMwField::ProteinDensity => {
                            assign_float(&mut mw.absolute.protein_density, map, key)
                        }
                        AbsoluteMwField::PartialSpecificVolume => {
                            assign_float(&mut mw.absolute.partial_specific_volume, map, key)
                        }
                    }
                }
            }
            MwMethod::Reference => {
                for (key, field) in tables::REFERENCE_MW_TABLE {
                    match field {
                        ReferenceMwField::Mw => assign_float(&mut mw.reference.mw, map, key),
                    }
                }
            }
            MwMethod::PorodVolume => {
                for (key, field) in tables::POROD_MW_TABLE {
                    match field {
                        PorodMwField::Mw => assign_float(&mut mw.porod.mw, map, key),
                        PorodMwField::Density => assign_float(&mut mw.porod.density, map, key),
                        PorodMwField::QMax => assign_float(&mut mw.porod.q_max, map, key),
                        PorodMwField::CorrectedVolume => {
                            assign_float(&mut mw.porod.corrected_volume, map, key)
                        }
                        PorodMwField::Volume => assign_float(&mut mw.porod.volume, map, key),
                        PorodMwField::Cutoff => assign_string(&mut mw.porod.cutoff, map, key),
                    }
                }
            }
            MwMethod::VolumeOfCorrelation => {
                for (key, field) in tables::VC_MW_TABLE {
                    match field {
                        VcMwField::Mw => assign_float(&mut mw.volume_of_correlation.mw, map, key),
                        VcMwField::MwType => {
                            assign_string(&mut mw.volume_of_correlation.mw_type, map, key)
                        }
                        VcMwField::QMax => {
                            assign_float(&mut mw.volume_of_correlation.q_max, map, key)
                        }
                        VcMwField::Volume => assign_float(
                            &mut mw.volume_of_correlation.volume_of_correlation,
                            map,
                            key,
                        ),
                        VcMwField::Cutoff => {
                            assign_string(&mut mw.volume_of_correlation.cutoff, map, key)
                        }
                    }
                }
            }
            MwMethod::ShapeAndSize => {
                for (key, field) in tables::SHAPE_SIZE_MW_TABLE {
                    match field {
                        ShapeSizeMwField::Mw => assign_float(&mut mw.shape_and_size.mw, map, key),
                        ShapeSizeMwField::Dmax => {
                            assign_float(&mut mw.shape_and_size.dmax, map, key)
                        }
                        ShapeSizeMwField::Shape => {
                            assign_string(&mut mw.shape_and_size.shape, map, key)
                        }
                    }
                }
            }
            MwMethod::Bayesian => {
                for (key, field) in tables::BAYES_MW_TABLE {
                    match field {
                        BayesMwField::Mw => assign_float(&mut mw.bayes.mw, map, key),
                        BayesMwField::Probability => {
                            assign_float(&mut mw.bayes.probability, map, key)
                        }
                        BayesMwField::CiLower => assign_float(&mut mw.bayes.ci_lower, map, key),
                        BayesMwField::CiUpper => assign_float(&mut mw.bayes.ci_upper, map, key),
                        BayesMwField::CiProbability => {
                            assign_float(&mut mw.bayes.ci_probability, map, key)
                        }
                    }
                }
            }
        }
    }

    mw
}

fn gnom_analysis(analysis: Option<&Map<String, Value>>) -> GnomAnalysis {
    let mut record = GnomAnalysis::default();
    let Some(map) = analysis
        .and_then(|a| a.get("GNOM"))
        .and_then(Value::as_object)
    else {
        return record;
    };

    for (key, field) in tables::GNOM_TABLE {
        match field {
            GnomField::Dmax => assign_float(&mut record.dmax, map, key),
            GnomField::Rg => assign_float(&mut record.rg, map, key),
            GnomField::I0 => assign_float(&mut record.i0, map, key),
            GnomField::RgErr => assign_float(&mut record.rg_err, map, key),
            GnomField::I0Err => assign_float(&mut record.i0_err, map, key),
            GnomField::ChiSq => assign_float(&mut record.chi_sq, map, key),
            GnomField::TotalEstimate => assign_float(&mut record.total_estimate, map, key),
            GnomField::Quality => assign_string(&mut record.quality, map, key),
            GnomField::QMin => assign_float(&mut record.q_min, map, key),
            GnomField::QMax => assign_float(&mut record.q_max, map, key),
        }
    }

    record
}

fn bift_analysis(analysis: Option<&Map<String, Value>>) -> BiftAnalysis {
    let mut record = BiftAnalysis::default();
    let Some(map) = analysis
        .and_then(|a| a.get("BIFT"))
        .and_then(Value::as_object)
    else {
        return record;
    };

    for (key, field) in tables::BIFT_TABLE {
        match field {
            BiftField::Dmax => assign_float(&mut record.dmax, map, key),
            BiftField::Rg => assign_float(&mut record.rg, map, key),
            BiftField::I0 => assign_float(&mut record.i0, map, key),
            BiftField::DmaxErr => assign_float(&mut record.dmax_err, map, key),
            BiftField::RgErr => assign_float(&mut record.rg_err, map, key),
            BiftField::I0Err => assign_float(&mut record.i0_err, map, key),
            BiftField::ChiSq => assign_float(&mut record.chi_sq, map, key),
            BiftField::QMin => assign_float(&mut record.q_min, map, key),
            BiftField::QMax => assign_float(&mut record.q_max, map, key),
            BiftField::Evidence => assign_float(&mut record.evidence, map, key),
            BiftField::LogAlpha => assign_float(&mut record.log_alpha, map, key),
            BiftField::EvidenceErr => assign_float(&mut record.evidence_err, map, key),
            BiftField::LogAlphaErr => assign_float(&mut record.log_alpha_err, map, key),
        }
    }

    record
}

fn metadata_record(params: &Map<String, Value>, q: &[f64]) -> MetadataRecord {
    let mut record = MetadataRecord::default();

    if let Some(map) = namespace(params, "calibration_params") {
        apply_metadata_table(&mut record, map, &tables::CALIBRATION_TABLE);
    }
    if let Some(map) = namespace(params, "counters") {
        apply_metadata_table(&mut record, map, &tables::COUNTERS_TABLE);
    }
    if let Some(map) = namespace(params, "metadata") {
        apply_metadata_table(&mut record, map, &tables::HEADER_METADATA_TABLE);
    }
    if let Some(map) = namespace(params, "normalizations") {
        if map.contains_key("Absolute_scale") {
            record.absolute_scale = true;
        }
    }
    if let Some(version) = string_value(params, "raw_version") {
        record.raw_version = version;
    }

    if let (Some(first), Some(last)) = (q.first(), q.last()) {
        record.q_range = format!("{} to {}", text_round(*first, 4), text_round(*last, 2));
    }

    record
}

fn apply_metadata_table(
    record: &mut MetadataRecord,
    map: &Map<String, Value>,
    table: &[(&str, MetadataField)],
) {
    for (key, field) in table.iter().copied() {
        if !map.contains_key(key) {
            continue;
        }

        match field {
            MetadataField::SampleToDetectorDistance => {
                assign_float(&mut record.sample_to_detector_distance, map, key)
            }
            MetadataField::Wavelength => assign_float(&mut record.wavelength, map, key),
            MetadataField::ExposureTime => assign_float(&mut record.exposure_time, map, key),
            MetadataField::ExposurePeriod => assign_float(&mut record.exposure_period, map, key),
            MetadataField::FlowRate => assign_float(&mut record.flow_rate, map, key),
            MetadataField::Detector => assign_string(&mut record.detector, map, key),
            MetadataField::Instrument => assign_string(&mut record.instrument, map, key),
            MetadataField::FilePrefix => assign_string(&mut record.file_prefix, map, key),
            MetadataField::Date => assign_string(&mut record.date, map, key),
            MetadataField::ExperimentType => assign_string(&mut record.experiment_type, map, key),
            MetadataField::Sample => assign_string(&mut record.sample, map, key),
            MetadataField::Buffer => assign_string(&mut record.buffer, map, key),
            MetadataField::Temperature => assign_float(&mut record.temperature, map, key),
            MetadataField::LoadedVolume => assign_float(&mut record.loaded_volume, map, key),
            MetadataField::Concentration => assign_float(&mut record.concentration, map, key),
            MetadataField::Column => assign_string(&mut record.column, map, key),
            MetadataField::Mixer => assign_string(&mut record.mixer, map, key),
            MetadataField::Transmission => assign_float(&mut record.transmission, map, key),
            MetadataField::Notes => assign_string(&mut record.notes, map, key),
        }
    }
}

fn efa_analysis(
    params: &Map<String, Value>,
    extra: Option<&EfaExtraSource>,
) -> Option<EfaAnalysis> {
    let efa_map = namespace(params, "analysis")?.get("efa")?.as_object()?;

    let mut efa = EfaAnalysis {
        ranges: range_list(efa_map, "ranges"),
        ..EfaAnalysis::default()
    };

    if let Some(value) = int_value(efa_map, "fstart") {
        efa.frame_start = value;
    }
    if let Some(value) = int_value(efa_map, "fend") {
        efa.frame_end = value;
    }
    if let Some(value) = int_value(efa_map, "nsvs") {
        efa.n_components = value;
    }
    if let Some(value) = int_value(efa_map, "iter_limit") {
        efa.iteration_limit = value;
    }
    if let Some(value) = string_value(efa_map, "method") {
        efa.method = value;
    }
    if let Some(value) = string_value(efa_map, "profile") {
        efa.profile_type = value;
    }
    if let Some(value) = float_value(efa_map, "tolerance") {
        efa.tolerance = value;
    }

    if efa.frame_start >= 0 && efa.frame_end >= efa.frame_start {
        efa.frames = (efa.frame_start..=efa.frame_end).collect();
    }

    if let Some(extra) = extra {
        efa.concentrations = extra.concentrations.clone();
        efa.rotation_chi_sq = extra.chisq.clone();
        efa.component_profiles = extra
            .profiles
            .iter()
            .map(|profile| ComponentProfile {
                q: profile.q.clone(),
                i: profile.i.clone(),
            })
            .collect();
    }

    Some(efa)
}

fn range_list(map: &Map<String, Value>, key: &str) -> Vec<(i64, i64)> {
    let Some(Value::Array(items)) = map.get(key) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let pair = item.as_array()?;
            let start = value_as_int(pair.first()?)?;
            let end = value_as_int(pair.get(1)?)?;
            Some((start, end))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::RecordExtractor;
    use crate::domain::records::{Ambiguity, DistributionMethod, MwMethod};
    use crate::source::{AmbiguitySource, IftSource, ProfileSource, SeriesSource};

    fn params_from(value: Value) -> Map<String, Value> {
        value
            .as_object()
            .expect("fixture parameters should be an object")
            .clone()
    }

    fn profile_source(parameters: Value) -> ProfileSource {
        ProfileSource {
            filename: "glucose_isomerase.dat".to_string(),
            q: vec![0.0103, 0.0467, 0.1523, 0.2802],
            i: vec![102.4, 80.2, 12.5, 1.1],
            err: vec![1.2, 0.9, 0.3, 0.1],
            parameters: params_from(parameters),
        }
    }

    #[test]
    fn profile_extraction_fills_analysis_records() {
        let source = profile_source(json!({
            "analysis": {
                "guinier": {
                    "Rg": "33.61",
                    "I0": 0.0612,
                    "Rg_err": 0.2,
                    "I0_err": 0.0004,
                    "nStart": 12,
                    "nEnd": 94,
                    "qStart": 0.0147,
                    "qEnd": 0.0389,
                    "qRg_min": 0.49,
                    "qRg_max": 1.31,
                    "rsq": 0.997
                },
                "molecularWeight": {
                    "PorodVolume": {"MW": "158.2", "VPorod_Corrected": 256000.0},
                    "VolumeOfCorrelation": {"MW": 167.1, "Type": "Protein"},
                    "DatmwBayes": {
                        "MW": 161.5,
                        "MWProbability": 98.1,
                        "ConfidenceIntervalLower": 149.3,
                        "ConfidenceIntervalUpper": 176.4,
                        "ConfidenceIntervalProbability": 92.5
                    }
                },
                "GNOM": {
                    "Dmax": 102.0,
                    "Real_Space_Rg": 33.9,
                    "Real_Space_I0": 0.0615,
                    "Total_Estimate": 0.96,
                    "GNOM_Quality_Assessment": "EXCELLENT"
                },
                "BIFT": {
                    "Dmax": 104.3,
                    "Dmax_Err": 3.1,
                    "ChiSquared": 1.02
                }
            },
            "counters": {
                "File_prefix": "GI_sec",
                "Date": "Mon Jun 15 13:02:27 2026",
                "Exposure_time/frame_s": 0.5
            },
            "calibration_params": {
                "Sample_Detector_Distance": 3693.0,
                "Wavelength": 1.033
            },
            "metadata": {"Detector": "Pilatus3 X 1M"},
            "normalizations": {"Absolute_scale": {}},
            "raw_version": "2.1.1"
        }));

        let record = RecordExtractor.profile(&source);

        assert!(record.guinier.has_fit());
        assert_eq!(record.guinier.rg, 33.61);
        assert_eq!(record.guinier.n_min, 12);
        assert_eq!(record.guinier.n_max, 94);

        assert_eq!(record.mw.porod.mw, 158.2);
        assert_eq!(record.mw.porod.corrected_volume, 256000.0);
        assert_eq!(record.mw.volume_of_correlation.mw_type, "Protein");
        assert_eq!(record.mw.bayes.ci_upper, 176.4);
        assert_eq!(
            record.mw.computed_methods(),
            vec![
                MwMethod::PorodVolume,
                MwMethod::VolumeOfCorrelation,
                MwMethod::Bayesian
            ]
        );

        assert!(record.gnom.has_fit());
        assert_eq!(record.gnom.quality, "EXCELLENT");
        assert!(record.bift.has_fit());
        assert_eq!(record.bift.dmax_err, 3.1);

        assert_eq!(record.metadata.file_prefix, "GI_sec");
        assert!(record.metadata.absolute_scale);
        assert_eq!(record.metadata.detector, "Pilatus3 X 1M");
        assert_eq!(record.metadata.raw_version, "2.1.1");
        assert_eq!(record.metadata.wavelength, 1.033);
        assert_eq!(record.metadata.q_range, "0.0103 to 0.28");
        assert_eq!(record.label(), "GI_sec");
    }

    #[test]
    fn missing_analysis_leaves_defaults() {
        let source = profile_source(json!({}));
        let record = RecordExtractor.profile(&source);

        assert!(!record.guinier.has_fit());
        assert!(!record.gnom.has_fit());
        assert!(record.mw.computed_methods().is_empty());
        assert_eq!(record.metadata.q_range, "0.0103 to 0.28");
        assert_eq!(record.label(), "glucose_isomerase.dat");
    }

    #[test]
    fn uncoercible_values_are_skipped() {
        let source = profile_source(json!({
            "analysis": {
                "guinier": {
                    "Rg": "not-a-number",
                    "I0": 0.06,
                    "nStart": [1, 2]
                }
            }
        }));

        let record = RecordExtractor.profile(&source);

        assert_eq!(record.guinier.rg, -1.0);
        assert_eq!(record.guinier.i0, 0.06);
        assert_eq!(record.guinier.n_min, -1);
    }

    #[test]
    fn later_translation_entries_win_for_shared_fields() {
        let source = profile_source(json!({
            "calibration_params": {
                "Sample-to-detector distance (mm)": 1500.0,
                "Sample_Detector_Distance": 3693.0
            }
        }));

        let record = RecordExtractor.profile(&source);
        assert_eq!(record.metadata.sample_to_detector_distance, 3693.0);
    }

    #[test]
    fn distribution_normalizes_p_by_i0() {
        let source = IftSource {
            filename: "glucose_isomerase.out".to_string(),
            r: vec![0.0, 25.0, 50.0],
            p: vec![0.0, 0.012, 0.002],
            p_err: vec![0.0, 0.001, 0.0004],
            i0: 0.06,
            dmax: 102.0,
            algorithm: "GNOM".to_string(),
            total_estimate: 0.96,
            quality: "EXCELLENT".to_string(),
            ..IftSource::default()
        };

        let record = RecordExtractor
            .distribution(&source)
            .expect("gnom ift should extract");

        assert_eq!(record.method, DistributionMethod::Gnom);
        assert!((record.p[1] - 0.2).abs() < 1e-12);
        assert_eq!(record.ambiguity, Ambiguity::NotComputed);
        assert_eq!(record.label(), "glucose_isomerase.out");
    }

    #[test]
    fn distribution_with_ambiguity_is_computed() {
        let source = IftSource {
            filename: "lysozyme.out".to_string(),
            algorithm: "BIFT".to_string(),
            dmax: 45.0,
            dmax_err: 1.2,
            ambiguity: Some(AmbiguitySource {
                score: 0.0,
                categories: 1,
                interpretation: "Unambiguous".to_string(),
            }),
            ..IftSource::default()
        };

        let record = RecordExtractor
            .distribution(&source)
            .expect("bift ift should extract");

        assert_eq!(record.method, DistributionMethod::Bift);
        assert!(record.ambiguity.is_computed());
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let source = IftSource {
            filename: "custom.out".to_string(),
            algorithm: "DATGNOM".to_string(),
            ..IftSource::default()
        };

        let error = RecordExtractor
            .distribution(&source)
            .expect_err("unknown algorithm should fail");
        assert_eq!(error.code(), "INPUT.DISTRIBUTION_METHOD");
    }

    #[test]
    fn series_extraction_builds_efa_frames() {
        let source = SeriesSource {
            filename: "GI_sec_run.hdf5".to_string(),
            frames: vec![0.0, 1.0, 2.0, 3.0, 4.0],
            total_i: vec![10.0, 50.0, 90.0, 60.0, 15.0],
            mean_i: vec![1.0, 5.0, 9.0, 6.0, 1.5],
            buffer_range: vec![[0, 1]],
            sample_range: vec![[2, 3]],
            parameters: params_from(json!({
                "analysis": {
                    "efa": {
                        "ranges": [[1, 3], [2, 4]],
                        "fstart": 1,
                        "fend": 4,
                        "nsvs": 2,
                        "iter_limit": 1000,
                        "method": "Hybrid",
                        "profile": "Subtracted",
                        "tolerance": 1e-12
                    }
                }
            })),
            representative_profile: Some(ProfileSource {
                filename: "GI_sec_0001.dat".to_string(),
                q: vec![0.0103, 0.28],
                i: vec![1.0, 0.5],
                err: vec![0.1, 0.05],
                parameters: params_from(json!({
                    "counters": {"File_prefix": "GI_sec"}
                })),
            }),
            ..SeriesSource::default()
        };

        let record = RecordExtractor.series(&source);

        assert_eq!(record.label(), "GI_sec");
        assert_eq!(record.buffer_range, vec![(0, 1)]);
        assert_eq!(record.sample_range, vec![(2, 3)]);

        let efa = record.efa.expect("series should carry efa analysis");
        assert_eq!(efa.ranges, vec![(1, 3), (2, 4)]);
        assert_eq!(efa.frames, vec![1, 2, 3, 4]);
        assert_eq!(efa.n_components, 2);
        assert!(!efa.has_extra_data());
    }

    #[test]
    fn series_without_efa_namespace_has_no_analysis() {
        let source = SeriesSource {
            filename: "buffer_run.hdf5".to_string(),
            frames: vec![0.0, 1.0],
            total_i: vec![10.0, 11.0],
            mean_i: vec![1.0, 1.1],
            ..SeriesSource::default()
        };

        let record = RecordExtractor.series(&source);
        assert!(record.efa.is_none());
        assert_eq!(record.label(), "buffer_run.hdf5");
    }
}
