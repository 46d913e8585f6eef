//! Per-profile analysis results. Numeric fields default to `-1` and string
//! fields to empty, which downstream table builders render as blank cells.

/// Guinier fit results. `n_min`/`n_max` are point indices into the profile
/// arrays, `q_min`/`q_max` the corresponding scattering vector values.
#[derive(Debug, Clone, PartialEq)]
pub struct GuinierRecord {
    pub rg: f64,
    pub i0: f64,
    pub rg_err: f64,
    pub i0_err: f64,
    pub n_min: i64,
    pub n_max: i64,
    pub q_min: f64,
    pub q_max: f64,
    pub q_rg_min: f64,
    pub q_rg_max: f64,
    pub r_sq: f64,
}

impl Default for GuinierRecord {
    fn default() -> Self {
        Self {
            rg: -1.0,
            i0: -1.0,
            rg_err: -1.0,
            i0_err: -1.0,
            n_min: -1,
            n_max: -1,
            q_min: -1.0,
            q_max: -1.0,
            q_rg_min: -1.0,
            q_rg_max: -1.0,
            r_sq: -1.0,
        }
    }
}

impl GuinierRecord {
    pub fn has_fit(&self) -> bool {
        self.rg != -1.0
    }
}

/// Molecular weight estimation methods, in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MwMethod {
    Absolute,
    Reference,
    PorodVolume,
    VolumeOfCorrelation,
    ShapeAndSize,
    Bayesian,
}

impl MwMethod {
    pub const ALL: [MwMethod; 6] = [
        MwMethod::Absolute,
        MwMethod::Reference,
        MwMethod::PorodVolume,
        MwMethod::VolumeOfCorrelation,
        MwMethod::ShapeAndSize,
        MwMethod::Bayesian,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MwMethod::Absolute => "Absolute",
            MwMethod::Reference => "Reference",
            MwMethod::PorodVolume => "PorodVolume",
            MwMethod::VolumeOfCorrelation => "VolumeOfCorrelation",
            MwMethod::ShapeAndSize => "ShapeAndSize",
            MwMethod::Bayesian => "Bayesian",
        }
    }

    /// Key under the `molecularWeight` analysis namespace that carries this
    /// method's results.
    pub const fn source_key(self) -> &'static str {
        match self {
            MwMethod::Absolute => "Absolute",
            MwMethod::Reference => "I(0)Concentration",
            MwMethod::PorodVolume => "PorodVolume",
            MwMethod::VolumeOfCorrelation => "VolumeOfCorrelation",
            MwMethod::ShapeAndSize => "ShapeAndSize",
            MwMethod::Bayesian => "DatmwBayes",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteMwRecord {
    pub mw: f64,
    pub buffer_density: f64,
    pub protein_density: f64,
    pub partial_specific_volume: f64,
}

impl Default for AbsoluteMwRecord {
    fn default() -> Self {
        Self {
            mw: -1.0,
            buffer_density: -1.0,
            protein_density: -1.0,
            partial_specific_volume: -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMwRecord {
    pub mw: f64,
}

impl Default for ReferenceMwRecord {
    fn default() -> Self {
        Self { mw: -1.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PorodMwRecord {
    pub mw: f64,
    pub density: f64,
    pub q_max: f64,
    pub corrected_volume: f64,
    pub volume: f64,
    pub cutoff: String,
}

impl Default for PorodMwRecord {
    fn default() -> Self {
        Self {
            mw: -1.0,
            density: -1.0,
            q_max: -1.0,
            corrected_volume: -1.0,
            volume: -1.0,
            cutoff: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcMwRecord {
    pub mw: f64,
    pub mw_type: String,
    pub q_max: f64,
    pub volume_of_correlation: f64,
    pub cutoff: String,
}

impl Default for VcMwRecord {
    fn default() -> Self {
        Self {
            mw: -1.0,
            mw_type: String::new(),
            q_max: -1.0,
            volume_of_correlation: -1.0,
            cutoff: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSizeMwRecord {
    pub mw: f64,
    pub dmax: f64,
    pub shape: String,
}

impl Default for ShapeSizeMwRecord {
    fn default() -> Self {
        Self {
            mw: -1.0,
            dmax: -1.0,
            shape: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BayesMwRecord {
    pub mw: f64,
    pub probability: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub ci_probability: f64,
}

impl Default for BayesMwRecord {
    fn default() -> Self {
        Self {
            mw: -1.0,
            probability: -1.0,
            ci_lower: -1.0,
            ci_upper: -1.0,
            ci_probability: -1.0,
        }
    }
}

/// One record per estimation method, whether or not the method ran.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MwAnalysis {
    pub absolute: AbsoluteMwRecord,
    pub reference: ReferenceMwRecord,
    pub porod: PorodMwRecord,
    pub volume_of_correlation: VcMwRecord,
    pub shape_and_size: ShapeSizeMwRecord,
    pub bayes: BayesMwRecord,
}

impl MwAnalysis {
    pub fn value_for(&self, method: MwMethod) -> f64 {
        match method {
            MwMethod::Absolute => self.absolute.mw,
            MwMethod::Reference => self.reference.mw,
            MwMethod::PorodVolume => self.porod.mw,
            MwMethod::VolumeOfCorrelation => self.volume_of_correlation.mw,
            MwMethod::ShapeAndSize => self.shape_and_size.mw,
            MwMethod::Bayesian => self.bayes.mw,
        }
    }

    pub fn computed_methods(&self) -> Vec<MwMethod> {
        MwMethod::ALL
            .into_iter()
            .filter(|method| self.value_for(*method) != -1.0)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GnomAnalysis {
    pub dmax: f64,
    pub rg: f64,
    pub i0: f64,
    pub rg_err: f64,
    pub i0_err: f64,
    pub chi_sq: f64,
    pub total_estimate: f64,
    pub quality: String,
    pub q_min: f64,
    pub q_max: f64,
}

impl Default for GnomAnalysis {
    fn default() -> Self {
        Self {
            dmax: -1.0,
            rg: -1.0,
            i0: -1.0,
            rg_err: -1.0,
            i0_err: -1.0,
            chi_sq: -1.0,
            total_estimate: -1.0,
            quality: String::new(),
            q_min: -1.0,
            q_max: -1.0,
        }
    }
}

impl GnomAnalysis {
    pub fn has_fit(&self) -> bool {
        self.dmax != -1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiftAnalysis {
    pub dmax: f64,
    pub rg: f64,
    pub i0: f64,
    pub dmax_err: f64,
    pub rg_err: f64,
    pub i0_err: f64,
    pub chi_sq: f64,
    pub q_min: f64,
    pub q_max: f64,
    pub evidence: f64,
    pub log_alpha: f64,
    pub evidence_err: f64,
    pub log_alpha_err: f64,
}

impl Default for BiftAnalysis {
    fn default() -> Self {
        Self {
            dmax: -1.0,
            rg: -1.0,
            i0: -1.0,
            dmax_err: -1.0,
            rg_err: -1.0,
            i0_err: -1.0,
            chi_sq: -1.0,
            q_min: -1.0,
            q_max: -1.0,
            evidence: -1.0,
            log_alpha: -1.0,
            evidence_err: -1.0,
            log_alpha_err: -1.0,
        }
    }
}

impl BiftAnalysis {
    pub fn has_fit(&self) -> bool {
        self.dmax != -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::{GuinierRecord, MwAnalysis, MwMethod};

    #[test]
    fn defaults_use_unset_sentinels() {
        let guinier = GuinierRecord::default();
        assert!(!guinier.has_fit());
        assert_eq!(guinier.n_min, -1);
        assert_eq!(guinier.q_rg_max, -1.0);
    }

    #[test]
    fn mw_methods_keep_report_order() {
        let labels: Vec<&str> = MwMethod::ALL.iter().map(|m| m.source_key()).collect();
        assert_eq!(
            labels,
            vec![
                "Absolute",
                "I(0)Concentration",
                "PorodVolume",
                "VolumeOfCorrelation",
                "ShapeAndSize",
                "DatmwBayes",
            ]
        );
    }

    #[test]
    fn computed_methods_skip_unset_values() {
        let mut mw = MwAnalysis::default();
        mw.porod.mw = 62.4;
        mw.bayes.mw = 65.1;

        assert_eq!(
            mw.computed_methods(),
            vec![MwMethod::PorodVolume, MwMethod::Bayesian]
        );
    }
}
