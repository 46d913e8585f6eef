use crate::domain::records::metadata::MetadataRecord;

/// One deconvolved component profile from an EFA run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentProfile {
    pub q: Vec<f64>,
    pub i: Vec<f64>,
}

/// Evolving factor analysis results attached to a series.
///
/// The core parameters (`ranges`, frame window, component count) come from
/// the series analysis namespace. The per-frame concentration matrix, the
/// rotation chi-square trace, and the component profiles are only available
/// when the deconvolution output itself was captured; [`Self::has_extra_data`]
/// reports whether they are populated.
#[derive(Debug, Clone, PartialEq)]
pub struct EfaAnalysis {
    pub ranges: Vec<(i64, i64)>,
    pub frame_start: i64,
    pub frame_end: i64,
    pub n_components: i64,
    pub iteration_limit: i64,
    pub method: String,
    pub profile_type: String,
    pub tolerance: f64,
    pub frames: Vec<i64>,
    pub concentrations: Vec<Vec<f64>>,
    pub rotation_chi_sq: Vec<f64>,
    pub component_profiles: Vec<ComponentProfile>,
}

impl Default for EfaAnalysis {
    fn default() -> Self {
        Self {
            ranges: Vec::new(),
            frame_start: -1,
            frame_end: -1,
            n_components: -1,
            iteration_limit: -1,
            method: String::new(),
            profile_type: String::new(),
            tolerance: -1.0,
            frames: Vec::new(),
            concentrations: Vec::new(),
            rotation_chi_sq: Vec::new(),
            component_profiles: Vec::new(),
        }
    }
}

impl EfaAnalysis {
    pub fn has_extra_data(&self) -> bool {
        !self.concentrations.is_empty()
    }
}

/// A chromatography series: per-frame intensity traces, optional per-frame
/// calculated values, the analysis ranges chosen by the user, and metadata
/// taken from the series' representative profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesRecord {
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
    pub buffer_range: Vec<(i64, i64)>,
    pub sample_range: Vec<(i64, i64)>,
    pub baseline_start_range: Option<(i64, i64)>,
    pub baseline_end_range: Option<(i64, i64)>,
    pub baseline_type: String,
    pub baseline_corrected: bool,
    pub subtracted: bool,
    pub metadata: MetadataRecord,
    pub efa: Option<EfaAnalysis>,
}

impl SeriesRecord {
    pub fn label(&self) -> &str {
        self.metadata.label_or(&self.filename)
    }
}
