use crate::domain::records::analysis::{BiftAnalysis, GnomAnalysis, GuinierRecord, MwAnalysis};
use crate::domain::records::metadata::MetadataRecord;

/// A single scattering profile with its extracted analysis results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileRecord {
    pub filename: String,
    pub q: Vec<f64>,
    pub i: Vec<f64>,
    pub err: Vec<f64>,
    pub guinier: GuinierRecord,
    pub mw: MwAnalysis,
    pub gnom: GnomAnalysis,
    pub bift: BiftAnalysis,
    pub metadata: MetadataRecord,
}

impl ProfileRecord {
    pub fn label(&self) -> &str {
        self.metadata.label_or(&self.filename)
    }
}
