/// Collection metadata pulled from a profile's header namespaces.
///
/// Every field is optional in the source data; unset numeric fields stay at
/// `-1` and unset strings stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub sample_to_detector_distance: f64,
    pub wavelength: f64,
    pub exposure_time: f64,
    pub exposure_period: f64,
    pub flow_rate: f64,
    pub detector: String,
    pub instrument: String,
    pub absolute_scale: bool,
    pub file_prefix: String,
    pub date: String,
    pub raw_version: String,
    pub q_range: String,
    pub experiment_type: String,
    pub sample: String,
    pub buffer: String,
    pub temperature: f64,
    pub loaded_volume: f64,
    pub concentration: f64,
    pub column: String,
    pub mixer: String,
    pub transmission: f64,
    pub notes: String,
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self {
            sample_to_detector_distance: -1.0,
            wavelength: -1.0,
            exposure_time: -1.0,
            exposure_period: -1.0,
            flow_rate: -1.0,
            detector: String::new(),
            instrument: String::new(),
            absolute_scale: false,
            file_prefix: String::new(),
            date: String::new(),
            raw_version: String::new(),
            q_range: String::new(),
            experiment_type: String::new(),
            sample: String::new(),
            buffer: String::new(),
            temperature: -1.0,
            loaded_volume: -1.0,
            concentration: -1.0,
            column: String::new(),
            mixer: String::new(),
            transmission: -1.0,
            notes: String::new(),
        }
    }
}

impl MetadataRecord {
    /// Display label for the record: the file prefix when one was recorded,
    /// otherwise the caller's fallback (usually the filename).
    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.file_prefix.is_empty() {
            fallback
        } else {
            &self.file_prefix
        }
    }
}
