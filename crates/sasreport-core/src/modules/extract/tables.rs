//! Source-key to record-field translation tables.
//!
//! Each analysis namespace gets a closed field enum plus a const table of
//! `(source key, field)` pairs. Extraction walks the table in order, so when
//! two source keys feed the same field (detector distance and wavelength
//! have both a spelled-out and an underscored variant) the later entry wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuinierField {
    Rg,
    I0,
    RgErr,
    I0Err,
    NMin,
    NMax,
    QMin,
    QMax,
    QRgMin,
    QRgMax,
    RSq,
}

pub(crate) const GUINIER_TABLE: [(&str, GuinierField); 11] = [
    ("Rg", GuinierField::Rg),
    ("I0", GuinierField::I0),
    ("Rg_err", GuinierField::RgErr),
    ("I0_err", GuinierField::I0Err),
    ("nStart", GuinierField::NMin),
    ("nEnd", GuinierField::NMax),
    ("qStart", GuinierField::QMin),
    ("qEnd", GuinierField::QMax),
    ("qRg_min", GuinierField::QRgMin),
    ("qRg_max", GuinierField::QRgMax),
    ("rsq", GuinierField::RSq),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AbsoluteMwField {
    Mw,
    BufferDensity,
    ProteinDensity,
    PartialSpecificVolume,
}

pub(crate) const ABSOLUTE_MW_TABLE: [(&str, AbsoluteMwField); 4] = [
    ("MW", AbsoluteMwField::Mw),
    ("Density_buffer", AbsoluteMwField::BufferDensity),
    ("Density_dry_protein", AbsoluteMwField::ProteinDensity),
    ("Partial_specific_volume", AbsoluteMwField::PartialSpecificVolume),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReferenceMwField {
    Mw,
}

pub(crate) const REFERENCE_MW_TABLE: [(&str, ReferenceMwField); 1] = [("MW", ReferenceMwField::Mw)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PorodMwField {
    Mw,
    Density,
    QMax,
    CorrectedVolume,
    Volume,
    Cutoff,
}

pub(crate) const POROD_MW_TABLE: [(&str, PorodMwField); 6] = [
    ("MW", PorodMwField::Mw),
    ("Density", PorodMwField::Density),
    ("Q_max", PorodMwField::QMax),
    ("VPorod_Corrected", PorodMwField::CorrectedVolume),
    ("VPorod", PorodMwField::Volume),
    ("Cutoff", PorodMwField::Cutoff),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VcMwField {
    Mw,
    MwType,
    QMax,
    Volume,
    Cutoff,
}

pub(crate) const VC_MW_TABLE: [(&str, VcMwField); 5] = [
    ("MW", VcMwField::Mw),
    ("Type", VcMwField::MwType),
    ("Q_max", VcMwField::QMax),
    ("Vcor", VcMwField::Volume),
    ("Cutoff", VcMwField::Cutoff),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeSizeMwField {
    Mw,
    Dmax,
    Shape,
}

pub(crate) const SHAPE_SIZE_MW_TABLE: [(&str, ShapeSizeMwField); 3] = [
    ("MW", ShapeSizeMwField::Mw),
    ("Dmax", ShapeSizeMwField::Dmax),
    ("Shape", ShapeSizeMwField::Shape),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BayesMwField {
    Mw,
    Probability,
    CiLower,
    CiUpper,
    CiProbability,
}

pub(crate) const BAYES_MW_TABLE: [(&str, BayesMwField); 5] = [
    ("MW", BayesMwField::Mw),
    ("MWProbability", BayesMwField::Probability),
    ("ConfidenceIntervalLower", BayesMwField::CiLower),
    ("ConfidenceIntervalUpper", BayesMwField::CiUpper),
    ("ConfidenceIntervalProbability", BayesMwField::CiProbability),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BiftField {
    Dmax,
    Rg,
    I0,
    DmaxErr,
    RgErr,
    I0Err,
    ChiSq,
    QMin,
    QMax,
    Evidence,
    LogAlpha,
    EvidenceErr,
    LogAlphaErr,
}

pub(crate) const BIFT_TABLE: [(&str, BiftField); 13] = [
    ("Dmax", BiftField::Dmax),
    ("Real_Space_Rg", BiftField::Rg),
    ("Real_Space_I0", BiftField::I0),
    ("Dmax_Err", BiftField::DmaxErr),
    ("Real_Space_Rg_Err", BiftField::RgErr),
    ("Real_Space_I0_Err", BiftField::I0Err),
    ("ChiSquared", BiftField::ChiSq),
    ("qStart", BiftField::QMin),
    ("qEnd", BiftField::QMax),
    ("Evidence", BiftField::Evidence),
    ("LogAlpha", BiftField::LogAlpha),
    ("Evidence_Err", BiftField::EvidenceErr),
    ("LogAlpha_Err", BiftField::LogAlphaErr),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GnomField {
    Dmax,
    Rg,
    I0,
    RgErr,
    I0Err,
    ChiSq,
    TotalEstimate,
    Quality,
    QMin,
    QMax,
}

pub(crate) const GNOM_TABLE: [(&str, GnomField); 10] = [
    ("Dmax", GnomField::Dmax),
    ("Real_Space_Rg", GnomField::Rg),
    ("Real_Space_I0", GnomField::I0),
    ("Real_Space_Rg_Err", GnomField::RgErr),
    ("Real_Space_I0_Err", GnomField::I0Err),
    ("GNOM_ChiSquared", GnomField::ChiSq),
    ("Total_Estimate", GnomField::TotalEstimate),
    ("GNOM_Quality_Assessment", GnomField::Quality),
    ("qStart", GnomField::QMin),
    ("qEnd", GnomField::QMax),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetadataField {
    SampleToDetectorDistance,
    Wavelength,
    ExposureTime,
    ExposurePeriod,
    FlowRate,
    Detector,
    Instrument,
    FilePrefix,
    Date,
    ExperimentType,
    Sample,
    Buffer,
    Temperature,
    LoadedVolume,
    Concentration,
    Column,
    Mixer,
    Transmission,
    Notes,
}

pub(crate) const CALIBRATION_TABLE: [(&str, MetadataField); 4] = [
    (
        "Sample-to-detector distance (mm)",
        MetadataField::SampleToDetectorDistance,
    ),
    (
        "Sample_Detector_Distance",
        MetadataField::SampleToDetectorDistance,
    ),
    ("Wavelength (A)", MetadataField::Wavelength),
    ("Wavelength", MetadataField::Wavelength),
];

pub(crate) const COUNTERS_TABLE: [(&str, MetadataField); 18] = [
    ("Flow rate (ml/min)", MetadataField::FlowRate),
    ("LC_flow_rate_mL/min", MetadataField::FlowRate),
    ("Exposure time/frame (s)", MetadataField::ExposureTime),
    ("Exposure_time/frame_s", MetadataField::ExposureTime),
    ("Exposure_period/frame_s", MetadataField::ExposurePeriod),
    ("Instrument", MetadataField::Instrument),
    ("File_prefix", MetadataField::FilePrefix),
    ("Date", MetadataField::Date),
    ("Experiment_type", MetadataField::ExperimentType),
    ("Sample", MetadataField::Sample),
    ("Buffer", MetadataField::Buffer),
    ("Temperature_C", MetadataField::Temperature),
    ("Loaded_volume_uL", MetadataField::LoadedVolume),
    ("Concentration_mg/ml", MetadataField::Concentration),
    ("Column", MetadataField::Column),
    ("Mixer", MetadataField::Mixer),
    ("Nominal_Transmission_12_keV", MetadataField::Transmission),
    ("Notes", MetadataField::Notes),
];

pub(crate) const HEADER_METADATA_TABLE: [(&str, MetadataField); 1] =
    [("Detector", MetadataField::Detector)];
