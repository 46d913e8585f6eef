//! Canonical in-memory records extracted from saved analysis state.
//!
//! These are the types the table, figure, and layout builders consume. All
//! of them are total: extraction fills in sentinel defaults for anything the
//! source did not carry, so consumers never deal with partially missing
//! records.

mod analysis;
mod distribution;
mod metadata;
mod profile;
mod series;
mod shape;

pub use analysis::{
    AbsoluteMwRecord, BayesMwRecord, BiftAnalysis, GnomAnalysis, GuinierRecord, MwAnalysis,
    MwMethod, PorodMwRecord, ReferenceMwRecord, ShapeSizeMwRecord, VcMwRecord,
};
pub use distribution::{Ambiguity, DistributionMethod, DistributionRecord};
pub use metadata::MetadataRecord;
pub use profile::ProfileRecord;
pub use series::{ComponentProfile, EfaAnalysis, SeriesRecord};
pub use shape::BeadModelRecord;
