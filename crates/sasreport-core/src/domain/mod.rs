pub mod errors;
pub mod records;

pub use errors::{ReportError, ReportErrorCategory, ReportResult};
