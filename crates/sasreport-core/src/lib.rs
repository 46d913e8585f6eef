//! Report generation for small-angle X-ray scattering (SAXS) data.
//!
//! The crate turns saved analysis state into a finished PDF report. Input
//! arrives as a JSON snapshot of profiles, P(r) distributions, and series
//! ([`source`]), is extracted into canonical records ([`domain::records`]),
//! and flows through the pipeline stages in [`modules`]: summary-table
//! schemas, figure specs, panel layout selection, and deconvolution/bead-model
//! file parsing. The backends in [`render`] rasterize figures and lay the
//! blocks out as PDF pages.
//!
//! [`modules::report::generate_report`] is the one-call entry point used by
//! the command-line frontend.

pub mod common;
pub mod domain;
pub mod modules;
pub mod render;
pub mod source;

pub use domain::errors::{ReportError, ReportErrorCategory, ReportResult};
pub use modules::report::{ReportInput, generate_report};
pub use source::{SourceSnapshot, load_snapshot};
