//! Rendering backends for report output.
//!
//! The assembler produces renderer-independent [`Block`]s. The backends
//! here turn figure specs into bitmaps ([`figure`]) and block lists into a
//! finished document ([`pdf`]); tests substitute lightweight fakes through
//! the same traits.

pub mod figure;
pub mod pdf;

use std::path::{Path, PathBuf};

use crate::domain::errors::ReportResult;
use crate::modules::figure::FigureSpec;
use crate::modules::table::Table;

/// One flowable element of the report, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// Line-break-preserving text set in a fixed-width font.
    Preformatted { text: String },
    /// Transposed data table, optionally captioned below.
    Table {
        table: Table,
        caption: Option<String>,
    },
    /// Pre-rendered bitmap and its caption, kept together on one page.
    Figure {
        path: PathBuf,
        width_in: f64,
        height_in: f64,
        caption: String,
    },
}

/// Renders figure specs to bitmap files for embedding.
pub trait FigureRenderer {
    fn render(&self, spec: &FigureSpec, path: &Path) -> ReportResult<()>;
}

/// Lays out a block list into a finished document.
pub trait DocumentRenderer {
    fn render(&self, blocks: &[Block]) -> ReportResult<Vec<u8>>;
}
