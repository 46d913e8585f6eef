//! Report assembly: analysis records in, finished PDF out.
//!
//! [`ReportAssembler`] walks the fixed section order (overview, experimental
//! parameters, series and deconvolution results, Guinier, molecular weight,
//! GNOM, BIFT, bead models), rendering figures into a per-run scratch
//! directory that is removed on every exit path.

mod schemas;

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::{ReportError, ReportResult};
use crate::domain::records::{
    BeadModelRecord, DistributionMethod, DistributionRecord, ProfileRecord, SeriesRecord,
};
use crate::modules::figure::{efa_figure, overview_figure};
use crate::modules::layout::PanelLayout;
use crate::render::figure::BitmapFigureRenderer;
use crate::render::pdf::PdfDocumentRenderer;
use crate::render::{Block, DocumentRenderer, FigureRenderer};

/// Everything that can appear in one report.
///
/// `bead_models` mirrors the caller's shape-file list positionally, so a
/// file that failed to parse stays as `None` without shifting later entries.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub profiles: Vec<ProfileRecord>,
    pub distributions: Vec<DistributionRecord>,
    pub series: Vec<SeriesRecord>,
    pub bead_models: Vec<Option<BeadModelRecord>>,
}

/// Builds the report block list and hands it to the document backend.
pub struct ReportAssembler<'a, F, D> {
    figures: &'a F,
    document: &'a D,
}

impl<'a, F: FigureRenderer, D: DocumentRenderer> ReportAssembler<'a, F, D> {
    pub fn new(figures: &'a F, document: &'a D) -> Self {
        Self { figures, document }
    }

    pub fn assemble(&self, input: &ReportInput) -> ReportResult<Vec<u8>> {
        let scratch = tempfile::tempdir().map_err(|err| {
            ReportError::io_system(
                "IO.SCRATCH_DIR",
                format!("failed to create figure scratch directory: {err}"),
            )
        })?;

        let blocks = self.build_blocks(input, scratch.path())?;
        self.document.render(&blocks)
    }

    fn build_blocks(&self, input: &ReportInput, scratch: &Path) -> ReportResult<Vec<Block>> {
        let profiles = &input.profiles;
        let distributions = &input.distributions;
        let series = &input.series;

        let mut blocks = Vec::new();

        let name_str = schemas::display_names(profiles, distributions, series).join(", ");
        let date_str = schemas::collection_dates(profiles, distributions, series).join(", ");

        let title = if name_str.is_empty() {
            "SAXS data overview".to_string()
        } else {
            format!("{name_str} SAXS data overview")
        };
        blocks.push(Block::Heading {
            level: 1,
            text: title,
        });
        blocks.push(Block::Heading {
            level: 2,
            text: "Summary:".to_string(),
        });
        blocks.push(Block::Preformatted {
            text: format!("Data name(s): {name_str}\nCollection date(s): {date_str}"),
        });

        let layout = PanelLayout::select(
            !profiles.is_empty(),
            !distributions.is_empty(),
            !series.is_empty(),
        );
        if let Some(spec) = overview_figure(&layout, profiles, distributions, series) {
            let path = scratch.join("summary_figure.png");
            self.figures.render(&spec, &path)?;
            blocks.push(Block::Figure {
                path,
                width_in: spec.width_in,
                height_in: spec.height_in,
                caption: layout.caption(&name_str, series.len()),
            });
        }

        if let Some(table) = schemas::overview_table(profiles) {
            let caption = if name_str.is_empty() {
                "SAXS data summary table.".to_string()
            } else {
                format!("SAXS data summary table for {name_str}.")
            };
            blocks.push(Block::Table {
                table,
                caption: Some(caption),
            });
        }

        if let Some(table) = schemas::experimental_parameters_table(profiles, series) {
            blocks.push(Block::Heading {
                level: 2,
                text: "Experimental parameters:".to_string(),
            });
            blocks.push(Block::Table {
                table,
                caption: None,
            });
        }

        if !series.is_empty() {
            self.series_blocks(series, scratch, &mut blocks)?;
        }

        if !profiles.is_empty() {
            if let Some(table) = schemas::guinier_table(profiles) {
                blocks.push(Block::Heading {
                    level: 2,
                    text: "Guinier:".to_string(),
                });
                blocks.push(Block::Table {
                    table,
                    caption: None,
                });
            }

            if let Some(table) = schemas::molecular_weight_table(profiles) {
                blocks.push(Block::Heading {
                    level: 2,
                    text: "Molecular weight:".to_string(),
                });
                blocks.push(Block::Table {
                    table,
                    caption: None,
                });
            }
        }

        let gnom: Vec<&DistributionRecord> = distributions
            .iter()
            .filter(|d| d.method == DistributionMethod::Gnom)
            .collect();
        if let Some(table) = schemas::gnom_table(&gnom) {
            blocks.push(Block::Heading {
                level: 2,
                text: "GNOM IFT:".to_string(),
            });
            blocks.push(Block::Table {
                table,
                caption: None,
            });
        }

        let bift: Vec<&DistributionRecord> = distributions
            .iter()
            .filter(|d| d.method == DistributionMethod::Bift)
            .collect();
        if let Some(table) = schemas::bift_table(&bift) {
            blocks.push(Block::Heading {
                level: 2,
                text: "BIFT:".to_string(),
            });
            blocks.push(Block::Table {
                table,
                caption: None,
            });
        }

        let bead_models: Vec<&BeadModelRecord> = input.bead_models.iter().flatten().collect();
        if let Some(table) = schemas::bead_model_table(&bead_models) {
            blocks.push(Block::Heading {
                level: 2,
                text: "Bead model reconstructions:".to_string(),
            });
            blocks.push(Block::Table {
                table,
                caption: None,
            });
        }

        Ok(blocks)
    }

    fn series_blocks(
        &self,
        series: &[SeriesRecord],
        scratch: &Path,
        blocks: &mut Vec<Block>,
    ) -> ReportResult<()> {
        if let Some(table) = schemas::series_table(series) {
            blocks.push(Block::Heading {
                level: 2,
                text: "Series:".to_string(),
            });
            blocks.push(Block::Table {
                table,
                caption: None,
            });
        }

        for (index, record) in series.iter().enumerate() {
            let Some(efa) = &record.efa else {
                continue;
            };

            let heading = if series.len() > 1 {
                format!("{} EFA results:", record.label())
            } else {
                "EFA results:".to_string()
            };
            blocks.push(Block::Heading {
                level: 3,
                text: heading,
            });

            if let Some(table) = schemas::efa_table(record.label(), efa) {
                blocks.push(Block::Table {
                    table,
                    caption: None,
                });
            }

            let spec = efa_figure(record, efa);
            let path = scratch.join(format!("efa_figure_{index}.png"));
            self.figures.render(&spec, &path)?;
            blocks.push(Block::Figure {
                path,
                width_in: spec.width_in,
                height_in: spec.height_in,
                caption: efa_caption(efa.has_extra_data()),
            });
        }

        Ok(())
    }
}

fn efa_caption(has_extra_data: bool) -> String {
    let mut caption = "EFA deconvolution results. a) The full series intensity (blue), the \
        selected intensity range for EFA (black), and (if available) Rg values (red). b) The \
        selected intensity range for EFA (black), and the individual component ranges for \
        deconvolution, with component range 0 starting at the top left, and component number \
        increasing in descending order to the right."
        .to_string();

    if has_extra_data {
        caption.push_str(
            " c) Mean chi^2 values between the fit of the EFA deconvolution and the original \
            data. d) Area normalized concentration profiles for each component. Colors match \
            the component range colors in b.",
        );
        caption.push_str(
            " e) Deconvolved scattering profiles. Colors match the component range colors in \
            b and the concentration range colors in d.",
        );
    }

    caption
}

/// Output file name: the input's stem with a `.pdf` extension.
fn output_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name);
    format!("{stem}.pdf")
}

/// Renders `input` to `<stem>.pdf` under `out_dir` with the default
/// plotters/PDF backends and returns the written path.
pub fn generate_report(name: &str, out_dir: &Path, input: &ReportInput) -> ReportResult<PathBuf> {
    let figures = BitmapFigureRenderer::new();
    let document = PdfDocumentRenderer::new();
    let bytes = ReportAssembler::new(&figures, &document).assemble(input)?;

    let path = out_dir.join(output_name(name));
    fs::write(&path, &bytes).map_err(|err| {
        ReportError::io_system(
            "IO.REPORT_WRITE",
            format!("failed to write report {}: {err}", path.display()),
        )
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use super::{ReportAssembler, ReportInput, output_name};
    use crate::domain::errors::{ReportError, ReportResult};
    use crate::domain::records::{
        BeadModelRecord, DistributionMethod, DistributionRecord, EfaAnalysis, GuinierRecord,
        ProfileRecord, SeriesRecord,
    };
    use crate::modules::figure::FigureSpec;
    use crate::render::{Block, DocumentRenderer, FigureRenderer};

    #[derive(Default)]
    struct CapturingFigures {
        specs: RefCell<Vec<FigureSpec>>,
        paths: RefCell<Vec<PathBuf>>,
    }

    impl FigureRenderer for CapturingFigures {
        fn render(&self, spec: &FigureSpec, path: &Path) -> ReportResult<()> {
            std::fs::write(path, b"png").expect("scratch directory should be writable");
            self.specs.borrow_mut().push(spec.clone());
            self.paths.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    #[derive(Default)]
    struct BlockCapture {
        blocks: RefCell<Vec<Block>>,
    }

    impl DocumentRenderer for BlockCapture {
        fn render(&self, blocks: &[Block]) -> ReportResult<Vec<u8>> {
            *self.blocks.borrow_mut() = blocks.to_vec();
            Ok(b"%PDF-stub".to_vec())
        }
    }

    struct FailingDocument;

    impl DocumentRenderer for FailingDocument {
        fn render(&self, _blocks: &[Block]) -> ReportResult<Vec<u8>> {
            Err(ReportError::render("RENDER.PDF", "forced failure"))
        }
    }

    fn guinier_profile(name: &str) -> ProfileRecord {
        ProfileRecord {
            filename: name.to_string(),
            q: vec![0.01, 0.02, 0.03, 0.04],
            i: vec![102.0, 95.0, 84.0, 70.0],
            err: vec![1.0, 1.0, 1.0, 1.0],
            guinier: GuinierRecord {
                rg: 25.3,
                i0: 102.4,
                rg_err: 0.2,
                i0_err: 0.5,
                n_min: 0,
                n_max: 3,
                q_min: 0.01,
                q_max: 0.04,
                q_rg_min: 0.253,
                q_rg_max: 1.012,
                r_sq: 0.998,
                ..GuinierRecord::default()
            },
            ..ProfileRecord::default()
        }
    }

    fn efa_series(name: &str) -> SeriesRecord {
        SeriesRecord {
            filename: name.to_string(),
            frames: (0..10).map(f64::from).collect(),
            total_i: vec![1.0, 2.0, 8.0, 20.0, 32.0, 28.0, 15.0, 6.0, 2.0, 1.0],
            buffer_range: vec![(0, 2)],
            sample_range: vec![(3, 5)],
            efa: Some(EfaAnalysis {
                ranges: vec![(2, 5), (4, 7)],
                frame_start: 2,
                frame_end: 7,
                n_components: 2,
                ..EfaAnalysis::default()
            }),
            ..SeriesRecord::default()
        }
    }

    fn gnom_ift(name: &str) -> DistributionRecord {
        DistributionRecord {
            filename: name.to_string(),
            r: vec![0.0, 30.0, 60.0],
            p: vec![0.0, 0.7, 0.0],
            p_err: vec![0.0, 0.05, 0.0],
            q: vec![0.01, 0.15, 0.28],
            i: vec![100.0, 10.0, 1.0],
            i_err: vec![1.0, 0.5, 0.1],
            i_fit: vec![99.0, 10.1, 1.0],
            q_extrap: Vec::new(),
            i_extrap: Vec::new(),
            dmax: 60.2,
            rg: 21.1,
            i0: 0.052,
            rg_err: 0.31,
            i0_err: 0.004,
            chi_sq: 1.052,
            method: DistributionMethod::Gnom,
            dmax_err: -1.0,
            total_estimate: 0.92,
            quality: String::new(),
            ambiguity: Default::default(),
            metadata: Default::default(),
        }
    }

    fn heading_texts(blocks: &[Block], level: u8) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level: l, text } if *l == level => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn single_profile_report_keeps_the_section_order() {
        let input = ReportInput {
            profiles: vec![guinier_profile("glucose_isomerase.dat")],
            ..ReportInput::default()
        };
        let figures = CapturingFigures::default();
        let document = BlockCapture::default();

        ReportAssembler::new(&figures, &document)
            .assemble(&input)
            .expect("assembly should succeed");

        let blocks = document.blocks.borrow();

        assert_eq!(
            heading_texts(&blocks, 1),
            vec!["glucose_isomerase.dat SAXS data overview"]
        );
        assert_eq!(
            heading_texts(&blocks, 2),
            vec![
                "Summary:",
                "Experimental parameters:",
                "Guinier:",
                "Molecular weight:",
            ]
        );

        match &blocks[2] {
            Block::Preformatted { text } => {
                assert_eq!(
                    text,
                    "Data name(s): glucose_isomerase.dat\nCollection date(s): N/A"
                );
            }
            other => panic!("expected the summary preformatted block, got {other:?}"),
        }

        // Profile-only layout: spanning profile panel, Guinier, Kratky.
        let specs = figures.specs.borrow();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].panels.len(), 3);
        assert!(specs[0].panels[0].slot.spans_row);

        let overview = blocks
            .iter()
            .find_map(|block| match block {
                Block::Table {
                    table,
                    caption: Some(caption),
                } => Some((table, caption)),
                _ => None,
            })
            .expect("overview table should carry a caption");
        assert_eq!(overview.0.rows.len(), 5);
        assert_eq!(
            overview.1,
            "SAXS data summary table for glucose_isomerase.dat."
        );
    }

    #[test]
    fn scratch_directory_is_removed_after_success() {
        let input = ReportInput {
            profiles: vec![guinier_profile("gi.dat")],
            ..ReportInput::default()
        };
        let figures = CapturingFigures::default();
        let document = BlockCapture::default();

        ReportAssembler::new(&figures, &document)
            .assemble(&input)
            .expect("assembly should succeed");

        let rendered = figures.paths.borrow();
        let scratch = rendered[0].parent().expect("figure path should have a parent");
        assert!(!scratch.exists());
    }

    #[test]
    fn scratch_directory_is_removed_when_rendering_fails() {
        let input = ReportInput {
            profiles: vec![guinier_profile("gi.dat")],
            ..ReportInput::default()
        };
        let figures = CapturingFigures::default();

        let err = ReportAssembler::new(&figures, &FailingDocument)
            .assemble(&input)
            .expect_err("document failure should propagate");
        assert_eq!(err.code(), "RENDER.PDF");

        let rendered = figures.paths.borrow();
        let scratch = rendered[0].parent().expect("figure path should have a parent");
        assert!(!scratch.exists());
    }

    #[test]
    fn series_with_deconvolution_gets_a_sub_report() {
        let input = ReportInput {
            series: vec![efa_series("gi_sec.hdf5")],
            ..ReportInput::default()
        };
        let figures = CapturingFigures::default();
        let document = BlockCapture::default();

        ReportAssembler::new(&figures, &document)
            .assemble(&input)
            .expect("assembly should succeed");

        let blocks = document.blocks.borrow();
        assert_eq!(heading_texts(&blocks, 3), vec!["EFA results:"]);

        // Overview and deconvolution figures.
        assert_eq!(figures.specs.borrow().len(), 2);

        let efa_figure = blocks
            .iter()
            .rev()
            .find_map(|block| match block {
                Block::Figure { caption, .. } => Some(caption.clone()),
                _ => None,
            })
            .expect("deconvolution figure should be present");
        assert!(efa_figure.starts_with("EFA deconvolution results."));
        assert!(!efa_figure.contains(" c) "));
    }

    #[test]
    fn multiple_series_label_their_deconvolution_headings() {
        let mut first = efa_series("run_a.hdf5");
        first.metadata.file_prefix = "RunA".to_string();
        let second = efa_series("run_b.hdf5");

        let input = ReportInput {
            series: vec![first, second],
            ..ReportInput::default()
        };
        let figures = CapturingFigures::default();
        let document = BlockCapture::default();

        ReportAssembler::new(&figures, &document)
            .assemble(&input)
            .expect("assembly should succeed");

        let blocks = document.blocks.borrow();
        assert_eq!(
            heading_texts(&blocks, 3),
            vec!["RunA EFA results:", "run_b.hdf5 EFA results:"]
        );
    }

    #[test]
    fn method_specific_sections_follow_the_distributions() {
        let gnom = gnom_ift("gi.out");
        let mut bift = gnom_ift("gi.ift");
        bift.method = DistributionMethod::Bift;
        bift.dmax_err = 1.6;

        let input = ReportInput {
            distributions: vec![gnom, bift],
            bead_models: vec![
                None,
                Some(BeadModelRecord {
                    prefix: "gi_dammif".to_string(),
                    program: "DAMMIF".to_string(),
                    ..BeadModelRecord::default()
                }),
            ],
            ..ReportInput::default()
        };
        let figures = CapturingFigures::default();
        let document = BlockCapture::default();

        ReportAssembler::new(&figures, &document)
            .assemble(&input)
            .expect("assembly should succeed");

        let blocks = document.blocks.borrow();
        assert_eq!(
            heading_texts(&blocks, 2),
            vec![
                "Summary:",
                "GNOM IFT:",
                "BIFT:",
                "Bead model reconstructions:",
            ]
        );

        // Distribution-only layout is a single spanning P(r) panel.
        let specs = figures.specs.borrow();
        assert_eq!(specs[0].panels.len(), 1);
    }

    #[test]
    fn empty_input_still_produces_a_titled_document() {
        let input = ReportInput::default();
        let figures = CapturingFigures::default();
        let document = BlockCapture::default();

        ReportAssembler::new(&figures, &document)
            .assemble(&input)
            .expect("assembly should succeed");

        let blocks = document.blocks.borrow();
        assert_eq!(heading_texts(&blocks, 1), vec!["SAXS data overview"]);
        assert!(figures.specs.borrow().is_empty());
        assert!(
            !blocks
                .iter()
                .any(|block| matches!(block, Block::Table { .. }))
        );
    }

    #[test]
    fn output_name_swaps_the_extension_for_pdf() {
        assert_eq!(output_name("gi_report.dat"), "gi_report.pdf");
        assert_eq!(output_name("report"), "report.pdf");
        assert_eq!(output_name("archive.tar.gz"), "archive.tar.pdf");
    }
}
