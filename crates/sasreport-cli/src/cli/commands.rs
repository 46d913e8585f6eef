use super::CliError;
use super::helpers::*;
use anyhow::Context;
use sasreport_core::domain::records::{DistributionRecord, ProfileRecord, SeriesRecord};
use sasreport_core::modules::extract::RecordExtractor;
use sasreport_core::{ReportResult, generate_report, load_snapshot};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct GenerateArgs {
    /// Saved analysis snapshot (JSON)
    #[arg(long)]
    snapshot: PathBuf,

    /// Directory the PDF is written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Report name; defaults to the snapshot file stem
    #[arg(long)]
    name: Option<String>,

    /// EFA results file, attached to series in order; repeatable
    #[arg(long = "efa-file", value_name = "PATH")]
    efa_files: Vec<PathBuf>,

    /// Bead-model summary file, one table row each; repeatable
    #[arg(long = "shape-file", value_name = "PATH")]
    shape_files: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct InspectArgs {
    /// Saved analysis snapshot (JSON)
    #[arg(long)]
    snapshot: PathBuf,
}

pub(super) fn run_generate_command(args: GenerateArgs) -> Result<i32, CliError> {
    let name = args
        .name
        .unwrap_or_else(|| default_report_name(&args.snapshot));
    let input = load_report_input(&args.snapshot, &args.efa_files, &args.shape_files)
        .map_err(CliError::Report)?;

    ensure_out_dir(&args.out_dir).map_err(CliError::Report)?;
    let started = Instant::now();
    let path = generate_report(&name, &args.out_dir, &input).map_err(CliError::Report)?;
    info!(
        path = %path.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "report generated"
    );
    println!("Wrote report: {}", path.display());
    Ok(0)
}

pub(super) fn run_inspect_command(args: InspectArgs) -> Result<i32, CliError> {
    let snapshot = load_snapshot(&args.snapshot).map_err(CliError::Report)?;
    let extractor = RecordExtractor;

    let profiles: Vec<ProfileRecord> = snapshot
        .profiles
        .iter()
        .map(|source| extractor.profile(source))
        .collect();
    let distributions: Vec<DistributionRecord> = snapshot
        .ifts
        .iter()
        .map(|source| extractor.distribution(source))
        .collect::<ReportResult<_>>()
        .map_err(CliError::Report)?;
    let series: Vec<SeriesRecord> = snapshot
        .series
        .iter()
        .map(|source| extractor.series(source))
        .collect();

    let summary = SnapshotSummary {
        profiles: profiles.iter().map(ProfileSummary::from_record).collect(),
        distributions: distributions
            .iter()
            .map(DistributionSummary::from_record)
            .collect(),
        series: series.iter().map(SeriesSummary::from_record).collect(),
    };

    let rendered = serde_json::to_string_pretty(&summary)
        .context("failed to serialize snapshot summary as JSON")?;
    println!("{}", rendered);
    Ok(0)
}

#[derive(Serialize)]
struct SnapshotSummary {
    profiles: Vec<ProfileSummary>,
    distributions: Vec<DistributionSummary>,
    series: Vec<SeriesSummary>,
}

#[derive(Serialize)]
struct ProfileSummary {
    filename: String,
    points: usize,
    guinier_fit: bool,
    mw_methods: usize,
    gnom_fit: bool,
    bift_fit: bool,
}

impl ProfileSummary {
    fn from_record(record: &ProfileRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            points: record.q.len(),
            guinier_fit: record.guinier.has_fit(),
            mw_methods: record.mw.computed_methods().len(),
            gnom_fit: record.gnom.has_fit(),
            bift_fit: record.bift.has_fit(),
        }
    }
}

#[derive(Serialize)]
struct DistributionSummary {
    filename: String,
    method: &'static str,
    dmax: f64,
}

impl DistributionSummary {
    fn from_record(record: &DistributionRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            method: record.method.as_str(),
            dmax: record.dmax,
        }
    }
}

#[derive(Serialize)]
struct SeriesSummary {
    filename: String,
    frames: usize,
    subtracted: bool,
    baseline_corrected: bool,
}

impl SeriesSummary {
    fn from_record(record: &SeriesRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            frames: record.frames.len(),
            subtracted: record.subtracted,
            baseline_corrected: record.baseline_corrected,
        }
    }
}
