use sasreport_core::ReportInput;
use sasreport_core::domain::records::{BeadModelRecord, SeriesRecord};
use sasreport_core::modules::bead_model::read_bead_model_summary;
use sasreport_core::modules::efa::{attach_efa_results, read_efa_results};
use sasreport_core::modules::extract::RecordExtractor;
use sasreport_core::{ReportError, ReportResult, load_snapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub(super) fn load_report_input(
    snapshot_path: &Path,
    efa_files: &[PathBuf],
    shape_files: &[PathBuf],
) -> ReportResult<ReportInput> {
    let snapshot = load_snapshot(snapshot_path)?;
    let extractor = RecordExtractor;

    let profiles: Vec<_> = snapshot
        .profiles
        .iter()
        .map(|source| extractor.profile(source))
        .collect();
    let distributions = snapshot
        .ifts
        .iter()
        .map(|source| extractor.distribution(source))
        .collect::<ReportResult<Vec<_>>>()?;
    let mut series: Vec<SeriesRecord> = snapshot
        .series
        .iter()
        .map(|source| extractor.series(source))
        .collect();
    info!(
        profiles = profiles.len(),
        distributions = distributions.len(),
        series = series.len(),
        "extracted snapshot records"
    );

    attach_efa_files(&mut series, efa_files)?;

    let mut bead_models = Vec::with_capacity(shape_files.len());
    for path in shape_files {
        let record = read_bead_model_summary(path)?;
        if record == BeadModelRecord::default() {
            warn!(path = %path.display(), "bead model summary had no recognizable fields");
        } else {
            info!(path = %path.display(), program = %record.program, "parsed bead model summary");
        }
        bead_models.push(Some(record));
    }

    Ok(ReportInput {
        profiles,
        distributions,
        series,
        bead_models,
    })
}

/// Pairs deconvolution result files with series by position: the first file
/// goes with the first series and so on. Files past the last series are
/// ignored with a warning rather than failing the run.
pub(super) fn attach_efa_files(
    series: &mut [SeriesRecord],
    paths: &[PathBuf],
) -> ReportResult<()> {
    for (index, path) in paths.iter().enumerate() {
        let Some(record) = series.get_mut(index) else {
            warn!(
                extra = paths.len() - index,
                "more deconvolution files than series; ignoring the rest"
            );
            break;
        };

        let sections = read_efa_results(path)?;
        if sections.is_empty() {
            warn!(path = %path.display(), "deconvolution results file has no recognizable sections");
        } else {
            info!(path = %path.display(), frames = sections.frames.len(), "attached deconvolution results");
        }
        attach_efa_results(record, &sections);
    }

    Ok(())
}

pub(super) fn default_report_name(snapshot_path: &Path) -> String {
    snapshot_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("sas_report")
        .to_string()
}

pub(super) fn ensure_out_dir(path: &Path) -> ReportResult<()> {
    fs::create_dir_all(path).map_err(|err| {
        ReportError::io_system(
            "IO.OUT_DIR",
            format!(
                "failed to create output directory '{}': {}",
                path.display(),
                err
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use sasreport_core::domain::records::SeriesRecord;
    use tempfile::TempDir;

    use super::{attach_efa_files, default_report_name, ensure_out_dir};

    fn efa_fixture(first_frame: i64) -> String {
        format!(
            "Concentration Matrix Results\n\
             Frame,Component 0,Component 1\n\
             {a}.0,0.95,0.05\n\
             {b}.0,0.90,0.10\n\
             \n\
             Rotation Chi^2 Results\n\
             Frame,Chi^2\n\
             {a}.0,1.004\n\
             {b}.0,1.012\n\
             \n\
             Forward EFA Results\n\
             Frame,SV 0\n\
             {a}.0,12.1\n\
             \n\
             Backward EFA Results\n\
             Frame,SV 0\n\
             {a}.0,11.8\n\
             \n\
             Singular Value Results\n\
             Index,Value\n\
             0,214.8\n",
            a = first_frame,
            b = first_frame + 1,
        )
    }

    #[test]
    fn deconvolution_files_pair_with_series_by_position() {
        let dir = TempDir::new().expect("temp dir should be created");
        let first = dir.path().join("first_efa.csv");
        let second = dir.path().join("second_efa.csv");
        std::fs::write(&first, efa_fixture(130)).expect("first file should be written");
        std::fs::write(&second, efa_fixture(200)).expect("second file should be written");

        let mut series = vec![SeriesRecord::default(), SeriesRecord::default()];
        attach_efa_files(&mut series, &[first, second]).expect("attachment should succeed");

        let first_efa = series[0].efa.as_ref().expect("first series gains analysis");
        let second_efa = series[1].efa.as_ref().expect("second series gains analysis");
        assert_eq!(first_efa.frames, vec![130, 131]);
        assert_eq!(second_efa.frames, vec![200, 201]);
    }

    #[test]
    fn extra_deconvolution_files_are_skipped_without_reading() {
        let dir = TempDir::new().expect("temp dir should be created");
        let first = dir.path().join("first_efa.csv");
        std::fs::write(&first, efa_fixture(130)).expect("first file should be written");
        let dangling = dir.path().join("never_read.csv");

        let mut series = vec![SeriesRecord::default()];
        attach_efa_files(&mut series, &[first, dangling]).expect("extras should be ignored");

        assert!(series[0].efa.is_some());
    }

    #[test]
    fn missing_deconvolution_file_is_an_io_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing = dir.path().join("absent.csv");

        let mut series = vec![SeriesRecord::default()];
        let error = attach_efa_files(&mut series, &[missing]).expect_err("read should fail");

        assert_eq!(error.code(), "IO.EFA_READ");
    }

    #[test]
    fn report_name_defaults_to_the_snapshot_stem() {
        assert_eq!(
            default_report_name(Path::new("run/sec_analysis.json")),
            "sec_analysis"
        );
        assert_eq!(default_report_name(Path::new("..")), "sas_report");
    }

    #[test]
    fn out_dir_is_created_recursively() {
        let dir = TempDir::new().expect("temp dir should be created");
        let nested = dir.path().join("reports").join("august");

        ensure_out_dir(&nested).expect("nested directory should be created");
        assert!(nested.is_dir());
    }
}
