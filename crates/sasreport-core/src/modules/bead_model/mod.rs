//! Parsing of bead-model reconstruction summary files.
//!
//! The reconstruction pipeline writes a line-oriented `label: value` summary.
//! Each line is matched against a fixed set of literal labels; the value is
//! the text after the last colon. Lines that match nothing and values that
//! fail to parse are ignored, leaving the record's defaults in place.

use std::fs;
use std::path::Path;

use crate::domain::records::BeadModelRecord;
use crate::domain::{ReportError, ReportResult};

pub fn read_bead_model_summary(path: &Path) -> ReportResult<BeadModelRecord> {
    let text = fs::read_to_string(path).map_err(|err| {
        ReportError::io_system(
            "IO.BEAD_MODEL_READ",
            format!(
                "failed to read bead model summary '{}': {}",
                path.display(),
                err
            ),
        )
    })?;

    Ok(parse_bead_model_summary(&text))
}

pub fn parse_bead_model_summary(text: &str) -> BeadModelRecord {
    let mut record = BeadModelRecord::default();

    for line in text.lines() {
        let value = trailing_value(line);

        if line.contains("Program used") {
            record.program = value.to_string();
        } else if line.contains("Mode:") {
            record.mode = value.to_string();
        } else if line.contains("Symmetry") {
            record.symmetry = value.to_string();
        } else if line.contains("Anisometry") {
            record.anisometry = value.to_string();
        } else if line.contains("Total number") {
            assign_parsed(&mut record.reconstructions, value);
        } else if line.contains("Used DAMAVER") {
            record.damaver = parse_flag(value);
        } else if line.contains("Refined with DAMMIN") {
            record.refined = parse_flag(value);
        } else if line.contains("Used DAMCLUST") {
            record.damclust = parse_flag(value);
        } else if line.contains("Mean NSD") {
            assign_parsed(&mut record.nsd, value);
        } else if line.contains("Stdev. NSD") {
            assign_parsed(&mut record.nsd_std, value);
        } else if line.contains("DAMAVER Included") {
            if let Some(first) = value.split_whitespace().next() {
                assign_parsed(&mut record.included_models, first);
            }
        } else if line.contains("Representative mode") {
            assign_parsed(&mut record.representative_model, value);
        } else if line.contains("Ensemble resolution") {
            parse_resolution(&mut record, value);
        } else if line.contains("Number of clusters") {
            assign_parsed(&mut record.clusters, value);
        } else if line.contains("Output prefix") {
            record.prefix = value.to_string();
        }
    }

    record
}

/// Text after the last colon, trimmed; the whole line if there is none.
fn trailing_value(line: &str) -> &str {
    match line.rsplit_once(':') {
        Some((_, value)) => value.trim(),
        None => line.trim(),
    }
}

fn assign_parsed<T: std::str::FromStr>(slot: &mut T, value: &str) {
    if let Ok(parsed) = value.parse() {
        *slot = parsed;
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

/// A resolution value is written as `value +/- error A`; the value precedes
/// the `+`, the error follows the `-`.
fn parse_resolution(record: &mut BeadModelRecord, value: &str) {
    if let Some(resolution) = value.split('+').next() {
        assign_parsed(&mut record.resolution, resolution.trim());
    }

    let error = value
        .split('-')
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next());
    if let Some(error) = error {
        assign_parsed(&mut record.resolution_err, error);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{parse_bead_model_summary, read_bead_model_summary};
    use crate::domain::records::BeadModelRecord;

    const SUMMARY_FILE: &str = "\
Program used: DAMMIF
Mode: Slow
Symmetry: P1
Anisometry: Unknown
Total number of models: 15
Used DAMAVER: True
Refined with DAMMIN: True
Used DAMCLUST: False
Mean NSD: 0.842
Stdev. NSD: 0.051
DAMAVER Included Models: 14 of 15
Representative model: 7
Ensemble resolution: 38 +/- 3 A
Output prefix: gi_dammif
";

    #[test]
    fn summary_fields_are_extracted() {
        let record = parse_bead_model_summary(SUMMARY_FILE);

        assert_eq!(record.program, "DAMMIF");
        assert_eq!(record.mode, "Slow");
        assert_eq!(record.symmetry, "P1");
        assert_eq!(record.anisometry, "Unknown");
        assert_eq!(record.reconstructions, 15);
        assert!(record.damaver);
        assert!(record.refined);
        assert!(!record.damclust);
        assert_eq!(record.nsd, 0.842);
        assert_eq!(record.nsd_std, 0.051);
        assert_eq!(record.included_models, 14);
        assert_eq!(record.representative_model, 7);
        assert_eq!(record.resolution, 38.0);
        assert_eq!(record.resolution_err, 3.0);
        assert_eq!(record.clusters, -1);
        assert_eq!(record.prefix, "gi_dammif");
    }

    #[test]
    fn flags_accept_only_affirmative_labels() {
        let record = parse_bead_model_summary("Used DAMAVER: False\nUsed DAMCLUST: yes\n");
        assert!(!record.damaver);
        assert!(record.damclust);
    }

    #[test]
    fn unmatched_and_malformed_lines_keep_defaults() {
        let text = "\
Some unrelated header
Total number of models: many
Mean NSD: n/a
Ensemble resolution: unknown
";
        let record = parse_bead_model_summary(text);
        assert_eq!(record, BeadModelRecord::default());
    }

    #[test]
    fn empty_input_yields_default_record() {
        assert_eq!(parse_bead_model_summary(""), BeadModelRecord::default());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing = dir.path().join("absent_summary.csv");

        let error = read_bead_model_summary(&missing).expect_err("missing file should fail");
        assert_eq!(error.code(), "IO.BEAD_MODEL_READ");
    }

    #[test]
    fn summary_file_round_trips_through_disk() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("dammif_summary.csv");
        std::fs::write(&path, SUMMARY_FILE).expect("summary file should be written");

        let record = read_bead_model_summary(&path).expect("summary file should parse");
        assert_eq!(record.program, "DAMMIF");
        assert_eq!(record.included_models, 14);
    }
}
