use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn generate_command_writes_a_pdf_for_an_empty_snapshot() {
    let temp = TempDir::new().expect("tempdir should be created");
    let snapshot_path = temp.path().join("minimal_run.json");
    let out_dir = temp.path().join("reports");
    write_file(&snapshot_path, "{}");

    let output = report_command(&[
        "generate",
        "--snapshot",
        &snapshot_path.to_string_lossy(),
        "--out-dir",
        &out_dir.to_string_lossy(),
    ]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("Wrote report:"),
        "stdout should name the written report"
    );

    let report_path = out_dir.join("minimal_run.pdf");
    assert!(report_path.is_file(), "report PDF should be created");
    let bytes = fs::read(&report_path).expect("report should be readable");
    assert!(
        bytes.starts_with(b"%PDF-1.7"),
        "report should start with a PDF header"
    );
}

#[test]
fn generate_command_honors_an_explicit_report_name() {
    let temp = TempDir::new().expect("tempdir should be created");
    let snapshot_path = temp.path().join("minimal_run.json");
    write_file(&snapshot_path, "{}");

    let output = report_command(&[
        "generate",
        "--snapshot",
        &snapshot_path.to_string_lossy(),
        "--out-dir",
        &temp.path().to_string_lossy(),
        "--name",
        "sec_batch",
    ]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        temp.path().join("sec_batch.pdf").is_file(),
        "report should be named after --name"
    );
}

#[test]
fn missing_snapshot_maps_to_the_io_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("absent.json");

    let output = report_command(&["generate", "--snapshot", &missing.to_string_lossy()]);

    assert_eq!(
        output.status.code(),
        Some(3),
        "missing snapshot should map to the IO exit code, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ERROR: [IO.SNAPSHOT_READ]"),
        "stderr should carry the snapshot read diagnostic"
    );
}

#[test]
fn invalid_snapshot_json_maps_to_the_input_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let snapshot_path = temp.path().join("broken.json");
    write_file(&snapshot_path, "{not json");

    let output = report_command(&["generate", "--snapshot", &snapshot_path.to_string_lossy()]);

    assert_eq!(
        output.status.code(),
        Some(2),
        "malformed snapshot should map to the input exit code, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.SNAPSHOT_PARSE]"),
        "stderr should carry the parse diagnostic"
    );
}

#[test]
fn unreadable_shape_file_maps_to_the_io_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let snapshot_path = temp.path().join("minimal_run.json");
    write_file(&snapshot_path, "{}");
    let missing_shape = temp.path().join("absent_model.csv");

    let output = report_command(&[
        "generate",
        "--snapshot",
        &snapshot_path.to_string_lossy(),
        "--shape-file",
        &missing_shape.to_string_lossy(),
    ]);

    assert_eq!(
        output.status.code(),
        Some(3),
        "unreadable shape file should fail the run, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ERROR: [IO.BEAD_MODEL_READ]"),
        "stderr should carry the bead model read diagnostic"
    );
}

#[test]
fn inspect_command_emits_a_json_summary() {
    let temp = TempDir::new().expect("tempdir should be created");
    let snapshot_path = temp.path().join("gi_session.json");
    write_file(
        &snapshot_path,
        r#"
        {
          "profiles": [
            {
              "filename": "glucose_isomerase.dat",
              "q": [0.01, 0.02, 0.03],
              "i": [102.4, 98.1, 95.6],
              "err": [1.1, 1.0, 0.9]
            }
          ],
          "series": [
            {
              "filename": "gi_sec.hdf5",
              "frames": [0.0, 1.0, 2.0],
              "total_i": [10.0, 12.0, 11.0],
              "mean_i": [1.0, 1.2, 1.1],
              "subtracted": true
            }
          ]
        }
        "#,
    );

    let output = report_command(&["inspect", "--snapshot", &snapshot_path.to_string_lossy()]);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("summary should be JSON");
    assert_eq!(
        parsed["profiles"][0]["filename"],
        Value::from("glucose_isomerase.dat")
    );
    assert_eq!(parsed["profiles"][0]["points"], Value::from(3));
    assert_eq!(parsed["profiles"][0]["guinier_fit"], Value::Bool(false));
    assert_eq!(parsed["series"][0]["frames"], Value::from(3));
    assert_eq!(parsed["series"][0]["subtracted"], Value::Bool(true));
    assert_eq!(
        parsed["distributions"]
            .as_array()
            .map(|entries| entries.len()),
        Some(0)
    );
}

#[test]
fn unknown_flags_map_to_the_usage_exit_code() {
    let output = report_command(&["generate", "--bogus"]);

    assert_eq!(
        output.status.code(),
        Some(2),
        "unknown flags should map to the usage exit code, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.CLI_USAGE]"),
        "stderr should carry the usage diagnostic"
    );
}

#[test]
fn help_prints_usage_and_exits_cleanly() {
    let output = report_command(&["--help"]);

    assert!(output.status.success(), "--help should exit zero");
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("SAXS report generator"),
        "help text should describe the tool"
    );
}

fn report_command(args: &[&str]) -> std::process::Output {
    let binary_path = env!("CARGO_BIN_EXE_sasreport-rs");

    let mut command = Command::new(binary_path);
    command.args(args);
    command.output().expect("binary should run to completion")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}
