//! End-to-end tests for the agenda2enex binary.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::Command;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const DATA: &str = r#"{
    "sections": [
        {
            "title": "Ideas",
            "markedDeleted": false,
            "paragraphs": [
                {
                    "content": "[{\"string\":\"First idea\\n\",\"attributes\":{}}]",
                    "markedDeleted": false,
                    "attachments": [],
                    "embeddedObjects": [],
                    "tags": null,
                    "style": {"body": {"indentationLevel": 0, "style": 0}},
                    "priority": 0
                }
            ]
        }
    ]
}"#;

fn write_agenda(path: &Path) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("Archive/Data.json", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(DATA.as_bytes()).unwrap();
    let data = writer.finish().unwrap().into_inner();
    fs::write(path, data).unwrap();
}

fn agenda2enex() -> Command {
    Command::new(env!("CARGO_BIN_EXE_agenda2enex"))
}

#[test]
fn test_converts_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_agenda(&input.path().join("Notebook.agenda"));
    fs::write(input.path().join("Broken.agenda"), b"garbage").unwrap();

    let status = agenda2enex()
        .arg(input.path())
        .arg(output.path())
        .arg("--quiet")
        .status()
        .unwrap();
    assert!(status.success());

    let enex = fs::read_to_string(output.path().join("Notebook.enex")).unwrap();
    assert!(enex.contains("<title>Ideas</title>"));
    assert!(enex.contains("<div>First idea<br/></div>"));
    assert!(!output.path().join("Broken.enex").exists());

    let report = fs::read_to_string(output.path().join("report.csv")).unwrap();
    assert!(report.starts_with("Notebook,Note,Error\n"));
    assert!(report.contains("Broken,,"));
}

#[test]
fn test_custom_report_path() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let agenda = input.path().join("Solo.agenda");
    write_agenda(&agenda);
    let report = output.path().join("problems.csv");

    let status = agenda2enex()
        .arg(&agenda)
        .arg(output.path())
        .arg("--report")
        .arg(&report)
        .arg("--sequential")
        .status()
        .unwrap();
    assert!(status.success());
    assert!(output.path().join("Solo.enex").exists());
    assert_eq!(
        fs::read_to_string(&report).unwrap(),
        "Notebook,Note,Error\n"
    );
}

#[test]
fn test_missing_output_directory_fails() {
    let input = tempfile::tempdir().unwrap();
    let status = agenda2enex()
        .arg(input.path())
        .arg(input.path().join("does-not-exist"))
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_version_subcommand() {
    let output = agenda2enex().arg("version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
