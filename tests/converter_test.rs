//! Integration tests for archive conversion.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use agenda2enex::convert::{output_path_for, BatchConverter};
use agenda2enex::model::ContentRun;
use agenda2enex::render::content_hash;
use agenda2enex::{
    convert_bytes, convert_file, discover_agendas, Agenda, Attachment, ConvertOptions,
    DiagnosticKind, EmbeddedObject, Error, Paragraph, ParagraphStyle, RenderOptions, Section,
};
use chrono::{TimeZone, Utc};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const PHOTO: &[u8] = b"\x89PNG\r\n\x1a\nfake image data";
const REPORT: &[u8] = b"%PDF-1.7 fake report";

fn build_archive(agenda: &Agenda, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("Archive/Data.json", SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(&serde_json::to_vec(agenda).unwrap())
        .unwrap();
    for (name, data) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn sample_agenda() -> Agenda {
    let mut meeting = Section::new("Weekly sync");
    meeting.add_paragraph(Paragraph::with_runs(&[
        ContentRun::bold("Agenda"),
        ContentRun::text("\n"),
    ]));
    meeting.add_paragraph(Paragraph::with_text("Budget").with_style(ParagraphStyle::bullet(0)));
    meeting.add_paragraph(Paragraph::with_text("Q3").with_style(ParagraphStyle::numbered(1)));
    meeting.add_paragraph(Paragraph::with_text("Hiring").with_style(ParagraphStyle::bullet(0)));
    meeting.add_paragraph(
        Paragraph::with_runs(&[
            ContentRun::text("Photo: "),
            ContentRun::attachment("", "BLOB1"),
        ])
        .with_attachment(Attachment::new("BLOB1", "whiteboard.png")),
    );
    meeting.add_paragraph(
        Paragraph::with_runs(&[ContentRun::embedded("", "OBJ1"), ContentRun::embedded("Docs", "OBJ2")])
            .with_embedded_object(EmbeddedObject::file("OBJ1", "STORE", "BLOB2", "report.pdf"))
            .with_embedded_object(EmbeddedObject::hyperlink("OBJ2", "https://docs.example")),
    );

    let mut deleted = Section::new("Scratch");
    deleted.marked_deleted = true;
    deleted.add_paragraph(Paragraph::with_text("should not appear"));

    let mut agenda = Agenda::new();
    agenda.add_section(meeting);
    agenda.add_section(deleted);
    agenda
}

fn sample_files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("Archive/Attachments/BLOB1.png", PHOTO),
        ("Archive/Attachments/STORE/BLOB2.pdf", REPORT),
    ]
}

fn fixed_options() -> ConvertOptions {
    ConvertOptions::new().with_render_options(
        RenderOptions::new().with_timestamp(Utc.with_ymd_and_hms(2023, 11, 5, 14, 30, 59).unwrap()),
    )
}

#[test]
fn test_convert_bytes_end_to_end() {
    let data = build_archive(&sample_agenda(), &sample_files());
    let result = convert_bytes(data, "Work", &fixed_options()).unwrap();
    let enex = &result.content;

    assert!(enex.contains("export-date=\"20231105T143000Z\""));
    assert_eq!(enex.matches("<note>").count(), 1);
    assert!(enex.contains("<title>Weekly sync</title>"));
    assert!(!enex.contains("Scratch"));

    assert!(enex.contains("<div><strong>Agenda</strong></div>"));
    assert!(enex.contains("<div><ul><li>Budget<ol><li>Q3</li></ol></li><li>Hiring</li></ul></div>\n"));

    let photo_hash = content_hash(PHOTO);
    let report_hash = content_hash(REPORT);
    assert!(enex.contains(&format!(
        "<en-media hash=\"{}\" type=\"image/png\" border=\"0\" alt=\"whiteboard.png\"/>",
        photo_hash
    )));
    assert!(enex.contains(&format!(
        "<en-media hash=\"{}\" type=\"application/pdf\" border=\"0\" alt=\"report.pdf\"/>",
        report_hash
    )));
    assert!(enex.contains("<a href=\"https://docs.example\">Docs</a><br/>"));

    assert_eq!(enex.matches("<resource>").count(), 2);
    assert!(enex.contains("<file-name>whiteboard.png</file-name>"));
    assert!(enex.contains("<file-name>report.pdf</file-name>"));

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.stats.note_count, 1);
    assert_eq!(result.stats.deleted_section_count, 1);
    assert_eq!(result.stats.list_item_count, 3);
    assert_eq!(result.stats.resource_count, 2);
}

#[test]
fn test_missing_attachment_is_diagnosed() {
    let data = build_archive(&sample_agenda(), &[("Archive/Attachments/BLOB1.png", PHOTO)]);
    let result = convert_bytes(data, "Work", &fixed_options()).unwrap();

    assert_eq!(result.content.matches("<en-media").count(), 1);
    assert_eq!(result.content.matches("<resource>").count(), 1);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::MissingFile {
            location: "Archive/Attachments/STORE/BLOB2.pdf".into()
        }
    );
}

#[test]
fn test_missing_data_entry_fails() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("Archive/Other.json", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"{}").unwrap();
    let data = writer.finish().unwrap().into_inner();

    let result = convert_bytes(data, "Empty", &ConvertOptions::default());
    assert!(matches!(result, Err(Error::EntryNotFound(_))));
}

fn write_agenda(dir: &Path, name: &str, agenda: &Agenda) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, build_archive(agenda, &sample_files())).unwrap();
    path
}

#[test]
fn test_convert_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_agenda(dir.path(), "Work.agenda", &sample_agenda());

    let result = convert_file(&path, &fixed_options()).unwrap();
    assert_eq!(result.notebook, "Work");
    assert!(result.content.ends_with("</en-export>"));
}

#[test]
fn test_batch_conversion_writes_outputs_and_report() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    write_agenda(input_dir.path(), "Good.agenda", &sample_agenda());
    fs::write(input_dir.path().join("Broken.agenda"), b"garbage").unwrap();

    let mut malformed = Section::new("Notes");
    let mut paragraph = Paragraph::with_text("x");
    paragraph.content = "[{\"string\":".to_string();
    malformed.add_paragraph(paragraph);
    malformed.add_paragraph(Paragraph::with_text("still here"));
    let mut agenda = Agenda::new();
    agenda.add_section(malformed);
    write_agenda(input_dir.path(), "Partial.agenda", &agenda);

    let inputs = discover_agendas(input_dir.path()).unwrap();
    assert_eq!(inputs.len(), 3);

    let batch = BatchConverter::new(output_dir.path(), fixed_options().lenient());
    let items = batch.run(&inputs);

    // Sorted discovery order is kept.
    let names: Vec<String> = items.iter().map(|i| i.notebook()).collect();
    assert_eq!(names, vec!["Broken", "Good", "Partial"]);

    assert!(!items[0].is_success());
    assert!(!output_path_for(&inputs[0], output_dir.path()).exists());

    let good = fs::read_to_string(output_dir.path().join("Good.enex")).unwrap();
    assert!(good.contains("<title>Weekly sync</title>"));

    let partial = fs::read_to_string(output_dir.path().join("Partial.enex")).unwrap();
    assert!(partial.contains("<div>still here</div>"));

    let totals = BatchConverter::totals(&items);
    assert_eq!(totals.note_count, 2);
    assert_eq!(totals.resource_count, 2);
    assert_eq!(totals.skipped_paragraph_count, 1);
    assert_eq!(totals.paragraph_count, items[1].outcome.as_ref().unwrap().stats.paragraph_count + 1);

    let report = BatchConverter::report(&items);
    assert_eq!(report.len(), 2);
    assert_eq!(report.rows()[0].notebook, "Broken");
    assert_eq!(report.rows()[1].notebook, "Partial");
    assert_eq!(report.rows()[1].note, "Notes");

    let mut csv = Vec::new();
    report.write_csv(&mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert!(csv.starts_with("Notebook,Note,Error\n"));
}

#[test]
fn test_strict_mode_fails_malformed_notebook() {
    let mut section = Section::new("Notes");
    let mut paragraph = Paragraph::with_text("x");
    paragraph.content = "not json".to_string();
    section.add_paragraph(paragraph);
    let mut agenda = Agenda::new();
    agenda.add_section(section);

    let data = build_archive(&agenda, &[]);
    let result = convert_bytes(data, "Strict", &fixed_options());
    assert!(matches!(result, Err(Error::MalformedParagraph { .. })));
}
