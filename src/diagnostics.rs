//! Recoverable conversion problems and the CSV report that collects them.
//!
//! Diagnostics never alter the produced document; they only describe what
//! had to be left out of it.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// A recoverable problem found while converting one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Title of the section (note) where the problem occurred
    pub section: String,

    /// What went wrong
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(section: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            section: section.into(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.section, self.kind)
    }
}

/// Kind of recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No MIME type is known for an attachment's extension
    UnknownMimeType {
        /// Extension including the leading dot (may be empty)
        extension: String,
    },

    /// A run references an identifier no live paragraph declares
    DanglingReference {
        /// The referenced identifier
        identifier: String,
    },

    /// A declared file is not present in the archive
    MissingFile {
        /// Archive entry that was expected
        location: String,
    },

    /// A declared file exists but could not be read
    UnreadableFile {
        /// Archive entry
        location: String,
        /// Read error
        reason: String,
    },

    /// An embedded object type this converter does not handle
    UnsupportedEmbeddedObject {
        /// Agenda type code
        type_code: u32,
    },

    /// A paragraph whose content could not be decoded was skipped
    MalformedParagraph {
        /// Decoder message
        reason: String,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnknownMimeType { extension } => {
                write!(f, "Mime type not defined for extension {}", extension)
            }
            DiagnosticKind::DanglingReference { identifier } => {
                write!(f, "No object with identifier {}", identifier)
            }
            DiagnosticKind::MissingFile { location } => {
                write!(f, "File {} not found in archive", location)
            }
            DiagnosticKind::UnreadableFile { location, reason } => {
                write!(f, "File {} could not be read: {}", location, reason)
            }
            DiagnosticKind::UnsupportedEmbeddedObject { type_code } => {
                write!(f, "Embedded object type {} not yet supported", type_code)
            }
            DiagnosticKind::MalformedParagraph { reason } => {
                write!(f, "Paragraph skipped, content could not be decoded: {}", reason)
            }
        }
    }
}

/// One line of the conversion report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Source archive
    pub notebook: String,
    /// Note title, empty for archive-level failures
    pub note: String,
    /// Problem description
    pub error: String,
}

/// Conversion report across one or more archives.
#[derive(Debug, Clone, Default)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Column header of the CSV form.
    pub const HEADER: &'static str = "Notebook,Note,Error";

    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add all diagnostics of one archive.
    pub fn add_diagnostics<'a>(
        &mut self,
        notebook: &str,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    ) {
        for d in diagnostics {
            self.rows.push(ReportRow {
                notebook: notebook.to_string(),
                note: d.section.clone(),
                error: d.kind.to_string(),
            });
        }
    }

    /// Record a failure that prevented an archive from being converted.
    pub fn add_failure(&mut self, notebook: &str, error: &dyn fmt::Display) {
        self.rows.push(ReportRow {
            notebook: notebook.to_string(),
            note: String::new(),
            error: error.to_string(),
        });
    }

    /// Report rows in insertion order.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the report as CSV, header first.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", Self::HEADER)?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{}",
                csv_field(&row.notebook),
                csv_field(&row.note),
                csv_field(&row.error)
            )?;
        }
        writer.flush()
    }
}

/// Quote a CSV field when it contains a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(
            "Meeting",
            DiagnosticKind::UnknownMimeType {
                extension: ".xyz".into(),
            },
        );
        assert_eq!(
            d.to_string(),
            "[Meeting] Mime type not defined for extension .xyz"
        );
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_report_csv() {
        let mut report = Report::new();
        let diagnostics = vec![Diagnostic::new(
            "Notes, 2024",
            DiagnosticKind::MissingFile {
                location: "Archive/Attachments/B1.png".into(),
            },
        )];
        report.add_diagnostics("work.agenda", &diagnostics);
        report.add_failure("broken.agenda", &"Archive error: invalid zip");

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Notebook,Note,Error");
        assert_eq!(
            lines[1],
            "work.agenda,\"Notes, 2024\",File Archive/Attachments/B1.png not found in archive"
        );
        assert_eq!(lines[2], "broken.agenda,,Archive error: invalid zip");
        assert_eq!(report.len(), 2);
    }
}
