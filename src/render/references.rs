//! Per-section reference table.
//!
//! Content runs refer to attachments and embedded objects by identifier,
//! and a run may refer to something declared by any paragraph of the same
//! section. The table is therefore built from every live paragraph before
//! the first run is rendered, and only read afterwards.

use indexmap::IndexMap;

use crate::archive::ATTACHMENTS_DIR;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::mime::extension_of;
use crate::model::{Attachment, EmbeddedObject, EmbeddedObjectKind, Paragraph};

use super::RenderOptions;

/// What a reference resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A file in the archive, rendered as `<en-media>` plus a resource
    File,
    /// A hyperlink
    Hyperlink,
    /// An object of unsupported type or a file of unknown MIME type,
    /// rendered as plain text
    Unknown,
}

/// A resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// What the identifier resolves to
    pub kind: ReferenceKind,
    /// Archive entry for files, URL for hyperlinks
    pub location: String,
    /// File name for files, label for hyperlinks and unknown objects
    pub display_name: String,
    /// MIME type (files only, empty otherwise)
    pub mime_type: String,
}

impl ReferenceEntry {
    /// An entry rendered as plain text: an unsupported object, or a file
    /// whose MIME type is not known.
    pub fn unknown(location: String, display_name: String) -> Self {
        Self {
            kind: ReferenceKind::Unknown,
            location,
            display_name,
            mime_type: String::new(),
        }
    }
}

/// Mapping from identifier to resolved reference, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: IndexMap<String, ReferenceEntry>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for one section.
    ///
    /// Deleted paragraphs and deleted declarations are ignored. Problems
    /// are appended to `diagnostics`.
    pub fn build<'a>(
        section: &str,
        paragraphs: impl IntoIterator<Item = &'a Paragraph>,
        options: &RenderOptions,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut table = Self::new();
        for paragraph in paragraphs.into_iter().filter(|p| !p.marked_deleted) {
            for attachment in paragraph.attachments.iter().filter(|a| !a.marked_deleted) {
                table.add_attachment(section, attachment, options, diagnostics);
            }
            for object in paragraph.embedded_objects.iter().filter(|o| !o.marked_deleted) {
                table.add_embedded_object(section, object, options, diagnostics);
            }
        }
        table
    }

    fn add_attachment(
        &mut self,
        section: &str,
        attachment: &Attachment,
        options: &RenderOptions,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let extension = extension_of(&attachment.original_file_name);
        let name = format!("{}{}", attachment.blob_identifier, extension);
        let location = format!("{}/{}", ATTACHMENTS_DIR, name);
        let display_name = non_empty_or(&attachment.original_file_name, name);

        let Some(mime_type) = options.mime_type(&extension) else {
            report(section, DiagnosticKind::UnknownMimeType { extension }, diagnostics);
            self.insert(
                attachment.blob_identifier.clone(),
                ReferenceEntry::unknown(location, display_name),
            );
            return;
        };

        self.insert(
            attachment.blob_identifier.clone(),
            ReferenceEntry {
                kind: ReferenceKind::File,
                location,
                display_name,
                mime_type,
            },
        );
    }

    fn add_embedded_object(
        &mut self,
        section: &str,
        object: &EmbeddedObject,
        options: &RenderOptions,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let info = &object.info_properties;
        let entry = match object.kind() {
            EmbeddedObjectKind::File => {
                let extension = extension_of(&info.original_file_name);
                let name = format!("{}{}", info.blob_identifier, extension);
                let location = format!("{}/{}/{}", ATTACHMENTS_DIR, object.store_identifier, name);
                let display_name =
                    non_empty_or(&info.original_file_name, non_empty_or(&info.name, name));
                match options.mime_type(&extension) {
                    Some(mime_type) => ReferenceEntry {
                        kind: ReferenceKind::File,
                        location,
                        display_name,
                        mime_type,
                    },
                    None => {
                        report(section, DiagnosticKind::UnknownMimeType { extension }, diagnostics);
                        ReferenceEntry::unknown(location, display_name)
                    }
                }
            }
            EmbeddedObjectKind::Hyperlink => ReferenceEntry {
                kind: ReferenceKind::Hyperlink,
                location: info.url.clone(),
                display_name: non_empty_or(&info.name, info.url.clone()),
                mime_type: String::new(),
            },
            EmbeddedObjectKind::Unsupported(type_code) => {
                report(
                    section,
                    DiagnosticKind::UnsupportedEmbeddedObject { type_code },
                    diagnostics,
                );
                let label = non_empty_or(&info.name, info.url.clone());
                ReferenceEntry::unknown(info.url.clone(), label)
            }
        };
        self.insert(object.identifier.clone(), entry);
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, identifier: String, entry: ReferenceEntry) {
        self.entries.insert(identifier, entry);
    }

    /// Look up an identifier.
    pub fn get(&self, identifier: &str) -> Option<&ReferenceEntry> {
        self.entries.get(identifier)
    }

    /// Iterate over file entries in declaration order.
    pub fn files(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries
            .values()
            .filter(|e| e.kind == ReferenceKind::File)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_empty_or(value: &str, fallback: String) -> String {
    if value.is_empty() {
        fallback
    } else {
        value.to_string()
    }
}

fn report(section: &str, kind: DiagnosticKind, diagnostics: &mut Vec<Diagnostic>) {
    let diagnostic = Diagnostic::new(section, kind);
    log::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
