//! Agenda notebook structure: sections, paragraphs and their declarations.

use serde::{Deserialize, Serialize};

use super::content::ContentRun;
use crate::error::{Error, Result};

/// Root of an Agenda export (`Archive/Data.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Agenda {
    /// Sections in document order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Agenda {
    /// Create an empty agenda.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Iterate over sections that have not been deleted.
    pub fn live_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.marked_deleted)
    }
}

/// A section of the notebook. Each live section becomes one note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section title
    #[serde(default)]
    pub title: String,

    /// Whether the section was deleted in Agenda
    #[serde(default)]
    pub marked_deleted: bool,

    /// Paragraphs in document order
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    /// Create a new section with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add a paragraph.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Iterate over paragraphs that have not been deleted.
    pub fn live_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter().filter(|p| !p.marked_deleted)
    }
}

/// A paragraph within a section.
///
/// `content` holds a JSON-encoded array of content runs, exactly as the
/// Agenda export stores it. It is decoded on demand by [`Paragraph::runs`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Raw JSON-encoded content runs
    #[serde(default)]
    pub content: String,

    /// Whether the paragraph was deleted in Agenda
    #[serde(default)]
    pub marked_deleted: bool,

    /// Attachments declared by this paragraph
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,

    /// Embedded objects declared by this paragraph
    #[serde(default, deserialize_with = "null_as_default")]
    pub embedded_objects: Vec<EmbeddedObject>,

    /// Tags attached to the paragraph
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Paragraph style (body text or list item)
    #[serde(default)]
    pub style: ParagraphStyle,

    /// Agenda priority value
    #[serde(default)]
    pub priority: f32,
}

impl Paragraph {
    /// Create a body paragraph from already-decoded runs.
    pub fn with_runs(runs: &[ContentRun]) -> Self {
        Self {
            // Serializing plain structs of strings and bools cannot fail.
            content: serde_json::to_string(runs).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Create a body paragraph holding a single plain text run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_runs(&[ContentRun::text(text)])
    }

    /// Set the paragraph style.
    pub fn with_style(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Declare an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Declare an embedded object.
    pub fn with_embedded_object(mut self, object: EmbeddedObject) -> Self {
        self.embedded_objects.push(object);
        self
    }

    /// Mark the paragraph as deleted.
    pub fn deleted(mut self) -> Self {
        self.marked_deleted = true;
        self
    }

    /// Decode the content runs.
    ///
    /// An empty `content` string yields no runs.
    pub fn runs(&self) -> std::result::Result<Vec<ContentRun>, serde_json::Error> {
        if self.content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&self.content)
    }

    /// Decode the content runs, attributing failures to `section`.
    pub fn runs_in(&self, section: &str) -> Result<Vec<ContentRun>> {
        self.runs().map_err(|e| Error::MalformedParagraph {
            section: section.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Paragraph style: body text or a list item, never both.
///
/// In the export this is an object with optional `body` and `list` keys.
/// A present `list` key wins; anything else is body text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawParagraphStyle", into = "RawParagraphStyle")]
pub enum ParagraphStyle {
    /// Plain body text
    #[default]
    Body,
    /// List item
    List {
        /// Indentation level as exported by Agenda
        indentation_level: u32,
        /// Ordered (numbered) rather than bulleted
        ordered: bool,
    },
}

impl ParagraphStyle {
    /// Create a bulleted list style.
    pub fn bullet(indentation_level: u32) -> Self {
        ParagraphStyle::List {
            indentation_level,
            ordered: false,
        }
    }

    /// Create a numbered list style.
    pub fn numbered(indentation_level: u32) -> Self {
        ParagraphStyle::List {
            indentation_level,
            ordered: true,
        }
    }

    /// Check if this is a list style.
    pub fn is_list(&self) -> bool {
        matches!(self, ParagraphStyle::List { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawParagraphStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<RawStyleLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list: Option<RawStyleLevel>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStyleLevel {
    #[serde(default)]
    indentation_level: u32,
    #[serde(default)]
    style: u32,
}

impl From<RawParagraphStyle> for ParagraphStyle {
    fn from(raw: RawParagraphStyle) -> Self {
        match raw.list {
            Some(list) => ParagraphStyle::List {
                indentation_level: list.indentation_level,
                ordered: list.style != 0,
            },
            None => ParagraphStyle::Body,
        }
    }
}

impl From<ParagraphStyle> for RawParagraphStyle {
    fn from(style: ParagraphStyle) -> Self {
        match style {
            ParagraphStyle::Body => RawParagraphStyle {
                body: Some(RawStyleLevel::default()),
                list: None,
            },
            ParagraphStyle::List {
                indentation_level,
                ordered,
            } => RawParagraphStyle {
                body: None,
                list: Some(RawStyleLevel {
                    indentation_level,
                    style: u32::from(ordered),
                }),
            },
        }
    }
}

/// A file attached directly to a paragraph.
///
/// The exported file lives at `Archive/Attachments/<blobIdentifier><ext>`,
/// where the extension comes from `originalFileName`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Blob identifier, referenced from content runs
    #[serde(default)]
    pub blob_identifier: String,

    /// Declared display name
    #[serde(default)]
    pub name: String,

    /// File name at the time of attaching
    #[serde(default)]
    pub original_file_name: String,

    /// Whether the attachment was removed in Agenda
    #[serde(default)]
    pub marked_deleted: bool,
}

impl Attachment {
    /// Create a new attachment declaration.
    pub fn new(blob_identifier: impl Into<String>, original_file_name: impl Into<String>) -> Self {
        Self {
            blob_identifier: blob_identifier.into(),
            original_file_name: original_file_name.into(),
            ..Default::default()
        }
    }
}

/// An object embedded in a paragraph (file, hyperlink, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedObject {
    /// Identifier referenced from content runs
    #[serde(default)]
    pub identifier: String,

    /// Attachment sub-directory holding the object's file
    #[serde(default)]
    pub store_identifier: String,

    /// Numeric object type as exported by Agenda
    #[serde(default, rename = "type")]
    pub type_code: u32,

    /// Descriptive properties
    #[serde(default, alias = "InfoProperties")]
    pub info_properties: InfoProperties,

    /// Whether the object was removed in Agenda
    #[serde(default)]
    pub marked_deleted: bool,
}

impl EmbeddedObject {
    /// Create an embedded file object.
    pub fn file(
        identifier: impl Into<String>,
        store_identifier: impl Into<String>,
        blob_identifier: impl Into<String>,
        original_file_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            store_identifier: store_identifier.into(),
            type_code: EmbeddedObjectKind::FILE_CODE,
            info_properties: InfoProperties {
                blob_identifier: blob_identifier.into(),
                original_file_name: original_file_name.into(),
                ..Default::default()
            },
            marked_deleted: false,
        }
    }

    /// Create an embedded hyperlink object.
    pub fn hyperlink(identifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_code: EmbeddedObjectKind::HYPERLINK_CODE,
            info_properties: InfoProperties {
                url: url.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the descriptive name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info_properties.name = name.into();
        self
    }

    /// Classify the object by its numeric type.
    pub fn kind(&self) -> EmbeddedObjectKind {
        EmbeddedObjectKind::from_code(self.type_code)
    }
}

/// Descriptive properties of an embedded object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoProperties {
    /// File name at the time of embedding
    #[serde(default)]
    pub original_file_name: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Blob identifier of the backing file
    #[serde(default)]
    pub blob_identifier: String,

    /// Target URL for hyperlinks
    #[serde(default)]
    pub url: String,
}

/// Kind of an embedded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedObjectKind {
    /// A file stored under `Archive/Attachments/<store>/`
    File,
    /// A hyperlink
    Hyperlink,
    /// Any type this converter does not understand
    Unsupported(u32),
}

impl EmbeddedObjectKind {
    /// Agenda type code for embedded files.
    pub const FILE_CODE: u32 = 7;
    /// Agenda type code for hyperlinks.
    pub const HYPERLINK_CODE: u32 = 5;

    /// Map an Agenda type code to a kind.
    pub fn from_code(code: u32) -> Self {
        match code {
            Self::FILE_CODE => EmbeddedObjectKind::File,
            Self::HYPERLINK_CODE => EmbeddedObjectKind::Hyperlink,
            other => EmbeddedObjectKind::Unsupported(other),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
