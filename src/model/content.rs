//! Content runs: the styled, linked or media-bearing text units of a paragraph.

use serde::{Deserialize, Serialize};

/// A run of text with uniform attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRun {
    /// Display text
    #[serde(default)]
    pub string: String,

    /// Styling and reference attributes
    #[serde(default)]
    pub attributes: Attributes,
}

impl ContentRun {
    /// Create a plain text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            string: text.into(),
            attributes: Attributes::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        let mut run = Self::text(text);
        run.attributes.bold = true;
        run
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        let mut run = Self::text(text);
        run.attributes.italic = true;
        run
    }

    /// Create a hyperlink run.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        let mut run = Self::text(text);
        run.attributes.link = href.into();
        run
    }

    /// Create a run referencing a paragraph attachment.
    pub fn attachment(text: impl Into<String>, blob_identifier: impl Into<String>) -> Self {
        let mut run = Self::text(text);
        run.attributes.attachment.blob_identifier = blob_identifier.into();
        run
    }

    /// Create a run referencing an embedded object.
    pub fn embedded(text: impl Into<String>, identifier: impl Into<String>) -> Self {
        let mut run = Self::text(text);
        run.attributes.embedded_object_identifier = identifier.into();
        run
    }

    /// Classify the run. The first matching kind wins: a reference
    /// identifier, then a hyperlink target, then plain or styled text.
    pub fn kind(&self) -> RunKind<'_> {
        let attrs = &self.attributes;
        if !attrs.attachment.blob_identifier.is_empty() {
            RunKind::Reference(&attrs.attachment.blob_identifier)
        } else if !attrs.embedded_object_identifier.is_empty() {
            RunKind::Reference(&attrs.embedded_object_identifier)
        } else if !attrs.link.is_empty() {
            RunKind::Hyperlink(&attrs.link)
        } else {
            RunKind::Text
        }
    }

    /// Check if the run is a bare paragraph terminator.
    pub fn is_newline(&self) -> bool {
        self.string == "\n"
    }
}

/// The semantic kind of a content run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind<'a> {
    /// References an attachment or embedded object by identifier
    Reference(&'a str),
    /// Hyperlink to the given target
    Hyperlink(&'a str),
    /// Plain or styled text
    Text,
}

/// Attributes of a content run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// Attachment reference
    #[serde(default)]
    pub attachment: AttachmentAttribute,

    /// Embedded object reference
    #[serde(default)]
    pub embedded_object_identifier: String,

    /// Hyperlink target
    #[serde(default)]
    pub link: String,

    /// Bold text
    #[serde(default)]
    pub bold: bool,

    /// Italic text
    #[serde(default)]
    pub italic: bool,

    /// Underlined text
    #[serde(default)]
    pub underline: bool,
}

impl Attributes {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline
    }
}

/// Attachment reference inside run attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentAttribute {
    /// Blob identifier of the referenced attachment
    #[serde(default)]
    pub blob_identifier: String,

    /// Name shown by Agenda
    #[serde(default)]
    pub name: String,
}
