//! Rendering result with diagnostics and statistics.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// Result of rendering an Agenda document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The complete `.enex` document
    pub content: String,

    /// Recoverable problems, in the order they were found
    pub diagnostics: Vec<Diagnostic>,

    /// Conversion statistics
    pub stats: ConversionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, diagnostics: Vec<Diagnostic>, stats: ConversionStats) -> Self {
        Self {
            content,
            diagnostics,
            stats,
        }
    }

    /// Check if the conversion produced no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected during conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Notes written (one per live section)
    pub note_count: u32,

    /// Sections skipped because they were deleted
    pub deleted_section_count: u32,

    /// Paragraphs rendered
    pub paragraph_count: u32,

    /// Paragraphs skipped (deleted or undecodable)
    pub skipped_paragraph_count: u32,

    /// List items rendered
    pub list_item_count: u32,

    /// Hyperlinks rendered
    pub link_count: u32,

    /// Inline media tags rendered
    pub media_count: u32,

    /// Resource blocks written
    pub resource_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.note_count += other.note_count;
        self.deleted_section_count += other.deleted_section_count;
        self.paragraph_count += other.paragraph_count;
        self.skipped_paragraph_count += other.skipped_paragraph_count;
        self.list_item_count += other.list_item_count;
        self.link_count += other.link_count;
        self.media_count += other.media_count;
        self.resource_count += other.resource_count;
    }
}
