//! Rendering options and configuration.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::mime::mime_type_for_extension;

/// Format of `export-date` and `created` timestamps in `.enex` files.
/// Seconds are always written as `00`.
pub const ENEX_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M00Z";

/// Options for rendering an Agenda document to `.enex`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Timestamp used for `export-date` and every note's `created` field.
    /// `None` means "now" at render time.
    pub timestamp: Option<DateTime<Utc>>,

    /// `application` attribute of the export envelope
    pub application: String,

    /// `version` attribute of the export envelope
    pub application_version: String,

    /// How to treat paragraphs whose content cannot be decoded
    pub error_mode: ErrorMode,

    /// Emit an empty `<div><br/></div>` after every body paragraph
    pub paragraph_spacing: bool,

    /// Extra extension -> MIME type mappings, keyed by lowercase
    /// extension without the leading dot
    pub mime_overrides: HashMap<String, String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed timestamp instead of the current time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the application name and version written to the envelope.
    pub fn with_application(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.application = name.into();
        self.application_version = version.into();
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip undecodable paragraphs instead of failing.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable the blank line after body paragraphs.
    pub fn with_paragraph_spacing(mut self, spacing: bool) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    /// Map an extension to a MIME type, taking precedence over the
    /// built-in table.
    pub fn with_mime_override(
        mut self,
        extension: impl AsRef<str>,
        mime_type: impl Into<String>,
    ) -> Self {
        let ext = extension
            .as_ref()
            .trim_start_matches('.')
            .to_ascii_lowercase();
        self.mime_overrides.insert(ext, mime_type.into());
        self
    }

    /// Resolve the MIME type for an extension, consulting overrides first.
    pub fn mime_type(&self, extension: &str) -> Option<String> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.mime_overrides
            .get(&ext)
            .cloned()
            .or_else(|| mime_type_for_extension(&ext).map(str::to_string))
    }

    /// Timestamp formatted for the `.enex` envelope.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .format(ENEX_TIMESTAMP_FORMAT)
            .to_string()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timestamp: None,
            application: "Evernote".to_string(),
            application_version: "10.33.4".to_string(),
            error_mode: ErrorMode::Strict,
            paragraph_spacing: true,
            mime_overrides: HashMap::new(),
        }
    }
}

/// Error handling mode for paragraph content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the whole archive on the first undecodable paragraph
    #[default]
    Strict,
    /// Report the paragraph as a diagnostic and skip it
    Lenient,
}
