//! # agenda2enex
//!
//! Converts Agenda notebook archives (`.agenda`) into Evernote export
//! documents (`.enex`).
//!
//! An `.agenda` file is a zip archive holding `Archive/Data.json` plus the
//! attachment files under `Archive/Attachments/`. Every live section of the
//! notebook becomes one note; paragraphs become ENML markup and attached
//! files become base64 resources referenced by their MD5 hash.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agenda2enex::{convert_file, ConvertOptions};
//!
//! fn main() -> agenda2enex::Result<()> {
//!     let result = convert_file("Work.agenda", &ConvertOptions::default())?;
//!     std::fs::write("Work.enex", &result.content)?;
//!     for diagnostic in &result.diagnostics {
//!         eprintln!("{}", diagnostic);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lists**: nested bullet and numbered lists of any depth
//! - **Attachments**: files and embedded objects as `<en-media>` resources
//! - **Diagnostics**: recoverable problems are collected, not fatal
//! - **Batches**: many archives converted in parallel with Rayon

pub mod archive;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod mime;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use archive::{ArchiveSource, MemoryArchive, ZipArchiveSource};
pub use convert::{
    convert_bytes, convert_file, discover_agendas, BatchConverter, BatchItem, ConvertOptions,
    ConvertResult,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Report};
pub use error::{Error, Result};
pub use model::{
    Agenda, Attachment, ContentRun, EmbeddedObject, EmbeddedObjectKind, Paragraph,
    ParagraphStyle, Section,
};
pub use parser::{parse_agenda, AgendaParser};
pub use render::{ConversionStats, EnexRenderer, ErrorMode, RenderOptions, RenderResult};

use std::path::Path;

/// Parse an `.agenda` file without rendering it.
///
/// # Example
///
/// ```no_run
/// use agenda2enex::parse_file;
///
/// let agenda = parse_file("Work.agenda").unwrap();
/// println!("Sections: {}", agenda.sections.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Agenda> {
    Ok(AgendaParser::open(path)?.parse()?.agenda)
}

/// Convert an `.agenda` file to an `.enex` string with default options.
///
/// Fails on the first undecodable paragraph; use [`convert_file`] with
/// [`ConvertOptions::lenient`] to skip such paragraphs instead.
///
/// # Example
///
/// ```no_run
/// use agenda2enex::to_enex;
///
/// let enex = to_enex("Work.agenda").unwrap();
/// std::fs::write("Work.enex", enex).unwrap();
/// ```
pub fn to_enex<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(convert_file(path, &ConvertOptions::default())?.content)
}
