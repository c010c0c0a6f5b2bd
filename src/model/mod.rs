//! Document model types for Agenda notebooks.
//!
//! These types mirror the JSON layout of `Archive/Data.json` closely enough
//! to be decoded directly with serde, while exposing closed enums for the
//! parts the renderer has to branch on (paragraph style, run kind,
//! embedded object kind).

mod agenda;
mod content;

pub use agenda::{
    Agenda, Attachment, EmbeddedObject, EmbeddedObjectKind, InfoProperties, Paragraph,
    ParagraphStyle, Section,
};
pub use content::{AttachmentAttribute, Attributes, ContentRun, RunKind};
