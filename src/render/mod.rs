//! Rendering module for converting Agenda documents to `.enex`.

mod enex;
mod escape;
mod list;
mod options;
mod references;
mod resources;
mod result;
mod run;

pub use enex::{to_enex, EnexRenderer};
pub use escape::{escape_attr, escape_text};
pub use list::{ListKind, ListTracker};
pub use options::{ErrorMode, RenderOptions, ENEX_TIMESTAMP_FORMAT};
pub use references::{ReferenceEntry, ReferenceKind, ReferenceTable};
pub use resources::{content_hash, LoadedResource, ResourceStore};
pub use result::{ConversionStats, RenderResult};
pub use run::{render_text, RunRenderer, LINK_PLACEHOLDER};
