//! `.enex` rendering for Agenda documents.
//!
//! Every live section becomes one note. Section state (reference table,
//! resource cache and list tracker) is created when the section starts
//! and dropped when it ends.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::archive::ArchiveSource;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::model::{Agenda, Paragraph, Section};

use super::escape::{escape_attr, escape_text};
use super::{
    ConversionStats, ErrorMode, ListTracker, ReferenceTable, RenderOptions, RenderResult,
    ResourceStore, RunRenderer,
};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
const EXPORT_DOCTYPE: &str =
    "<!DOCTYPE en-export SYSTEM \"http://xml.evernote.com/pub/evernote-export.dtd\">";
const NOTE_DOCTYPE: &str = "<!DOCTYPE en-note SYSTEM \"http://xml.evernote.com/pub/enml2.dtd\">";
const PARAGRAPH_BREAK: &str = "<div><br/></div>\n";

/// Render an Agenda document to `.enex`.
pub fn to_enex<A: ArchiveSource + ?Sized>(
    agenda: &Agenda,
    archive: &mut A,
    options: &RenderOptions,
) -> Result<RenderResult> {
    EnexRenderer::new(options.clone()).render(agenda, archive)
}

/// `.enex` renderer.
pub struct EnexRenderer {
    options: RenderOptions,
}

impl EnexRenderer {
    /// Create a new renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `agenda`, reading attachment files from `archive`.
    ///
    /// The whole document is built in memory. In strict mode the first
    /// undecodable paragraph aborts rendering.
    pub fn render<A: ArchiveSource + ?Sized>(
        &self,
        agenda: &Agenda,
        archive: &mut A,
    ) -> Result<RenderResult> {
        let timestamp = self.options.formatted_timestamp();
        log::debug!(
            "Rendering {} of {} sections",
            agenda.live_sections().count(),
            agenda.sections.len()
        );
        let mut output = String::new();
        let mut diagnostics = Vec::new();
        let mut stats = ConversionStats::new();

        output.push_str(XML_DECLARATION);
        output.push('\n');
        output.push_str(EXPORT_DOCTYPE);
        output.push('\n');
        output.push_str(&format!(
            "<en-export export-date=\"{}\" application=\"{}\" version=\"{}\">\n",
            timestamp,
            escape_attr(&self.options.application),
            escape_attr(&self.options.application_version)
        ));

        for section in &agenda.sections {
            if section.marked_deleted {
                log::debug!("Skipping deleted section \"{}\"", section.title);
                stats.deleted_section_count += 1;
                continue;
            }
            let mut note = SectionContext {
                section,
                options: &self.options,
                archive: &mut *archive,
                diagnostics: &mut diagnostics,
                stats: &mut stats,
            };
            note.render(&timestamp, &mut output)?;
        }

        output.push_str("</en-export>");

        Ok(RenderResult::new(output, diagnostics, stats))
    }
}

/// State for rendering one section as one note.
struct SectionContext<'a, A: ArchiveSource + ?Sized> {
    section: &'a Section,
    options: &'a RenderOptions,
    archive: &'a mut A,
    diagnostics: &'a mut Vec<Diagnostic>,
    stats: &'a mut ConversionStats,
}

impl<A: ArchiveSource + ?Sized> SectionContext<'_, A> {
    fn render(&mut self, timestamp: &str, out: &mut String) -> Result<()> {
        let section = self.section;
        let title = section.title.as_str();
        log::debug!(
            "Rendering note \"{}\" ({} paragraphs)",
            title,
            section.paragraphs.len()
        );

        let references = ReferenceTable::build(
            title,
            section.live_paragraphs(),
            self.options,
            self.diagnostics,
        );
        let mut resources = ResourceStore::new();
        let mut tracker = ListTracker::new();

        out.push_str("<note>\n");
        out.push_str(&format!("<title>{}</title>\n", escape_text(title)));
        out.push_str(&format!("<created>{}</created>\n", timestamp));
        out.push_str("<note-attributes><author/></note-attributes>\n");
        out.push_str("<content><![CDATA[\n");
        out.push_str(XML_DECLARATION);
        out.push('\n');
        out.push_str(NOTE_DOCTYPE);
        out.push('\n');
        out.push_str("<en-note>\n");

        for paragraph in &section.paragraphs {
            self.render_paragraph(paragraph, &references, &mut resources, &mut tracker, out)?;
        }
        tracker.close_all(out);

        out.push_str("</en-note>]]></content>\n");
        self.render_resources(&references, &mut resources, out);
        out.push_str("</note>\n");

        self.stats.note_count += 1;
        Ok(())
    }

    fn render_paragraph(
        &mut self,
        paragraph: &Paragraph,
        references: &ReferenceTable,
        resources: &mut ResourceStore,
        tracker: &mut ListTracker,
        out: &mut String,
    ) -> Result<()> {
        if paragraph.marked_deleted {
            self.stats.skipped_paragraph_count += 1;
            return Ok(());
        }

        let section = self.section;
        let title = section.title.as_str();
        let runs = match paragraph.runs_in(title) {
            Ok(runs) => runs,
            Err(Error::MalformedParagraph { reason, .. })
                if self.options.error_mode == ErrorMode::Lenient =>
            {
                let diagnostic =
                    Diagnostic::new(title, DiagnosticKind::MalformedParagraph { reason });
                log::warn!("{}", diagnostic);
                self.diagnostics.push(diagnostic);
                self.stats.skipped_paragraph_count += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let was_in_list = tracker.in_list();
        let in_list = tracker.advance(&paragraph.style, out);
        if in_list {
            self.stats.list_item_count += 1;
        } else {
            if was_in_list && self.options.paragraph_spacing {
                out.push_str(PARAGRAPH_BREAK);
            }
            out.push_str("<div>");
        }

        let mut renderer = RunRenderer::new(
            title,
            references,
            resources,
            &mut *self.archive,
            &mut *self.diagnostics,
            &mut *self.stats,
        );
        for run in &runs {
            renderer.render(run, in_list, out);
        }

        if !in_list {
            out.push_str("</div>\n");
            if self.options.paragraph_spacing {
                out.push_str(PARAGRAPH_BREAK);
            }
        }
        self.stats.paragraph_count += 1;
        Ok(())
    }

    /// Write one resource block per distinct file, in declaration order.
    ///
    /// Entries absent from the archive were already reported while
    /// rendering and are skipped silently here.
    fn render_resources(
        &mut self,
        references: &ReferenceTable,
        resources: &mut ResourceStore,
        out: &mut String,
    ) {
        let mut written = HashSet::new();

        for entry in references.files() {
            if !self.archive.contains(&entry.location) {
                continue;
            }
            let reported = resources.has_failed(&entry.location);
            let resource = match resources.load(&entry.location, &mut *self.archive) {
                Ok(resource) => resource,
                Err(kind) => {
                    if !reported {
                        let diagnostic = Diagnostic::new(self.section.title.as_str(), kind);
                        log::warn!("{}", diagnostic);
                        self.diagnostics.push(diagnostic);
                    }
                    continue;
                }
            };
            if !written.insert(resource.hash.clone()) {
                continue;
            }

            out.push_str("<resource>\n<data encoding=\"base64\">\n");
            out.push_str(&STANDARD.encode(&resource.data));
            out.push_str("\n</data>\n");
            out.push_str(&format!("<mime>{}</mime>\n", escape_text(&entry.mime_type)));
            out.push_str("<resource-attributes>\n");
            out.push_str(&format!(
                "<file-name>{}</file-name>\n",
                escape_text(&entry.display_name)
            ));
            out.push_str("</resource-attributes></resource>\n");
            self.stats.resource_count += 1;
        }
    }
}
