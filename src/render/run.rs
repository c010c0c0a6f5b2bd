//! Rendering of individual content runs.

use crate::archive::ArchiveSource;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{Attributes, ContentRun, RunKind};

use super::escape::{escape_attr, escape_text};
use super::references::{ReferenceEntry, ReferenceKind, ReferenceTable};
use super::resources::ResourceStore;
use super::ConversionStats;

/// Visible text of a hyperlink that has neither run text nor a label.
pub const LINK_PLACEHOLDER: &str = "Link";

/// Renders content runs of one section into ENML.
///
/// Holds the section's reference table and resource cache, plus the sinks
/// for diagnostics and statistics.
pub struct RunRenderer<'a, A: ArchiveSource + ?Sized> {
    section: &'a str,
    references: &'a ReferenceTable,
    resources: &'a mut ResourceStore,
    archive: &'a mut A,
    diagnostics: &'a mut Vec<Diagnostic>,
    stats: &'a mut ConversionStats,
}

impl<'a, A: ArchiveSource + ?Sized> RunRenderer<'a, A> {
    /// Create a renderer for one section.
    pub fn new(
        section: &'a str,
        references: &'a ReferenceTable,
        resources: &'a mut ResourceStore,
        archive: &'a mut A,
        diagnostics: &'a mut Vec<Diagnostic>,
        stats: &'a mut ConversionStats,
    ) -> Self {
        Self {
            section,
            references,
            resources,
            archive,
            diagnostics,
            stats,
        }
    }

    /// Render one run. `in_list` is true while writing a list item.
    pub fn render(&mut self, run: &ContentRun, in_list: bool, out: &mut String) {
        // Paragraph containers already separate paragraphs.
        if run.is_newline() {
            return;
        }

        let references = self.references;
        match run.kind() {
            RunKind::Reference(identifier) => match references.get(identifier) {
                Some(entry) => self.render_reference(run, entry, out),
                None => self.report(DiagnosticKind::DanglingReference {
                    identifier: identifier.to_string(),
                }),
            },
            RunKind::Hyperlink(href) => {
                let text = escape_text(trim_newlines(&run.string));
                self.render_anchor(href, &text, out);
            }
            RunKind::Text => render_text(&run.string, &run.attributes, in_list, out),
        }
    }

    fn render_reference(&mut self, run: &ContentRun, entry: &ReferenceEntry, out: &mut String) {
        match entry.kind {
            ReferenceKind::Unknown => {
                let mut text = escape_text(trim_newlines(&run.string).trim());
                if text.is_empty() {
                    text = escape_text(&entry.display_name);
                }
                out.push_str(&text);
            }
            ReferenceKind::Hyperlink => {
                let text = [trim_newlines(&run.string), entry.display_name.as_str()]
                    .into_iter()
                    .find(|t| !t.is_empty())
                    .unwrap_or(LINK_PLACEHOLDER);
                let text = escape_text(text);
                self.render_anchor(&entry.location, &text, out);
            }
            ReferenceKind::File => {
                let loaded = self
                    .resources
                    .load(&entry.location, &mut *self.archive)
                    .map(|resource| resource.hash.clone());
                let hash = match loaded {
                    Ok(hash) => hash,
                    Err(kind) => {
                        self.report(kind);
                        return;
                    }
                };
                self.stats.media_count += 1;
                out.push_str(&format!(
                    "<en-media hash=\"{}\" type=\"{}\" border=\"0\" alt=\"{}\"/>",
                    hash,
                    escape_attr(&entry.mime_type),
                    escape_attr(&entry.display_name)
                ));
            }
        }
    }

    fn render_anchor(&mut self, href: &str, escaped_text: &str, out: &mut String) {
        self.stats.link_count += 1;
        out.push_str(&format!(
            "<a href=\"{}\">{}</a><br/>",
            escape_attr(href),
            escaped_text
        ));
    }

    fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(self.section, kind);
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Render plain or styled text.
///
/// Styles nest as `<u><em><strong>text</strong></em></u>`. A trailing
/// newline becomes `<br/>` outside of list items.
pub fn render_text(text: &str, attributes: &Attributes, in_list: bool, out: &mut String) {
    let trimmed = trim_newlines(text);
    if trimmed.is_empty() {
        return;
    }

    let mut styled = escape_text(trimmed);
    if attributes.has_styling() {
        if attributes.bold {
            styled = format!("<strong>{}</strong>", styled);
        }
        if attributes.italic {
            styled = format!("<em>{}</em>", styled);
        }
        if attributes.underline {
            styled = format!("<u>{}</u>", styled);
        }
    }
    out.push_str(&styled);

    if text.ends_with('\n') && !in_list {
        out.push_str("<br/>");
    }
}

fn trim_newlines(text: &str) -> &str {
    text.trim_end_matches('\n')
}
