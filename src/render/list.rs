//! List nesting state machine.
//!
//! Agenda stores list items as flat paragraphs carrying an indentation
//! level. ENML needs properly nested `<ul>`/`<ol>` elements, so the tracker
//! follows indentation changes from paragraph to paragraph and emits the
//! open and close tags in between. Nested lists are placed inside the open
//! `<li>` of their parent item.
//!
//! The outer list is wrapped in a `<div>` so it sits at the same level as
//! body paragraphs.

use crate::model::ParagraphStyle;

/// Kind of list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `<ol>`
    Ordered,
    /// `<ul>`
    Unordered,
}

impl ListKind {
    /// Kind for an ordered flag.
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        }
    }

    /// Tag name.
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Level {
    indent: u32,
    kind: ListKind,
}

/// Tracks open list levels within one section.
#[derive(Debug, Default)]
pub struct ListTracker {
    levels: Vec<Level>,
}

impl ListTracker {
    /// Create a tracker with no open list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a list is currently open.
    pub fn in_list(&self) -> bool {
        !self.levels.is_empty()
    }

    /// Number of open nesting levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Advance to the next paragraph and write the required transitions.
    ///
    /// For a list paragraph, on return an `<li>` is open and the caller
    /// writes the item content directly after it. For a body paragraph any
    /// open list has been closed. Returns `true` if the paragraph is a
    /// list item.
    pub fn advance(&mut self, style: &ParagraphStyle, out: &mut String) -> bool {
        match *style {
            ParagraphStyle::Body => {
                self.close_all(out);
                false
            }
            ParagraphStyle::List {
                indentation_level,
                ordered,
            } => {
                self.list_item(indentation_level, ListKind::from_ordered(ordered), out);
                true
            }
        }
    }

    fn list_item(&mut self, indent: u32, kind: ListKind, out: &mut String) {
        let Some(current) = self.levels.last().copied() else {
            out.push_str("<div>");
            self.open_level(indent, kind, out);
            return;
        };

        if indent > current.indent {
            self.open_level(indent, kind, out);
            return;
        }

        // Close deeper levels, but never the outermost one.
        while self.levels.len() > 1 && self.top_indent() > indent {
            self.close_level(out);
        }
        if let Some(top) = self.levels.last_mut() {
            if top.indent > indent {
                // Dedent below the opening level: clamp and re-base.
                top.indent = indent;
            }
        }
        out.push_str("</li><li>");
    }

    fn top_indent(&self) -> u32 {
        self.levels.last().map(|l| l.indent).unwrap_or(0)
    }

    fn open_level(&mut self, indent: u32, kind: ListKind, out: &mut String) {
        out.push('<');
        out.push_str(kind.tag());
        out.push_str("><li>");
        self.levels.push(Level { indent, kind });
    }

    fn close_level(&mut self, out: &mut String) {
        if let Some(level) = self.levels.pop() {
            out.push_str("</li></");
            out.push_str(level.kind.tag());
            out.push('>');
        }
    }

    /// Close every open level and the list wrapper.
    ///
    /// Must be called at the end of each section; it is a no-op when no
    /// list is open.
    pub fn close_all(&mut self, out: &mut String) {
        if !self.in_list() {
            return;
        }
        while self.in_list() {
            self.close_level(out);
        }
        out.push_str("</div>\n");
    }
}
