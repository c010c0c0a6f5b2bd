//! Agenda document parsing.

mod agenda_parser;

pub use agenda_parser::{parse_agenda, AgendaParser, ParsedAgenda};
