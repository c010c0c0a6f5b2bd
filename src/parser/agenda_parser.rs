//! Agenda archive parser.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::archive::{ArchiveSource, ZipArchiveSource, DATA_ENTRY};
use crate::error::{Error, Result};
use crate::model::Agenda;

/// Decode the Agenda document from the bytes of `Archive/Data.json`.
///
/// Decoding is strict: any structural mismatch fails with
/// [`Error::MalformedDocument`]. Paragraph content stays undecoded until
/// [`Paragraph::runs`](crate::model::Paragraph::runs) is called.
pub fn parse_agenda(data: &[u8]) -> Result<Agenda> {
    serde_json::from_slice(data).map_err(|e| Error::MalformedDocument(e.to_string()))
}

/// Parser for Agenda export archives.
///
/// Holds the archive open so that attachments can be read while the
/// document is rendered.
pub struct AgendaParser<A: ArchiveSource> {
    archive: A,
}

impl AgendaParser<ZipArchiveSource<BufReader<File>>> {
    /// Open an `.agenda` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening archive {}", path.display());
        Ok(Self {
            archive: ZipArchiveSource::open(path)?,
        })
    }
}

impl AgendaParser<ZipArchiveSource<Cursor<Vec<u8>>>> {
    /// Open an `.agenda` archive held in memory.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            archive: ZipArchiveSource::from_bytes(data.into())?,
        })
    }
}

impl<A: ArchiveSource> AgendaParser<A> {
    /// Use an already opened archive.
    pub fn from_archive(archive: A) -> Self {
        Self { archive }
    }

    /// Parse the Agenda document.
    pub fn parse(mut self) -> Result<ParsedAgenda<A>> {
        let data = self.archive.read(DATA_ENTRY)?;
        let agenda = parse_agenda(&data)?;
        log::debug!(
            "Parsed {} sections from {} archive entries",
            agenda.sections.len(),
            self.archive.entries().len()
        );
        Ok(ParsedAgenda {
            agenda,
            archive: self.archive,
        })
    }
}

/// A decoded Agenda document together with the archive it came from.
pub struct ParsedAgenda<A: ArchiveSource> {
    /// The decoded document
    pub agenda: Agenda,
    /// The archive, needed to resolve attachments
    pub archive: A,
}
