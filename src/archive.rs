//! Archive access abstraction.
//!
//! Agenda exports are zip files. The renderer only needs to list entries
//! and read them, so it talks to an [`ArchiveSource`] rather than to the
//! `zip` crate directly. [`ZipArchiveSource`] is the real implementation;
//! [`MemoryArchive`] serves tests and callers that already hold the files.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

/// Entry holding the Agenda document.
pub const DATA_ENTRY: &str = "Archive/Data.json";

/// Directory holding exported attachment files.
pub const ATTACHMENTS_DIR: &str = "Archive/Attachments";

/// Read access to the entries of an Agenda archive.
pub trait ArchiveSource {
    /// Names of all entries in the archive.
    fn entries(&self) -> &BTreeSet<String>;

    /// Check whether an entry exists.
    fn contains(&self, name: &str) -> bool {
        self.entries().contains(name)
    }

    /// Read the full contents of an entry.
    ///
    /// Fails with [`Error::EntryNotFound`] if the entry does not exist.
    fn read(&mut self, name: &str) -> Result<Vec<u8>>;
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for &mut T {
    fn entries(&self) -> &BTreeSet<String> {
        (**self).entries()
    }

    fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        (**self).read(name)
    }
}

/// [`ArchiveSource`] backed by a zip file.
pub struct ZipArchiveSource<R: Read + Seek> {
    zip: ZipArchive<R>,
    names: BTreeSet<String>,
}

impl ZipArchiveSource<BufReader<File>> {
    /// Open a zip archive from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl ZipArchiveSource<Cursor<Vec<u8>>> {
    /// Open a zip archive held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> ZipArchiveSource<R> {
    /// Open a zip archive from any seekable reader.
    pub fn new(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader)?;
        let names = zip.file_names().map(str::to_string).collect();
        Ok(Self { zip, names })
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<R: Read + Seek> ArchiveSource for ZipArchiveSource<R> {
    fn entries(&self) -> &BTreeSet<String> {
        &self.names
    }

    fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        if !self.names.contains(name) {
            return Err(Error::EntryNotFound(name.to_string()));
        }
        let mut file = self.zip.by_name(name)?;
        let mut data = Vec::with_capacity(initial_capacity(file.size()));
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Upper bound on the buffer reserved up front for one entry.
///
/// The declared size comes from the archive header; larger entries still
/// read fully, the buffer just grows as data arrives.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

fn initial_capacity(declared_size: u64) -> usize {
    usize::try_from(declared_size.min(MAX_PREALLOCATION)).unwrap_or(0)
}

/// In-memory [`ArchiveSource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    files: BTreeMap<String, Vec<u8>>,
    names: BTreeSet<String>,
}

impl MemoryArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let name = name.into();
        self.names.insert(name.clone());
        self.files.insert(name, data.into());
    }

    /// Builder-style variant of [`MemoryArchive::insert`].
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }
}

impl ArchiveSource for MemoryArchive {
    fn entries(&self) -> &BTreeSet<String> {
        &self.names
    }

    fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_memory_archive() {
        let mut archive = MemoryArchive::new().with_entry(DATA_ENTRY, "{}");
        assert!(archive.contains(DATA_ENTRY));
        assert_eq!(archive.read(DATA_ENTRY).unwrap(), b"{}");
        assert!(matches!(
            archive.read("missing"),
            Err(Error::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_zip_archive_source() {
        let data = build_zip(&[
            (DATA_ENTRY, b"{\"sections\":[]}"),
            ("Archive/Attachments/B1.png", b"\x89PNG"),
        ]);
        let mut archive = ZipArchiveSource::from_bytes(data).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.contains("Archive/Attachments/B1.png"));
        assert_eq!(archive.read("Archive/Attachments/B1.png").unwrap(), b"\x89PNG");
        assert!(matches!(
            archive.read("Archive/Attachments/B2.png"),
            Err(Error::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_declared_size_does_not_drive_allocation() {
        assert_eq!(initial_capacity(4), 4);
        assert_eq!(initial_capacity(MAX_PREALLOCATION), MAX_PREALLOCATION as usize);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOCATION as usize);
    }

    #[test]
    fn test_zip_archive_rejects_garbage() {
        let result = ZipArchiveSource::from_bytes(b"not a zip".to_vec());
        assert!(result.is_err());
    }
}
