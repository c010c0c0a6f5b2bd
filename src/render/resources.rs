//! Per-section cache of attachment payloads.
//!
//! The MD5 hash written into `<en-media hash=...>` must match the one
//! implied by the `<resource>` payload, so each archive entry is read and
//! hashed once and both places use the cached result.

use std::collections::HashMap;

use md5::{Digest, Md5};

use crate::archive::ArchiveSource;
use crate::diagnostics::DiagnosticKind;

/// A file read from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedResource {
    /// Lowercase hex MD5 digest of `data`
    pub hash: String,
    /// File contents
    pub data: Vec<u8>,
}

impl LoadedResource {
    /// Hash and wrap file contents.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            hash: content_hash(&data),
            data,
        }
    }
}

/// Lowercase hex MD5 digest, as used by `.enex` resource hashes.
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}

/// Outcome of a previous load attempt.
#[derive(Debug)]
enum Slot {
    Loaded(LoadedResource),
    Failed,
}

/// Cache of loaded files, keyed by archive entry.
#[derive(Debug, Default)]
pub struct ResourceStore {
    slots: HashMap<String, Slot>,
}

impl ResourceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `location`, reading the archive only on first use.
    ///
    /// Returns the problem to report when the entry is absent or
    /// unreadable. A location that failed to read once is not retried.
    pub fn load<A: ArchiveSource + ?Sized>(
        &mut self,
        location: &str,
        archive: &mut A,
    ) -> Result<&LoadedResource, DiagnosticKind> {
        if !archive.contains(location) {
            return Err(DiagnosticKind::MissingFile {
                location: location.to_string(),
            });
        }

        if !self.slots.contains_key(location) {
            let slot = match archive.read(location) {
                Ok(data) => Slot::Loaded(LoadedResource::new(data)),
                Err(e) => {
                    self.slots.insert(location.to_string(), Slot::Failed);
                    return Err(DiagnosticKind::UnreadableFile {
                        location: location.to_string(),
                        reason: e.to_string(),
                    });
                }
            };
            self.slots.insert(location.to_string(), slot);
        }

        match self.slots.get(location) {
            Some(Slot::Loaded(resource)) => Ok(resource),
            _ => Err(DiagnosticKind::UnreadableFile {
                location: location.to_string(),
                reason: "previous read failed".to_string(),
            }),
        }
    }

    /// Check whether `location` was attempted and failed.
    pub fn has_failed(&self, location: &str) -> bool {
        matches!(self.slots.get(location), Some(Slot::Failed))
    }

    /// Check whether `location` has been loaded.
    pub fn is_loaded(&self, location: &str) -> bool {
        matches!(self.slots.get(location), Some(Slot::Loaded(_)))
    }
}
