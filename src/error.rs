//! Error types for agenda2enex library.

use std::io;
use thiserror::Error;

/// Result type alias for agenda2enex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting an Agenda archive.
///
/// Every variant is fatal for the archive being converted. Problems that
/// only affect a single reference (missing files, unknown MIME types, ...)
/// are reported as [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be opened or one of its entries is corrupt.
    #[error("Archive error: {0}")]
    Archive(String),

    /// A required archive entry does not exist.
    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),

    /// The root Agenda document could not be decoded.
    #[error("Malformed Agenda document: {0}")]
    MalformedDocument(String),

    /// The `content` payload of a paragraph could not be decoded.
    #[error("Malformed paragraph content in section \"{section}\": {reason}")]
    MalformedParagraph {
        /// Title of the section owning the paragraph
        section: String,
        /// Decoder message
        reason: String,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::EntryNotFound(err.to_string()),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EntryNotFound("Archive/Data.json".to_string());
        assert_eq!(
            err.to_string(),
            "Entry not found in archive: Archive/Data.json"
        );

        let err = Error::MalformedParagraph {
            section: "Meeting".to_string(),
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed paragraph content in section \"Meeting\": expected value"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad header".into()).into();
        assert!(matches!(err, Error::Archive(_)));
    }
}
