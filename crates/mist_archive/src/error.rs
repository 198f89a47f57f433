//! Error types for archive operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur while indexing or reading the source archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The source file exists but is not a readable zip archive.
    #[error("{path:?} is not an archive: {message}")]
    NotAnArchive {
        /// Path of the source file.
        path: PathBuf,
        /// Description from the container parser.
        message: String,
    },

    /// The source file could not be opened or read.
    #[error("cannot read {path:?}: {source}")]
    Unreadable {
        /// Path of the source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// No entry carries the record-stream suffix.
    #[error("no record stream (*.jsonl) found in {path:?}")]
    MissingRecordStream {
        /// Path of the source file.
        path: PathBuf,
    },

    /// More than one entry carries the record-stream suffix.
    #[error("multiple record streams found: {first} and {second}")]
    MultipleRecordStreams {
        /// First matching entry.
        first: String,
        /// Second matching entry.
        second: String,
    },

    /// A single entry could not be opened or decompressed.
    #[error("entry {name}: {message}")]
    Entry {
        /// Entry name inside the archive.
        name: String,
        /// Description of the failure.
        message: String,
    },

    /// An I/O error occurred while streaming entry bytes.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ArchiveError {
    /// Creates an entry error.
    pub fn entry(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Entry {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Maps a container error raised while opening `path`.
    pub(crate) fn from_open(path: &std::path::Path, err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => Self::Unreadable {
                path: path.to_path_buf(),
                source,
            },
            other => Self::NotAnArchive {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }
}
