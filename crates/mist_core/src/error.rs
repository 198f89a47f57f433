//! Error types for the segmentation engine.

use mist_archive::ArchiveError;
use mist_codec::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Fatal errors. Any of these aborts the split.
///
/// Segments finalized before the error stay on disk; the segment that was
/// open at the time is incomplete.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The source archive could not be opened, indexed or read.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A record line could not be decoded.
    #[error("malformed record at line {line} (offset {offset}): {message}")]
    MalformedRecord {
        /// 1-based line number in the record stream.
        line: u64,
        /// Byte offset of the line in the record stream.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// Writing an output segment failed.
    #[error("failed to write segment {path:?}: {message}")]
    SegmentWrite {
        /// Output container path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Creates a segment write error.
    pub fn segment_write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::SegmentWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<CodecError> for CoreError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Malformed {
                line,
                offset,
                message,
            } => Self::MalformedRecord {
                line,
                offset,
                message,
            },
            CodecError::LineTooLong {
                line,
                offset,
                limit,
            } => Self::MalformedRecord {
                line,
                offset,
                message: format!("line exceeds {limit} bytes"),
            },
            CodecError::Io(e) => Self::Io(e),
        }
    }
}

/// Non-fatal conditions collected during a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A referenced attachment is not in the source archive. It counts as
    /// zero bytes and is written as an empty entry.
    MissingAttachment {
        /// Full entry path, including the `data/` prefix.
        path: String,
        /// Record line that referenced it.
        line: u64,
    },

    /// Attachment objects without a `path` were skipped.
    UnnamedAttachments {
        /// Record line carrying them.
        line: u64,
        /// How many were skipped.
        count: usize,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAttachment { path, line } => {
                write!(f, "line {line}: missing file {path} assumed as 0 bytes")
            }
            Self::UnnamedAttachments { line, count } => {
                write!(f, "line {line}: skipped {count} attachment(s) without a path")
            }
        }
    }
}
