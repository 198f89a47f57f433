//! Error types for the codec crate.

use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while reading the record stream.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A line is not a valid record.
    #[error("malformed record at line {line} (offset {offset}): {message}")]
    Malformed {
        /// 1-based line number.
        line: u64,
        /// Byte offset of the start of the line.
        offset: u64,
        /// Description of the decoding error.
        message: String,
    },

    /// A line exceeds the configured length cap.
    #[error("line {line} (offset {offset}) exceeds {limit} bytes")]
    LineTooLong {
        /// 1-based line number.
        line: u64,
        /// Byte offset of the start of the line.
        offset: u64,
        /// The configured cap.
        limit: usize,
    },

    /// Reading the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Create a malformed record error.
    pub fn malformed(line: u64, offset: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            offset,
            message: message.into(),
        }
    }

    /// Line number the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Malformed { line, .. } | Self::LineTooLong { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
