//! # mist archive
//!
//! Read side of the import splitter: indexes a source zip archive once and
//! hands out its record stream and attachment payloads.
//!
//! The index never interprets entry contents. It only knows two kinds of
//! entries:
//!
//! - the record stream, recognised by the [`RECORD_STREAM_SUFFIX`] suffix
//! - everything else, addressable by full entry path
//!
//! ## Example
//!
//! ```no_run
//! use mist_archive::ArchiveIndex;
//! use std::io::Read;
//! use std::path::Path;
//!
//! let (mut index, mut records) = ArchiveIndex::open(Path::new("import.zip")).unwrap();
//! let mut first = String::new();
//! records.open().unwrap().read_to_string(&mut first).unwrap();
//!
//! let mut sink = Vec::new();
//! index.copy_entry("data/foo/bar.png", &mut sink).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod index;
mod stream;

pub use error::{ArchiveError, ArchiveResult};
pub use index::{ArchiveEntry, ArchiveIndex};
pub use stream::RecordStreamSource;

/// Name suffix that marks the record-stream entry.
pub const RECORD_STREAM_SUFFIX: &str = ".jsonl";
