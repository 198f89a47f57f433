//! Access to the record-stream entry.

use crate::error::{ArchiveError, ArchiveResult};
use std::fs::File;
use std::io::Read;
use zip::ZipArchive;

/// The record-stream entry of a source archive, backed by its own file handle.
pub struct RecordStreamSource {
    archive: ZipArchive<File>,
    name: String,
    size: u64,
    index: usize,
}

impl std::fmt::Debug for RecordStreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStreamSource")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

impl RecordStreamSource {
    pub(crate) fn new(archive: ZipArchive<File>, name: String, size: u64, index: usize) -> Self {
        Self {
            archive,
            name,
            size,
            index,
        }
    }

    /// Full name of the record-stream entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size of the record stream.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Opens the record stream for sequential reading from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be decompressed.
    pub fn open(&mut self) -> ArchiveResult<impl Read + '_> {
        let Self {
            archive,
            name,
            index,
            ..
        } = self;
        archive
            .by_index(*index)
            .map_err(|e| ArchiveError::entry(name.as_str(), e))
    }
}
