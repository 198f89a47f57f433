//! Index over the entries of a source archive.

use crate::error::{ArchiveError, ArchiveResult};
use crate::stream::RecordStreamSource;
use crate::RECORD_STREAM_SUFFIX;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipArchive;

/// A non-record entry of the source archive.
///
/// Entries are immutable for the duration of a run. The bytes are not held
/// in memory; [`ArchiveIndex::copy_entry`] reopens the entry on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    size: u64,
    index: usize,
}

impl ArchiveEntry {
    /// Full path of the entry inside the archive.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size as reported by the central directory.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Path-addressable view of every attachment entry in a source archive.
///
/// The index owns its own file handle. The record stream is read through a
/// separate [`RecordStreamSource`], so copying attachments never moves the
/// record reader's cursor.
pub struct ArchiveIndex {
    path: PathBuf,
    archive: ZipArchive<File>,
    entries: BTreeMap<String, ArchiveEntry>,
    record_stream: String,
}

impl std::fmt::Debug for ArchiveIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveIndex")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .field("record_stream", &self.record_stream)
            .finish()
    }
}

impl ArchiveIndex {
    /// Opens and indexes the archive at `path`.
    ///
    /// Scans the central directory once. The single `*.jsonl` entry becomes
    /// the returned [`RecordStreamSource`]; every other file entry is indexed
    /// by its full name. Directory entries are ignored.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::Unreadable`] if the file cannot be opened
    /// - [`ArchiveError::NotAnArchive`] if it is not a zip archive
    /// - [`ArchiveError::MissingRecordStream`] if no record stream exists
    /// - [`ArchiveError::MultipleRecordStreams`] if more than one exists
    pub fn open(path: &Path) -> ArchiveResult<(Self, RecordStreamSource)> {
        let (mut archive, source_size) = open_zip(path)?;
        info!("Input file size: {} bytes", source_size);

        let mut entries = BTreeMap::new();
        let mut record_stream: Option<(String, u64, usize)> = None;

        for index in 0..archive.len() {
            let (name, size, is_dir) = {
                let file = archive
                    .by_index_raw(index)
                    .map_err(|e| ArchiveError::entry(format!("#{index}"), e))?;
                (file.name().to_owned(), file.size(), file.is_dir())
            };

            if is_dir {
                continue;
            }

            if name.ends_with(RECORD_STREAM_SUFFIX) {
                if let Some((first, _, _)) = &record_stream {
                    return Err(ArchiveError::MultipleRecordStreams {
                        first: first.clone(),
                        second: name,
                    });
                }
                record_stream = Some((name, size, index));
            } else {
                entries.insert(name.clone(), ArchiveEntry { name, size, index });
            }
        }

        let (stream_name, stream_size, stream_index) =
            record_stream.ok_or_else(|| ArchiveError::MissingRecordStream {
                path: path.to_path_buf(),
            })?;

        info!("Number of files in the archive: {}", archive.len());

        // Second handle: the record reader and attachment copies must not share a cursor.
        let (stream_archive, _) = open_zip(path)?;
        let records =
            RecordStreamSource::new(stream_archive, stream_name.clone(), stream_size, stream_index);

        let index = Self {
            path: path.to_path_buf(),
            archive,
            entries,
            record_stream: stream_name,
        };
        Ok((index, records))
    }

    /// Path of the source archive.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the record-stream entry.
    #[must_use]
    pub fn record_stream_name(&self) -> &str {
        &self.record_stream
    }

    /// Number of indexed (non-record) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive holds nothing but the record stream.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by its full path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.get(path)
    }

    /// Returns `true` if an entry with this full path exists.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterates over all indexed entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    /// Sum of the reported uncompressed sizes of all indexed entries.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.entries.values().map(ArchiveEntry::size).sum()
    }

    /// Streams the full bytes of the entry at `path` into `writer`.
    ///
    /// Returns `Ok(None)` without touching `writer` when the path is not
    /// indexed. Every call reopens the entry from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be decompressed or the writer fails.
    pub fn copy_entry<W: Write + ?Sized>(
        &mut self,
        path: &str,
        writer: &mut W,
    ) -> ArchiveResult<Option<u64>> {
        let Some(entry) = self.entries.get(path) else {
            return Ok(None);
        };

        let mut file = self
            .archive
            .by_index(entry.index)
            .map_err(|e| ArchiveError::entry(path, e))?;
        let copied = io::copy(&mut file, writer)?;
        Ok(Some(copied))
    }
}

fn open_zip(path: &Path) -> ArchiveResult<(ZipArchive<File>, u64)> {
    let file = File::open(path).map_err(|source| ArchiveError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let size = file
        .metadata()
        .map_err(|source| ArchiveError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    let archive = ZipArchive::new(file).map_err(|e| ArchiveError::from_open(path, e))?;
    Ok((archive, size))
}
