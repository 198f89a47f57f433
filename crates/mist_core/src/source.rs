//! Attachment byte sources.

use crate::error::CoreResult;
use mist_archive::ArchiveIndex;
use std::collections::BTreeMap;
use std::io::Write;

/// Where attachment sizes and bytes come from.
///
/// Paths are full entry paths (including the `data/` prefix).
pub trait AttachmentSource {
    /// Reported uncompressed size of the entry, or `None` if it is absent.
    fn entry_size(&self, path: &str) -> Option<u64>;

    /// Streams the entry's bytes into `writer`.
    ///
    /// Returns `Ok(None)` and writes nothing if the entry is absent.
    fn copy_entry(&mut self, path: &str, writer: &mut dyn Write) -> CoreResult<Option<u64>>;
}

impl AttachmentSource for ArchiveIndex {
    fn entry_size(&self, path: &str) -> Option<u64> {
        self.get(path).map(|entry| entry.size())
    }

    fn copy_entry(&mut self, path: &str, writer: &mut dyn Write) -> CoreResult<Option<u64>> {
        Ok(ArchiveIndex::copy_entry(self, path, writer)?)
    }
}

/// An in-memory attachment source for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), data.into());
    }
}

impl AttachmentSource for MemorySource {
    fn entry_size(&self, path: &str) -> Option<u64> {
        self.entries.get(path).map(|data| data.len() as u64)
    }

    fn copy_entry(&mut self, path: &str, writer: &mut dyn Write) -> CoreResult<Option<u64>> {
        match self.entries.get(path) {
            Some(data) => {
                writer.write_all(data)?;
                Ok(Some(data.len() as u64))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_roundtrip() {
        let mut source = MemorySource::new();
        source.insert("data/a", b"abc".to_vec());

        assert_eq!(source.entry_size("data/a"), Some(3));
        assert_eq!(source.entry_size("data/b"), None);

        let mut out = Vec::new();
        assert_eq!(source.copy_entry("data/a", &mut out).unwrap(), Some(3));
        assert_eq!(out, b"abc");
        assert_eq!(source.copy_entry("data/b", &mut out).unwrap(), None);
        assert_eq!(out, b"abc");
    }
}
