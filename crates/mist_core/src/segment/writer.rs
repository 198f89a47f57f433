//! Zip-backed segment output.

use super::{OpenSegment, SegmentSink};
use crate::config::SplitConfig;
use crate::error::{CoreError, CoreResult};
use crate::source::AttachmentSource;
use crate::{attachment_entry_name, RECORD_STREAM_ENTRY};
use mist_codec::VERSION_LINE;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::FileOptions;
use zip::{DateTime, ZipWriter};

/// Writes each segment as a zip archive named after the configured prefix.
#[derive(Debug, Clone)]
pub struct ZipSegmentSink {
    config: SplitConfig,
}

impl ZipSegmentSink {
    /// Creates a sink using the naming and compression of `config`.
    #[must_use]
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn options(&self) -> FileOptions {
        // Fixed timestamp keeps repeated runs byte-identical.
        FileOptions::default()
            .compression_method(self.config.compression.method())
            .last_modified_time(DateTime::default())
    }
}

impl SegmentSink for ZipSegmentSink {
    type Segment = ZipSegment;

    fn open(&mut self, sequence: u64) -> CoreResult<ZipSegment> {
        let path = self.config.segment_path(sequence);
        let file = File::create(&path).map_err(|e| CoreError::segment_write(&path, e))?;
        debug!("Opened segment {} at {:?}", sequence, path);

        let mut records = Vec::new();
        records.extend_from_slice(VERSION_LINE.as_bytes());
        records.push(b'\n');

        Ok(ZipSegment {
            path,
            writer: ZipWriter::new(BufWriter::new(file)),
            records,
            options: self.options(),
        })
    }
}

/// An open zip segment.
pub struct ZipSegment {
    path: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    records: Vec<u8>,
    options: FileOptions,
}

impl OpenSegment for ZipSegment {
    fn write_record(&mut self, raw: &[u8]) -> CoreResult<()> {
        self.records.extend_from_slice(raw);
        self.records.push(b'\n');
        Ok(())
    }

    fn copy_attachment(
        &mut self,
        source: &mut dyn AttachmentSource,
        path: &str,
    ) -> CoreResult<u64> {
        let name = attachment_entry_name(path);
        let large = source
            .entry_size(&name)
            .is_some_and(|size| size > u64::from(u32::MAX));

        self.writer
            .start_file(name.as_str(), self.options.large_file(large))
            .map_err(|e| CoreError::segment_write(&self.path, e))?;

        copy_into_segment(&self.path, source, &name, &mut self.writer)
    }

    fn finalize(self) -> CoreResult<Option<PathBuf>> {
        let Self {
            path,
            mut writer,
            records,
            options,
        } = self;

        let large = records.len() as u64 > u64::from(u32::MAX);
        writer
            .start_file(RECORD_STREAM_ENTRY, options.large_file(large))
            .map_err(|e| CoreError::segment_write(&path, e))?;
        writer
            .write_all(&records)
            .map_err(|e| CoreError::segment_write(&path, e))?;

        let mut file = writer
            .finish()
            .map_err(|e| CoreError::segment_write(&path, e))?;
        file.flush().map_err(|e| CoreError::segment_write(&path, e))?;

        debug!("Finalized segment {:?}", path);
        Ok(Some(path))
    }
}

/// Destination half of an attachment copy.
///
/// Keeps the first write failure so it is reported against the segment
/// rather than the source.
struct EntryWriter<'a, W: ?Sized> {
    inner: &'a mut W,
    failure: Option<io::Error>,
}

impl<W: Write + ?Sized> Write for EntryWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(|e| self.fail(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().map_err(|e| self.fail(e))
    }
}

impl<W: ?Sized> EntryWriter<'_, W> {
    fn fail(&mut self, error: io::Error) -> io::Error {
        let echoed = io::Error::new(error.kind(), error.to_string());
        if self.failure.is_none() {
            self.failure = Some(error);
        }
        echoed
    }
}

/// Streams one attachment from `source` into the segment entry `writer`.
fn copy_into_segment<W: Write + ?Sized>(
    segment: &Path,
    source: &mut dyn AttachmentSource,
    name: &str,
    writer: &mut W,
) -> CoreResult<u64> {
    let mut entry = EntryWriter {
        inner: writer,
        failure: None,
    };
    let copied = source.copy_entry(name, &mut entry);

    if let Some(failure) = entry.failure {
        return Err(CoreError::segment_write(segment, failure));
    }
    Ok(copied?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use mist_testkit::read_segment;
    use tempfile::tempdir;

    fn sink_in(dir: &std::path::Path) -> ZipSegmentSink {
        let prefix = dir.join("part_").to_string_lossy().into_owned();
        ZipSegmentSink::new(&SplitConfig::new().prefix(prefix))
    }

    #[test]
    fn empty_segment_has_only_version_line() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());

        let path = sink.open(1).unwrap().finalize().unwrap().unwrap();
        assert_eq!(path, dir.path().join("part_001.zip"));

        let segment = read_segment(&path);
        assert_eq!(segment.lines, vec![VERSION_LINE.to_string()]);
        assert_eq!(segment.entry_names(), vec!["import.jsonl"]);
    }

    #[test]
    fn records_and_attachments_are_written() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());
        let mut source = MemorySource::new();
        source.insert("data/a/b.png", b"png bytes".to_vec());

        let mut segment = sink.open(3).unwrap();
        segment.write_record(br#"{"type":"user"}"#).unwrap();
        segment.write_record(br#"{"type":"post"}"#).unwrap();
        assert_eq!(segment.copy_attachment(&mut source, "a/b.png").unwrap(), 9);
        let path = segment.finalize().unwrap().unwrap();
        assert!(path.ends_with("part_003.zip"));

        let segment = read_segment(&path);
        assert_eq!(
            segment.lines,
            vec![
                VERSION_LINE.to_string(),
                r#"{"type":"user"}"#.to_string(),
                r#"{"type":"post"}"#.to_string(),
            ]
        );
        assert_eq!(segment.entries["data/a/b.png"], b"png bytes");
    }

    #[test]
    fn missing_attachment_becomes_empty_entry() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());
        let mut source = MemorySource::new();

        let mut segment = sink.open(1).unwrap();
        assert_eq!(segment.copy_attachment(&mut source, "foo/bar.png").unwrap(), 0);
        let path = segment.finalize().unwrap().unwrap();

        let segment = read_segment(&path);
        assert!(segment.entries["data/foo/bar.png"].is_empty());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn attachment_write_failure_names_the_segment() {
        let mut source = MemorySource::new();
        source.insert("data/a/b.png", b"png bytes".to_vec());
        let segment = Path::new("out/part_002.zip");

        let err = copy_into_segment(segment, &mut source, "data/a/b.png", &mut FullDisk)
            .unwrap_err();
        match err {
            CoreError::SegmentWrite { path, message } => {
                assert_eq!(path, segment);
                assert!(message.contains("no space left"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn absent_attachment_writes_nothing() {
        let mut source = MemorySource::new();
        let mut out = Vec::new();

        let copied =
            copy_into_segment(Path::new("part_001.zip"), &mut source, "data/x", &mut out).unwrap();
        assert_eq!(copied, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("missing").join("part_");
        let mut sink =
            ZipSegmentSink::new(&SplitConfig::new().prefix(prefix.to_string_lossy()));

        assert!(matches!(
            sink.open(1),
            Err(CoreError::SegmentWrite { .. })
        ));
    }
}
