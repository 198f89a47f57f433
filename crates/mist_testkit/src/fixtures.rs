//! Source archive fixtures and output readers.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// The marker line an import stream starts with.
pub const VERSION_RECORD: &str = r#"{"type":"version","version":1}"#;

/// Builds a source archive: one record stream plus attachment entries.
#[derive(Debug, Clone)]
pub struct SourceArchiveBuilder {
    stream_name: String,
    with_version: bool,
    records: Vec<String>,
    entries: Vec<(String, Vec<u8>)>,
}

impl Default for SourceArchiveBuilder {
    fn default() -> Self {
        Self {
            stream_name: "import.jsonl".to_string(),
            with_version: true,
            records: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl SourceArchiveBuilder {
    /// Creates a builder whose stream starts with a version record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves the version record out of the stream.
    pub fn without_version(mut self) -> Self {
        self.with_version = false;
        self
    }

    /// Renames the record-stream entry.
    pub fn stream_name(mut self, name: impl Into<String>) -> Self {
        self.stream_name = name.into();
        self
    }

    /// Appends one record line.
    pub fn record(mut self, line: impl Into<String>) -> Self {
        self.records.push(line.into());
        self
    }

    /// Appends several record lines.
    pub fn records<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Adds an attachment stored under `data/<path>`.
    pub fn attachment(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.entry(format!("data/{path}"), data)
    }

    /// Adds an arbitrary entry under its full name.
    pub fn entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.entries.push((name.into(), data.into()));
        self
    }

    /// The record lines as they will appear in the stream, version excluded.
    pub fn record_lines(&self) -> &[String] {
        &self.records
    }

    /// Writes the archive to `path`.
    pub fn write_to(&self, path: &Path) -> PathBuf {
        let file = File::create(path).expect("Failed to create source archive");
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();

        let mut stream = String::new();
        if self.with_version {
            stream.push_str(VERSION_RECORD);
            stream.push('\n');
        }
        for line in &self.records {
            stream.push_str(line);
            stream.push('\n');
        }

        zip.start_file(self.stream_name.as_str(), options)
            .expect("Failed to start record stream");
        zip.write_all(stream.as_bytes())
            .expect("Failed to write record stream");

        for (name, data) in &self.entries {
            zip.start_file(name.as_str(), options)
                .expect("Failed to start entry");
            zip.write_all(data).expect("Failed to write entry");
        }

        zip.finish().expect("Failed to finish source archive");
        path.to_path_buf()
    }
}

/// A source archive in a temporary directory, plus a place for outputs.
pub struct SplitFixture {
    dir: TempDir,
    source: PathBuf,
}

impl SplitFixture {
    /// Writes `builder` to `<tmp>/source.zip`.
    pub fn new(builder: SourceArchiveBuilder) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let source = builder.write_to(&dir.path().join("source.zip"));
        Self { dir, source }
    }

    /// Path of the source archive.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The temporary directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Output prefix inside the temporary directory.
    pub fn prefix(&self) -> String {
        self.prefix_named("split_")
    }

    /// Output prefix with a custom file stem inside the temporary directory.
    pub fn prefix_named(&self, stem: &str) -> String {
        self.dir.path().join(stem).to_string_lossy().into_owned()
    }

    /// Output archives matching `prefix`, sorted by name.
    pub fn outputs(&self, prefix: &str) -> Vec<PathBuf> {
        let prefix = Path::new(prefix);
        let stem = prefix
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(self.dir.path())
            .expect("Failed to list temp directory")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&stem))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        paths
    }

    /// Reads every output archive matching the default prefix.
    pub fn read_outputs(&self) -> Vec<SegmentContents> {
        self.outputs(&self.prefix())
            .iter()
            .map(|path| read_segment(path))
            .collect()
    }
}

/// The contents of one output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentContents {
    /// Every entry by name, `import.jsonl` included.
    pub entries: BTreeMap<String, Vec<u8>>,
    /// Lines of `import.jsonl`, version marker included.
    pub lines: Vec<String>,
}

impl SegmentContents {
    /// Entry names in sorted order.
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Record lines without the leading version marker.
    pub fn records(&self) -> &[String] {
        match self.lines.first() {
            Some(first) if first == VERSION_RECORD => &self.lines[1..],
            _ => &self.lines,
        }
    }

    /// Attachment entries (everything under `data/`).
    pub fn attachments(&self) -> BTreeMap<&str, &[u8]> {
        self.entries
            .iter()
            .filter(|(name, _)| name.starts_with("data/"))
            .map(|(name, data)| (name.as_str(), data.as_slice()))
            .collect()
    }
}

/// Reads an output archive completely.
pub fn read_segment(path: &Path) -> SegmentContents {
    let file = File::open(path).expect("Failed to open segment");
    let mut archive = ZipArchive::new(file).expect("Segment is not a zip archive");

    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("Failed to open entry");
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("Failed to read entry");
        entries.insert(entry.name().to_string(), data);
    }

    let lines = entries
        .get("import.jsonl")
        .map(|data| {
            String::from_utf8(data.clone())
                .expect("Record stream is not UTF-8")
                .lines()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    SegmentContents { entries, lines }
}
