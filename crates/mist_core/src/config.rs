//! Split configuration.

use crate::policy::SplitPolicy;
use mist_codec::DEFAULT_MAX_LINE_LENGTH;
use std::path::PathBuf;

/// Compression applied to entries written into segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Deflate every entry.
    #[default]
    Deflated,
    /// Store entries uncompressed.
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Self::Deflated => zip::CompressionMethod::Deflated,
            Self::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Configuration for a split run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Source archive to split.
    pub archive: PathBuf,

    /// Prefix of the output file names; the segment number is appended.
    pub prefix: String,

    /// Extension of the output file names, without the dot.
    pub extension: String,

    /// Maximum number of records per segment (0 = unlimited).
    pub max_lines: u64,

    /// Maximum attachment bytes per segment (0 = unlimited).
    pub max_bytes: u64,

    /// Longest accepted record line in bytes.
    pub max_line_length: usize,

    /// Compression for output entries.
    pub compression: Compression,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("mattermost_import.zip"),
            prefix: "mattermost_split_".to_string(),
            extension: "zip".to_string(),
            max_lines: 100_000,
            max_bytes: 512 * 1024 * 1024, // 512 MiB
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            compression: Compression::Deflated,
        }
    }
}

impl SplitConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source archive.
    #[must_use]
    pub fn archive(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive = path.into();
        self
    }

    /// Sets the output name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the output file extension.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the record limit per segment.
    #[must_use]
    pub const fn max_lines(mut self, lines: u64) -> Self {
        self.max_lines = lines;
        self
    }

    /// Sets the attachment byte limit per segment.
    #[must_use]
    pub const fn max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    /// Sets the record line length cap.
    #[must_use]
    pub const fn max_line_length(mut self, bytes: usize) -> Self {
        self.max_line_length = bytes;
        self
    }

    /// Sets the output compression.
    #[must_use]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Builds the boundary policy from the configured limits.
    #[must_use]
    pub fn policy(&self) -> SplitPolicy {
        SplitPolicy::from_limits(self.max_lines, self.max_bytes)
    }

    /// Output path of segment `sequence`: `{prefix}{sequence:03}.{extension}`.
    #[must_use]
    pub fn segment_path(&self, sequence: u64) -> PathBuf {
        PathBuf::from(format!("{}{:03}.{}", self.prefix, sequence, self.extension))
    }
}
