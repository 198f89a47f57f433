//! # mist core
//!
//! Streaming segmentation engine for Mattermost-style import archives.
//!
//! This crate provides:
//! - [`Progress`] counters and the [`SplitPolicy`] that decides segment boundaries
//! - attachment resolution against the source archive
//! - segment sinks that write (or merely count) output archives
//! - the [`Splitter`] that drives a single forward pass over the record stream
//!
//! ## Example
//!
//! ```no_run
//! use mist_core::{SplitConfig, Splitter};
//!
//! let config = SplitConfig::new()
//!     .archive("mattermost_import.zip")
//!     .prefix("out/split_")
//!     .max_lines(50_000)
//!     .max_bytes(256 * 1024 * 1024);
//!
//! let report = Splitter::new(config).run().unwrap();
//! println!("wrote {} segments", report.segments.len());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod policy;
mod resolver;
mod segment;
mod source;
mod splitter;
mod state;

pub use config::{Compression, SplitConfig};
pub use error::{CoreError, CoreResult, Warning};
pub use policy::{SplitPolicy, SplitRule};
pub use resolver::{resolve_attachments, ResolvedAttachments};
pub use segment::{OpenSegment, PlanSegment, PlanSink, SegmentSink, ZipSegment, ZipSegmentSink};
pub use source::{AttachmentSource, MemorySource};
pub use splitter::{split_records, SegmentSummary, SplitReport, Splitter};
pub use state::Progress;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory inside both source and output archives that holds attachments.
pub const ATTACHMENT_PREFIX: &str = "data/";

/// Name of the record-stream entry written into every segment.
pub const RECORD_STREAM_ENTRY: &str = "import.jsonl";

/// Full archive path of an attachment reference.
#[must_use]
pub fn attachment_entry_name(path: &str) -> String {
    format!("{ATTACHMENT_PREFIX}{path}")
}
