//! Segment output.
//!
//! A segment is one output archive. Its record stream is buffered in
//! memory, seeded with the version marker, and only written into the
//! container when the segment is finalized. Attachments are streamed into
//! the container as their records are placed.
//!
//! ## Segment Layout
//!
//! ```text
//! {prefix}{seq:03}.{ext}
//! ├── data/<attachment path>   one entry per copied reference
//! └── import.jsonl             {"type":"version","version":1} + records
//! ```

mod plan;
mod writer;

pub use plan::{PlanSegment, PlanSink};
pub use writer::{ZipSegment, ZipSegmentSink};

use crate::error::CoreResult;
use crate::source::AttachmentSource;
use std::path::PathBuf;

/// Opens segments. Sequence numbers are assigned by the caller, start at 1
/// and are never reused.
pub trait SegmentSink {
    /// The open segment type.
    type Segment: OpenSegment;

    /// Opens segment number `sequence`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be created.
    fn open(&mut self, sequence: u64) -> CoreResult<Self::Segment>;
}

/// A segment that is accepting records.
pub trait OpenSegment {
    /// Appends one raw record line (without terminator) to the buffered
    /// record stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be buffered.
    fn write_record(&mut self, raw: &[u8]) -> CoreResult<()>;

    /// Creates the entry `data/<path>` and streams the source bytes into it.
    ///
    /// If the source lacks the entry, the entry is still created, empty.
    /// Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the source or writing the entry fails.
    fn copy_attachment(&mut self, source: &mut dyn AttachmentSource, path: &str)
        -> CoreResult<u64>;

    /// Writes the buffered record stream and closes the segment.
    ///
    /// Returns the output path, if the segment produced a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be completed.
    fn finalize(self) -> CoreResult<Option<PathBuf>>;
}
