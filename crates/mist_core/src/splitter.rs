//! Single-pass split orchestration.
//!
//! The splitter pulls records in source order and keeps one segment open
//! at a time:
//!
//! ```text
//! NoSegmentOpen ──record──► SegmentOpen ──record, no split──► SegmentOpen
//!       ▲                        │
//!       └──── split: finalize ───┘   (the record then opens the next one)
//!
//! end of input: finalize the open segment
//! ```
//!
//! The policy is only consulted while a segment is open, so the first
//! record of a run never triggers a split. A record that triggers a split
//! is the first member of the next segment.

use crate::config::SplitConfig;
use crate::error::{CoreResult, Warning};
use crate::policy::SplitPolicy;
use crate::resolver::resolve_attachments;
use crate::segment::{OpenSegment, PlanSink, SegmentSink, ZipSegmentSink};
use crate::source::AttachmentSource;
use crate::state::Progress;
use mist_archive::ArchiveIndex;
use mist_codec::RecordReader;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Records between progress log lines.
const PROGRESS_INTERVAL: u64 = 1023;

/// What one finalized segment holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSummary {
    /// Sequence number, starting at 1.
    pub sequence: u64,
    /// Output file, or `None` for a dry run.
    pub path: Option<PathBuf>,
    /// Records placed in the segment (the version marker excluded).
    pub records: u64,
    /// Reported attachment bytes placed in the segment.
    pub attachment_bytes: u64,
    /// Attachment entries written, placeholders included.
    pub attachments: usize,
}

/// Outcome of a completed split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Finalized segments in sequence order.
    pub segments: Vec<SegmentSummary>,
    /// Counters at end of input.
    pub progress: Progress,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<Warning>,
}

/// The segment currently accepting records.
struct Part<S> {
    segment: S,
    sequence: u64,
    attachments: usize,
}

impl<S: OpenSegment> Part<S> {
    fn open<K>(sink: &mut K, sequence: u64) -> CoreResult<Self>
    where
        K: SegmentSink<Segment = S>,
    {
        Ok(Self {
            segment: sink.open(sequence)?,
            sequence,
            attachments: 0,
        })
    }

    fn finalize(self, state: &Progress) -> CoreResult<SegmentSummary> {
        let path = self.segment.finalize()?;
        info!(
            "Wrote part {} ({} records, {} attachment bytes)",
            self.sequence, state.part_lines, state.part_size
        );
        Ok(SegmentSummary {
            sequence: self.sequence,
            path,
            records: state.part_lines,
            attachment_bytes: state.part_size,
            attachments: self.attachments,
        })
    }
}

enum Phase<S> {
    NoSegmentOpen,
    SegmentOpen(Part<S>),
}

impl<S> Phase<S> {
    fn is_open(&self) -> bool {
        matches!(self, Self::SegmentOpen(_))
    }

    fn take(&mut self) -> Option<Part<S>> {
        match std::mem::replace(self, Self::NoSegmentOpen) {
            Self::SegmentOpen(part) => Some(part),
            Self::NoSegmentOpen => None,
        }
    }
}

/// Splits a record stream into segments produced by `sink`.
///
/// Version records in the input are skipped: every segment starts with its
/// own marker. An empty input still produces exactly one segment.
///
/// # Errors
///
/// Stops at the first malformed record or I/O failure. Segments finalized
/// before that point are complete; the open one is abandoned.
pub fn split_records<R, A, K>(
    records: RecordReader<R>,
    source: &mut A,
    sink: &mut K,
    policy: &SplitPolicy,
) -> CoreResult<SplitReport>
where
    R: Read,
    A: AttachmentSource,
    K: SegmentSink,
{
    let mut state = Progress::default();
    let mut phase: Phase<K::Segment> = Phase::NoSegmentOpen;
    let mut sequence = 0u64;
    let mut report = SplitReport::default();

    for item in records {
        let item = item?;
        let record = item.record();

        if record.is_version() {
            debug!("Skipping version record at line {}", item.line());
            continue;
        }

        if record.unnamed_attachments() > 0 {
            warn!(
                "Line {}: skipping {} attachment(s) without a path",
                item.line(),
                record.unnamed_attachments()
            );
            report.warnings.push(Warning::UnnamedAttachments {
                line: item.line(),
                count: record.unnamed_attachments(),
            });
        }

        let resolved = resolve_attachments(&*source, record.attachments());
        for path in &resolved.missing {
            warn!("Missing file {} assumed as 0 bytes", path);
            report.warnings.push(Warning::MissingAttachment {
                path: path.clone(),
                line: item.line(),
            });
        }

        let mut next = state.advance(resolved.total_bytes);

        if phase.is_open() && policy.should_split(&state, &next) {
            if let Some(part) = phase.take() {
                report.segments.push(part.finalize(&state)?);
            }
            next = next.reseed(resolved.total_bytes);
        }

        let mut part = match phase.take() {
            Some(part) => part,
            None => {
                sequence += 1;
                Part::open(sink, sequence)?
            }
        };

        part.segment.write_record(item.raw())?;
        for path in &resolved.paths {
            part.segment.copy_attachment(&mut *source, path)?;
            part.attachments += 1;
        }

        phase = Phase::SegmentOpen(part);
        state = next;

        if state.total_lines % PROGRESS_INTERVAL == 0 {
            debug!(
                "Processed {} lines, currently in part {}",
                state.total_lines, sequence
            );
        }
    }

    let part = match phase.take() {
        Some(part) => part,
        None => {
            sequence += 1;
            Part::open(sink, sequence)?
        }
    };
    report.segments.push(part.finalize(&state)?);
    report.progress = state;

    Ok(report)
}

/// Splits the archive named in a [`SplitConfig`].
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    /// Creates a splitter for `config`.
    #[must_use]
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Writes the segments to disk.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; see [`split_records`].
    pub fn run(&self) -> CoreResult<SplitReport> {
        self.execute(&mut ZipSegmentSink::new(&self.config))
    }

    /// Computes the segments without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read or a record is malformed.
    pub fn plan(&self) -> CoreResult<SplitReport> {
        self.execute(&mut PlanSink)
    }

    fn execute<K: SegmentSink>(&self, sink: &mut K) -> CoreResult<SplitReport> {
        let (mut index, mut records) = ArchiveIndex::open(&self.config.archive)?;
        info!(
            "Splitting {} ({} attachments, {} bytes)",
            records.name(),
            index.len(),
            index.total_size()
        );

        let reader =
            RecordReader::with_max_line_length(records.open()?, self.config.max_line_length);
        let report = split_records(reader, &mut index, sink, &self.config.policy())?;

        info!(
            "Processed {} lines into {} parts",
            report.progress.total_lines,
            report.segments.len()
        );
        Ok(report)
    }
}
