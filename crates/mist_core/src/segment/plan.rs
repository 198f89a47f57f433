//! Dry-run segment output.

use super::{OpenSegment, SegmentSink};
use crate::attachment_entry_name;
use crate::error::CoreResult;
use crate::source::AttachmentSource;
use std::path::PathBuf;

/// A sink that opens no files. Used to preview where boundaries fall.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSink;

/// A segment of a dry run.
#[derive(Debug, Default)]
pub struct PlanSegment;

impl SegmentSink for PlanSink {
    type Segment = PlanSegment;

    fn open(&mut self, _sequence: u64) -> CoreResult<PlanSegment> {
        Ok(PlanSegment)
    }
}

impl OpenSegment for PlanSegment {
    fn write_record(&mut self, _raw: &[u8]) -> CoreResult<()> {
        Ok(())
    }

    fn copy_attachment(
        &mut self,
        source: &mut dyn AttachmentSource,
        path: &str,
    ) -> CoreResult<u64> {
        Ok(source
            .entry_size(&attachment_entry_name(path))
            .unwrap_or(0))
    }

    fn finalize(self) -> CoreResult<Option<PathBuf>> {
        Ok(None)
    }
}
