//! Split command implementation.

use super::size::format_size;
use mist_core::{SplitConfig, SplitReport, Splitter};
use serde::Serialize;
use tracing::info;

/// Split result as printed.
#[derive(Debug, Serialize)]
pub struct SplitResult {
    /// Whether nothing was written.
    pub dry_run: bool,
    /// Records placed across all segments.
    pub total_records: u64,
    /// Attachment bytes placed across all segments.
    pub total_attachment_bytes: u64,
    /// Per-segment details.
    pub segments: Vec<SegmentRow>,
    /// Warnings raised during the split.
    pub warnings: Vec<String>,
}

/// One output segment.
#[derive(Debug, Serialize)]
pub struct SegmentRow {
    /// Sequence number.
    pub sequence: u64,
    /// Output file name (or the name it would get).
    pub file: String,
    /// Records in the segment.
    pub records: u64,
    /// Attachment entries in the segment.
    pub attachments: usize,
    /// Attachment bytes in the segment.
    pub attachment_bytes: u64,
}

/// Runs the split command.
pub fn run(
    config: SplitConfig,
    dry_run: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = execute(config, dry_run)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }

    Ok(())
}

/// Splits (or plans) according to `config`.
pub fn execute(config: SplitConfig, dry_run: bool) -> Result<SplitResult, Box<dyn std::error::Error>> {
    let splitter = Splitter::new(config);

    if dry_run {
        info!("Planning split of {:?} (dry run)", splitter.config().archive);
        let report = splitter.plan()?;
        Ok(summarize(splitter.config(), &report, true))
    } else {
        info!("Splitting {:?}", splitter.config().archive);
        let report = splitter.run()?;
        Ok(summarize(splitter.config(), &report, false))
    }
}

fn summarize(config: &SplitConfig, report: &SplitReport, dry_run: bool) -> SplitResult {
    SplitResult {
        dry_run,
        total_records: report.progress.total_lines,
        total_attachment_bytes: report.progress.total_size,
        segments: report
            .segments
            .iter()
            .map(|segment| SegmentRow {
                sequence: segment.sequence,
                file: segment
                    .path
                    .clone()
                    .unwrap_or_else(|| config.segment_path(segment.sequence))
                    .display()
                    .to_string(),
                records: segment.records,
                attachments: segment.attachments,
                attachment_bytes: segment.attachment_bytes,
            })
            .collect(),
        warnings: report.warnings.iter().map(ToString::to_string).collect(),
    }
}

fn print_text_output(result: &SplitResult) {
    if result.dry_run {
        println!("(dry run - no files written)");
        println!();
    }

    println!(
        "{:>5}  {:>10}  {:>11}  {:>12}  File",
        "Part", "Records", "Attachments", "Size"
    );
    for segment in &result.segments {
        println!(
            "{:>5}  {:>10}  {:>11}  {:>12}  {}",
            segment.sequence,
            segment.records,
            segment.attachments,
            format_size(segment.attachment_bytes),
            segment.file
        );
    }
    println!();
    println!(
        "{} records, {} of attachments in {} part(s)",
        result.total_records,
        format_size(result.total_attachment_bytes),
        result.segments.len()
    );

    if !result.warnings.is_empty() {
        println!();
        println!("{} warning(s):", result.warnings.len());
        for warning in &result.warnings {
            println!("  {warning}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mist_testkit::prelude::*;

    fn fixture() -> SplitFixture {
        SplitFixture::new(
            SourceArchiveBuilder::new()
                .record(user_record("a"))
                .record(post_record("p", &["x.bin", "gone.bin"]))
                .record(user_record("b"))
                .attachment("x.bin", vec![0u8; 64]),
        )
    }

    #[test]
    fn dry_run_writes_nothing() {
        let fixture = fixture();
        let config = SplitConfig::new()
            .archive(fixture.source())
            .prefix(fixture.prefix())
            .max_lines(2);

        let result = execute(config, true).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.segments.len(), 2);
        assert!(result.segments[0].file.ends_with("split_001.zip"));
        assert!(fixture.outputs(&fixture.prefix()).is_empty());
    }

    #[test]
    fn split_reports_segments_and_warnings() {
        let fixture = fixture();
        let config = SplitConfig::new()
            .archive(fixture.source())
            .prefix(fixture.prefix())
            .max_lines(2)
            .max_bytes(0);

        let result = execute(config, false).unwrap();
        assert_eq!(result.total_records, 3);
        assert_eq!(result.total_attachment_bytes, 64);
        assert_eq!(result.segments[0].records, 2);
        assert_eq!(result.segments[0].attachments, 2);
        assert_eq!(result.segments[1].records, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("data/gone.bin"));
        assert_eq!(fixture.outputs(&fixture.prefix()).len(), 2);
    }
}
