//! Inspect command implementation.

use super::size::format_size;
use mist_archive::ArchiveIndex;
use mist_codec::RecordReader;
use mist_core::attachment_entry_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Archive inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Archive path.
    pub path: String,
    /// Name of the record-stream entry.
    pub record_stream: String,
    /// Uncompressed size of the record stream.
    pub record_stream_size: u64,
    /// Number of non-record entries.
    pub entry_count: usize,
    /// Uncompressed size of all non-record entries.
    pub entry_bytes: u64,
    /// Record counts by `type`.
    pub record_kinds: BTreeMap<String, u64>,
    /// Attachment references across all records.
    pub attachment_references: u64,
    /// Reported bytes of the references that resolve.
    pub referenced_bytes: u64,
    /// References with no matching entry.
    pub missing_attachments: Vec<String>,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }

    Ok(())
}

/// Reads the archive once and tallies its contents.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let (index, mut records) = ArchiveIndex::open(path)?;

    let mut result = InspectResult {
        path: path.display().to_string(),
        record_stream: records.name().to_string(),
        record_stream_size: records.size(),
        entry_count: index.len(),
        entry_bytes: index.total_size(),
        record_kinds: BTreeMap::new(),
        attachment_references: 0,
        referenced_bytes: 0,
        missing_attachments: Vec::new(),
    };

    for line in RecordReader::new(records.open()?) {
        let line = line?;
        let record = line.record();
        *result
            .record_kinds
            .entry(record.kind().as_str().to_string())
            .or_insert(0) += 1;

        for attachment in record.attachments() {
            result.attachment_references += 1;
            let name = attachment_entry_name(attachment);
            match index.get(&name) {
                Some(entry) => result.referenced_bytes += entry.size(),
                None => result.missing_attachments.push(name),
            }
        }
    }

    Ok(result)
}

fn print_text_output(result: &InspectResult) {
    println!("Archive: {}", result.path);
    println!();
    println!(
        "Record stream:       {} ({})",
        result.record_stream,
        format_size(result.record_stream_size)
    );
    println!(
        "Other entries:       {} ({})",
        result.entry_count,
        format_size(result.entry_bytes)
    );
    println!();
    println!("Records:");
    for (kind, count) in &result.record_kinds {
        println!("  {:<20} {}", kind, count);
    }
    println!();
    println!(
        "Attachment refs:     {} ({})",
        result.attachment_references,
        format_size(result.referenced_bytes)
    );
    println!("Missing attachments: {}", result.missing_attachments.len());
    for missing in &result.missing_attachments {
        println!("  {missing}");
    }
}
