//! Attachment resolution.

use crate::attachment_entry_name;
use crate::source::AttachmentSource;

/// Attachments of one record, resolved against the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAttachments {
    /// Every referenced path, relative to `data/`, in record order. Missing
    /// paths are kept so the copy step still emits their placeholder entries.
    pub paths: Vec<String>,
    /// Sum of the reported sizes of the paths that exist.
    pub total_bytes: u64,
    /// Full entry paths that were referenced but absent.
    pub missing: Vec<String>,
}

/// Looks up each reference under `data/` and sums the sizes found.
///
/// A missing reference contributes zero bytes, is listed in
/// [`ResolvedAttachments::missing`] and is still returned in
/// [`ResolvedAttachments::paths`]. Resolution never fails.
pub fn resolve_attachments<S: AttachmentSource + ?Sized>(
    source: &S,
    references: &[String],
) -> ResolvedAttachments {
    let mut resolved = ResolvedAttachments {
        paths: Vec::with_capacity(references.len()),
        ..ResolvedAttachments::default()
    };

    for reference in references {
        let entry = attachment_entry_name(reference);
        match source.entry_size(&entry) {
            Some(size) => resolved.total_bytes += size,
            None => resolved.missing.push(entry),
        }
        resolved.paths.push(reference.clone());
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert("data/a.png", vec![0u8; 100]);
        source.insert("data/dir/b.txt", vec![0u8; 20]);
        source
    }

    #[test]
    fn sums_present_attachments() {
        let refs = vec!["a.png".to_string(), "dir/b.txt".to_string()];
        let resolved = resolve_attachments(&source(), &refs);
        assert_eq!(resolved.paths, refs);
        assert_eq!(resolved.total_bytes, 120);
        assert!(resolved.missing.is_empty());
    }

    #[test]
    fn missing_attachment_counts_zero_but_is_kept() {
        let refs = vec!["foo/bar.png".to_string(), "a.png".to_string()];
        let resolved = resolve_attachments(&source(), &refs);
        assert_eq!(resolved.paths, refs);
        assert_eq!(resolved.total_bytes, 100);
        assert_eq!(resolved.missing, vec!["data/foo/bar.png".to_string()]);
    }

    #[test]
    fn duplicates_are_counted_each_time() {
        let refs = vec!["a.png".to_string(), "a.png".to_string()];
        let resolved = resolve_attachments(&source(), &refs);
        assert_eq!(resolved.paths.len(), 2);
        assert_eq!(resolved.total_bytes, 200);
    }

    #[test]
    fn no_references() {
        let resolved = resolve_attachments(&source(), &[]);
        assert_eq!(resolved, ResolvedAttachments::default());
    }

    #[test]
    fn paths_are_not_prefixed_twice() {
        let refs = vec!["data/a.png".to_string()];
        let resolved = resolve_attachments(&source(), &refs);
        assert_eq!(resolved.missing, vec!["data/data/a.png".to_string()]);
    }
}
