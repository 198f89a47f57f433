//! Streaming record reader.
//!
//! Reads the record stream one line at a time without buffering the whole
//! stream. Line length is capped so a corrupt stream cannot force an
//! unbounded allocation.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use bytes::Bytes;
use std::io::{BufRead, BufReader, Read};

/// Default cap on a single record line: 64 MiB.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024 * 1024;

/// A decoded record together with its position and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLine {
    line: u64,
    offset: u64,
    raw: Bytes,
    record: Record,
}

impl RecordLine {
    /// 1-based line number in the source stream.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Byte offset of the start of the line.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The line exactly as read, without its terminator.
    #[must_use]
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// The decoded record.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// A lazy, forward-only sequence of records.
///
/// Yields one [`RecordLine`] per line, in stream order. A blank line is
/// malformed like any other undecodable line. The first error ends the
/// sequence. Restarting requires reopening the source.
///
/// # Example
///
/// ```
/// use mist_codec::RecordReader;
///
/// let input = "{\"type\":\"user\"}\n{\"type\":\"team\"}\n";
/// let lines: Vec<_> = RecordReader::new(input.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].line(), 2);
/// ```
pub struct RecordReader<R> {
    inner: BufReader<R>,
    max_line_length: usize,
    line: u64,
    offset: u64,
    buffer: Vec<u8>,
    finished: bool,
}

impl<R: Read> RecordReader<R> {
    /// Creates a reader with the default line-length cap.
    pub fn new(inner: R) -> Self {
        Self::with_max_line_length(inner, DEFAULT_MAX_LINE_LENGTH)
    }

    /// Creates a reader that rejects lines longer than `max_line_length`
    /// bytes (counting a trailing carriage return, if any).
    pub fn with_max_line_length(inner: R, max_line_length: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_line_length,
            line: 0,
            offset: 0,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.line
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    /// Reads the next physical line into the buffer.
    ///
    /// Returns the line's start offset, or `None` at end of stream.
    fn read_line(&mut self) -> CodecResult<Option<u64>> {
        self.buffer.clear();
        let start = self.offset;
        let limit = (self.max_line_length as u64).saturating_add(1);

        let read = (&mut self.inner)
            .take(limit)
            .read_until(b'\n', &mut self.buffer)?;
        if read == 0 {
            return Ok(None);
        }

        self.line += 1;
        self.offset += read as u64;

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
        } else if self.buffer.len() > self.max_line_length {
            return Err(CodecError::LineTooLong {
                line: self.line,
                offset: start,
                limit: self.max_line_length,
            });
        }
        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }

        Ok(Some(start))
    }

    fn read_next_record(&mut self) -> CodecResult<Option<RecordLine>> {
        let Some(offset) = self.read_line()? else {
            return Ok(None);
        };

        let record = Record::decode(&self.buffer)
            .map_err(|e| CodecError::malformed(self.line, offset, e.to_string()))?;

        Ok(Some(RecordLine {
            line: self.line,
            offset,
            raw: Bytes::copy_from_slice(&self.buffer),
            record,
        }))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = CodecResult<RecordLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_next_record() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use proptest::prelude::*;

    fn read_all(input: &str) -> Vec<RecordLine> {
        RecordReader::new(input.as_bytes())
            .collect::<CodecResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn empty_stream() {
        assert!(read_all("").is_empty());
    }

    #[test]
    fn positions_are_tracked() {
        let input = "{\"type\":\"user\"}\n{\"type\":\"post\"}\n";
        let lines = read_all(input);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line(), 1);
        assert_eq!(lines[0].offset(), 0);
        assert_eq!(lines[1].line(), 2);
        assert_eq!(lines[1].offset(), 16);
        assert_eq!(lines[1].record().kind(), &RecordKind::Post);
    }

    #[test]
    fn raw_bytes_are_preserved() {
        let line = r#"{ "type" : "post",  "post": {"message":"ünïcode", "extra": [1, 2.5, null]} }"#;
        let lines = read_all(&format!("{line}\n"));
        assert_eq!(&lines[0].raw()[..], line.as_bytes());
    }

    #[test]
    fn last_line_without_newline() {
        let lines = read_all("{\"type\":\"user\"}\n{\"type\":\"team\"}");
        assert_eq!(lines.len(), 2);
        assert_eq!(&lines[1].raw()[..], b"{\"type\":\"team\"}");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let lines = read_all("{\"type\":\"user\"}\r\n{\"type\":\"team\"}\r\n");
        assert_eq!(&lines[0].raw()[..], b"{\"type\":\"user\"}");
        assert_eq!(lines[1].offset(), 17);
    }

    #[test]
    fn blank_line_is_malformed() {
        let input = "{\"type\":\"user\"}\n\n{\"type\":\"team\"}\n";
        let mut reader = RecordReader::new(input.as_bytes());

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(CodecError::Malformed { line, offset, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(offset, 16);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn whitespace_only_line_is_malformed() {
        let input = "   \t\n{\"type\":\"user\"}\n";
        let err = RecordReader::new(input.as_bytes())
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed { line: 1, offset: 0, .. }));
    }

    #[test]
    fn unbounded_line_length_reads_every_line() {
        let input = "{\"type\":\"user\"}\n{\"type\":\"team\"}\n";
        let mut reader = RecordReader::with_max_line_length(input.as_bytes(), usize::MAX);
        let lines: Vec<_> = reader.by_ref().collect::<CodecResult<_>>().unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(&lines[1].raw()[..], b"{\"type\":\"team\"}");
        assert_eq!(reader.lines_read(), 2);
    }

    #[test]
    fn malformed_line_stops_iteration() {
        let input = "{\"type\":\"user\"}\n{broken\n{\"type\":\"team\"}\n";
        let mut reader = RecordReader::new(input.as_bytes());

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(CodecError::Malformed { line, offset, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(offset, 16);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn line_cap_is_enforced() {
        let long = format!("{{\"type\":\"post\",\"pad\":\"{}\"}}", "x".repeat(100));
        let input = format!("{{\"type\":\"user\"}}\n{long}\n");
        let mut reader = RecordReader::with_max_line_length(input.as_bytes(), 64);

        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            CodecError::LineTooLong { line: 2, limit: 64, .. }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn line_at_cap_is_accepted() {
        let line = "{\"type\":\"user\"}";
        let input = format!("{line}\n{line}");
        let lines: Vec<_> = RecordReader::with_max_line_length(input.as_bytes(), line.len())
            .collect::<CodecResult<_>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
    }

    proptest! {
        #[test]
        fn order_and_content_preserved(messages in prop::collection::vec("[a-z ]{0,20}", 0..30)) {
            let raw: Vec<String> = messages
                .iter()
                .map(|m| serde_json::json!({"type": "post", "post": {"message": m}}).to_string())
                .collect();
            let input: String = raw.iter().map(|l| format!("{l}\n")).collect();

            let lines = read_all(&input);
            prop_assert_eq!(lines.len(), raw.len());
            for (decoded, original) in lines.iter().zip(&raw) {
                prop_assert_eq!(&decoded.raw()[..], original.as_bytes());
            }
        }
    }
}
