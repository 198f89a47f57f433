//! # mist codec
//!
//! Decoding of the newline-delimited import record stream.
//!
//! Only the parts of a record the splitter acts on are interpreted:
//!
//! - the `type` discriminator
//! - the attachment paths of `post` and `direct_post` records
//!
//! Everything else stays opaque. Each decoded record keeps its raw line so
//! it can be written back out byte-for-byte.
//!
//! ## Usage
//!
//! ```
//! use mist_codec::{RecordKind, RecordReader};
//!
//! let input = br#"{"type":"post","post":{"attachments":[{"path":"a/b.png"}]}}"#;
//! let mut reader = RecordReader::new(&input[..]);
//!
//! let line = reader.next().unwrap().unwrap();
//! assert_eq!(line.record().kind(), &RecordKind::Post);
//! assert_eq!(line.record().attachments(), ["a/b.png"]);
//! assert!(reader.next().is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod reader;
mod record;

pub use error::{CodecError, CodecResult};
pub use reader::{RecordLine, RecordReader, DEFAULT_MAX_LINE_LENGTH};
pub use record::{Record, RecordKind};

/// The marker line every output record stream starts with.
pub const VERSION_LINE: &str = r#"{"type":"version","version":1}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_is_a_version_record() {
        let record = Record::decode(VERSION_LINE.as_bytes()).unwrap();
        assert!(record.is_version());
        assert!(record.attachments().is_empty());
    }
}
