//! Typed view of a single import record.

use serde::Deserialize;

/// Discriminator of an import record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// The stream version marker.
    Version,
    /// A channel post.
    Post,
    /// A direct-message post.
    DirectPost,
    /// Any other record kind (users, teams, channels, ...).
    Other(String),
}

impl RecordKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "version" => Self::Version,
            "post" => Self::Post,
            "direct_post" => Self::DirectPost,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The `type` tag as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Version => "version",
            Self::Post => "post",
            Self::DirectPost => "direct_post",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded record: its kind and the attachment paths it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    attachments: Vec<String>,
    unnamed_attachments: usize,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    post: Option<PostBody>,
    #[serde(default)]
    direct_post: Option<PostBody>,
}

#[derive(Deserialize)]
struct PostBody {
    #[serde(default)]
    attachments: Option<Vec<AttachmentBody>>,
}

#[derive(Deserialize)]
struct AttachmentBody {
    #[serde(default)]
    path: Option<String>,
}

impl Record {
    /// Decodes one record line (without its terminator).
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the line is not an object with a string
    /// `type` field, or if the attachment list has the wrong shape.
    pub fn decode(line: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(line)?;
        let kind = RecordKind::from_tag(&envelope.kind);

        let body = match kind {
            RecordKind::Post => envelope.post,
            RecordKind::DirectPost => envelope.direct_post,
            _ => None,
        };

        let mut attachments = Vec::new();
        let mut unnamed_attachments = 0;
        for attachment in body.and_then(|b| b.attachments).unwrap_or_default() {
            match attachment.path {
                Some(path) => attachments.push(path),
                None => unnamed_attachments += 1,
            }
        }

        Ok(Self {
            kind,
            attachments,
            unnamed_attachments,
        })
    }

    /// The record kind.
    #[must_use]
    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Returns `true` for the stream version marker.
    #[must_use]
    pub fn is_version(&self) -> bool {
        self.kind == RecordKind::Version
    }

    /// Attachment paths, relative to the archive's `data/` directory, in
    /// the order they appear in the record.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Number of attachment objects that carried no `path`.
    #[must_use]
    pub fn unnamed_attachments(&self) -> usize {
        self.unnamed_attachments
    }
}
