//! Record builders and property-based generators.

use proptest::prelude::*;
use serde_json::json;

/// A `user` record.
pub fn user_record(username: &str) -> String {
    json!({"type": "user", "user": {"username": username, "email": format!("{username}@example.com")}})
        .to_string()
}

/// A `post` record referencing `attachments`.
pub fn post_record(message: &str, attachments: &[&str]) -> String {
    json!({
        "type": "post",
        "post": {
            "team": "team",
            "channel": "town-square",
            "user": "alice",
            "message": message,
            "attachments": attachment_list(attachments),
        }
    })
    .to_string()
}

/// A `direct_post` record referencing `attachments`.
pub fn direct_post_record(message: &str, attachments: &[&str]) -> String {
    json!({
        "type": "direct_post",
        "direct_post": {
            "channel_members": ["alice", "bob"],
            "user": "alice",
            "message": message,
            "attachments": attachment_list(attachments),
        }
    })
    .to_string()
}

fn attachment_list(paths: &[&str]) -> serde_json::Value {
    paths.iter().map(|path| json!({ "path": path })).collect()
}

/// One generated post: its message and the sizes of its attachments.
#[derive(Debug, Clone)]
pub struct GeneratedPost {
    /// Post message.
    pub message: String,
    /// Attachment sizes in bytes.
    pub attachment_sizes: Vec<usize>,
    /// Whether to emit it as a `direct_post`.
    pub direct: bool,
}

/// Strategy for a single post with up to three small attachments.
pub fn arb_post() -> impl Strategy<Value = GeneratedPost> {
    (
        "[a-zA-Z0-9 ]{0,32}",
        prop::collection::vec(0usize..256, 0..3),
        any::<bool>(),
    )
        .prop_map(|(message, attachment_sizes, direct)| GeneratedPost {
            message,
            attachment_sizes,
            direct,
        })
}

/// Strategy for a sequence of posts.
pub fn arb_posts(max: usize) -> impl Strategy<Value = Vec<GeneratedPost>> {
    prop::collection::vec(arb_post(), 0..max)
}

/// Turns generated posts into a source archive builder. Attachment `j` of
/// post `i` is stored at `data/p{i}/{j}.bin`.
pub fn build_source(posts: &[GeneratedPost]) -> crate::fixtures::SourceArchiveBuilder {
    let mut builder = crate::fixtures::SourceArchiveBuilder::new();
    for (i, post) in posts.iter().enumerate() {
        let names: Vec<String> = (0..post.attachment_sizes.len())
            .map(|j| format!("p{i}/{j}.bin"))
            .collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        builder = if post.direct {
            builder.record(direct_post_record(&post.message, &refs))
        } else {
            builder.record(post_record(&post.message, &refs))
        };
        for (name, size) in names.iter().zip(&post.attachment_sizes) {
            builder = builder.attachment(name, vec![(i % 251) as u8; *size]);
        }
    }
    builder
}
