//! Benchmark utilities.

#![warn(missing_docs)]

use mist_testkit::{post_record, user_record};

/// A record stream of `count` lines alternating users and posts, each post
/// referencing `attachments_per_post` attachments.
pub fn record_stream(count: usize, attachments_per_post: usize) -> String {
    let mut stream = String::new();
    for i in 0..count {
        let line = if i % 2 == 0 {
            user_record(&format!("user{i}"))
        } else {
            let names: Vec<String> = (0..attachments_per_post)
                .map(|j| format!("p{i}/{j}.bin"))
                .collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            post_record(&format!("message {i}"), &refs)
        };
        stream.push_str(&line);
        stream.push('\n');
    }
    stream
}
