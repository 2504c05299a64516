use serde::Serialize;
use sha2::{Digest, Sha256};

/// A review comment handed to the code review system. Built once through
/// [`comment_create`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub id: String,
    pub path: String,
    pub description: String,
    pub snipset: bool,
    pub start_line: u32,
    pub end_line: u32,
    pub language: String,
}

/// Derive a stable comment id from its text.
///
/// Re-running a review on unchanged content yields the same id, which lets
/// the review system recognise a comment it already posted.
pub fn comment_generate_id(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(description.as_bytes());
    hex::encode(hasher.finalize())
}

/// Assemble a comment record.
pub fn comment_create(
    id: String,
    path: &str,
    description: String,
    snipset: bool,
    start_line: u32,
    end_line: u32,
    language: &str,
) -> CommentRecord {
    CommentRecord {
        id,
        path: path.to_string(),
        description,
        snipset,
        start_line,
        end_line,
        language: language.to_string(),
    }
}
