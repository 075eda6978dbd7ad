//! Read-only views the ranking pass needs from stored entities.
//!
//! The service's row types implement these traits, which keeps the ranking
//! code independent of the database layer.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Category assigned to posts created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A rankable post.
pub trait FeedItem {
    fn id(&self) -> Uuid;
    /// Raw category label as stored, possibly absent or blank
    fn category(&self) -> Option<&str>;
    fn created_at(&self) -> DateTime<Utc>;
}

/// A like, carrying the category copied from the post when it was liked.
pub trait LikeFact {
    fn category(&self) -> Option<&str>;
}

/// A comment on a post.
pub trait CommentFact {
    fn post_id(&self) -> Uuid;
    /// Account that wrote the comment; `None` once that account is deleted
    fn commenter_id(&self) -> Option<Uuid>;
    /// Display name stored with the comment
    fn commenter(&self) -> &str;
}

/// Resolves the number of likes for a post.
pub trait LikeCounts {
    fn like_count(&self, post_id: Uuid) -> i64;
}

impl LikeCounts for HashMap<Uuid, i64> {
    fn like_count(&self, post_id: Uuid) -> i64 {
        self.get(&post_id).copied().unwrap_or(0)
    }
}

/// Trims a post category, falling back to [`DEFAULT_CATEGORY`] when absent or blank.
pub fn normalize_category(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_CATEGORY,
    }
}
