use serde::{Deserialize, Serialize};

use crate::models::post::BookmarkedPostSummary;

/// The two toggle-association kinds. Both are `(user -> post)` edges sharing
/// one table and one uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssocKind {
    Like,
    Bookmark,
}

impl AssocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssocKind::Like => "like",
            AssocKind::Bookmark => "bookmark",
        }
    }
}

/// One persisted association edge.
#[derive(Debug, Clone)]
pub struct Association {
    pub source_id: i64,
    pub kind: AssocKind,
    pub target_id: i64,
    pub created_at: i64,
}

/// Result of a toggle: the new state plus a fresh aggregate count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub active: bool,
    pub count: u64,
}

/// Read-path status for a post, relative to an optional viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementStatus {
    pub active: bool,
    pub count: u64,
}

/// One entry of `GET /users/{userId}/likes`, the liked post populated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLikeEntry {
    pub created_at: i64,
    pub post: Option<LikedPostSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedPostSummary {
    pub id: i64,
    pub title: String,
    pub created_at: i64,
    pub author: Option<LikedPostAuthor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedPostAuthor {
    pub username: String,
}

/// One entry of `GET /bookmarks`, the bookmarked post populated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub created_at: i64,
    pub post: Option<BookmarkedPostSummary>,
}
