// Persistence layer. The store exposes one async trait with a PostgreSQL
// implementation for production and a SQLite implementation for local runs
// and tests. Referential integrity is application-level: only uniqueness
// constraints live in the schema, so deletes leave dangling references that
// read paths must tolerate.

pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{
    AssocKind, Association, Category, Comment, CommentDetail, Post, PostDetail, User,
};

pub use postgres::PostgresDatabase;
pub use sqlite::SqliteDatabase;

/// Current time in milliseconds since the Unix epoch. All persisted
/// timestamps use this resolution.
pub fn current_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Filter for the post listing. `search` and `category_id` are applied only
/// when present; `page` is 1-indexed.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub page: u32,
    pub limit: u32,
}

/// One page of results plus the total row count for the same filter.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Translate a sqlx error into the application taxonomy: unique-constraint
/// violations become a user-facing duplicate-key error, everything else a
/// 500-class database error carrying the context string.
pub(crate) fn map_sqlx_err(err: sqlx::Error, conflict: &str, context: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            AppError::DuplicateKey(conflict.to_string())
        }
        _ => AppError::Database(format!("{}: {}", context, err)),
    }
}

#[async_trait]
pub trait DatabaseInterface: Send + Sync {
    /// Cheap connectivity probe for the liveness endpoint.
    async fn health_check(&self) -> AppResult<()>;

    // User directory
    async fn create_user(&self, user: &User) -> AppResult<()>;
    async fn get_user(&self, id: i64) -> AppResult<Option<User>>;
    async fn get_user_by_clerk_id(&self, clerk_id: &str) -> AppResult<Option<User>>;
    async fn list_users(&self) -> AppResult<Vec<User>>;

    // Category catalog
    async fn create_category(&self, category: &Category) -> AppResult<()>;
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    // Post store
    async fn create_post(&self, post: &Post) -> AppResult<()>;
    async fn get_post(&self, id: i64) -> AppResult<Option<Post>>;
    async fn get_post_detail(&self, id: i64) -> AppResult<Option<PostDetail>>;
    async fn list_posts(&self, filter: &PostFilter) -> AppResult<Page<PostDetail>>;
    async fn update_post(&self, post: &Post) -> AppResult<()>;
    async fn delete_post(&self, id: i64) -> AppResult<bool>;

    // Comments
    async fn create_comment(&self, comment: &Comment) -> AppResult<()>;
    async fn get_comment(&self, id: i64) -> AppResult<Option<Comment>>;
    async fn get_comment_detail(&self, id: i64) -> AppResult<Option<CommentDetail>>;
    async fn list_comments(
        &self,
        post_id: i64,
        page: u32,
        limit: u32,
    ) -> AppResult<Page<CommentDetail>>;
    async fn update_comment(&self, id: i64, content: &str, now: i64) -> AppResult<()>;
    async fn delete_comment(&self, id: i64) -> AppResult<bool>;

    // Toggle associations (like, bookmark). `assoc_add` surfaces a
    // duplicate-key error when the row already exists so callers can fold
    // a lost toggle race into the idempotent outcome.
    async fn assoc_add(
        &self,
        source_id: i64,
        kind: AssocKind,
        target_id: i64,
        now: i64,
    ) -> AppResult<()>;
    async fn assoc_delete(
        &self,
        source_id: i64,
        kind: AssocKind,
        target_id: i64,
    ) -> AppResult<bool>;
    async fn assoc_exists(
        &self,
        source_id: i64,
        kind: AssocKind,
        target_id: i64,
    ) -> AppResult<bool>;
    async fn assoc_count_for_target(&self, kind: AssocKind, target_id: i64) -> AppResult<u64>;
    async fn assocs_by_source(
        &self,
        source_id: i64,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>>;
}

/// Connect to the backend selected by the URL scheme and initialize the
/// schema.
pub async fn connect(database_url: &str) -> AppResult<Arc<dyn DatabaseInterface>> {
    if database_url.starts_with("postgres") {
        let db = PostgresDatabase::connect(database_url).await?;
        db.initialize().await?;
        Ok(Arc::new(db))
    } else {
        let db = SqliteDatabase::connect(database_url).await?;
        db.initialize().await?;
        Ok(Arc::new(db))
    }
}
