use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row};

use crate::error::{AppError, AppResult};
use crate::models::{
    AssocKind, Association, Category, Comment, CommentAuthor, CommentDetail, Post, PostAuthor,
    PostCategory, PostDetail, User,
};
use crate::store::{map_sqlx_err, DatabaseInterface, Page, PostFilter};

/// SQLite implementation of the store, for local runs and tests.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true);

        // A pooled `:memory:` database is per-connection; cap the pool at
        // one so every query sees the same database.
        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options.max_connections(1);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;
        Ok(Self { pool })
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        let db = Self::connect("sqlite::memory:").await?;
        db.initialize().await?;
        Ok(db)
    }

    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                clerk_id TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                avatar_url TEXT NOT NULL DEFAULT '',
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create categories table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                author_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                featured_image TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '[]',
                is_published INTEGER NOT NULL DEFAULT 0,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create posts table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY,
                post_id INTEGER NOT NULL,
                author_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                is_edited INTEGER NOT NULL DEFAULT 0,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create comments table: {}", e)))?;

        // The compound primary key is the uniqueness invariant that makes
        // like/bookmark toggling idempotent under race.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS associations (
                source_id INTEGER NOT NULL,
                assoc_kind TEXT NOT NULL,
                target_id INTEGER NOT NULL,
                time_created INTEGER NOT NULL,
                PRIMARY KEY (source_id, assoc_kind, target_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create associations table: {}", e)))?;

        for stmt in [
            "CREATE INDEX IF NOT EXISTS idx_posts_time ON posts(time_created DESC)",
            "CREATE INDEX IF NOT EXISTS idx_posts_category ON posts(category_id)",
            "CREATE INDEX IF NOT EXISTS idx_comments_post_time ON comments(post_id, time_created DESC)",
            "CREATE INDEX IF NOT EXISTS idx_assoc_target ON associations(target_id, assoc_kind)",
            "CREATE INDEX IF NOT EXISTS idx_assoc_source_time ON associations(source_id, assoc_kind, time_created DESC)",
        ] {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
        }

        Ok(())
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        clerk_user_id: row.get("clerk_id"),
        username: row.get("username"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        profile_image_url: row.get("avatar_url"),
        created_at: row.get("time_created"),
        updated_at: row.get("time_updated"),
    }
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("time_created"),
        updated_at: row.get("time_updated"),
    }
}

fn parse_tags(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}

fn post_from_row(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        featured_image: row.get("featured_image"),
        tags: parse_tags(row.get("tags")),
        is_published: row.get("is_published"),
        created_at: row.get("time_created"),
        updated_at: row.get("time_updated"),
    }
}

fn post_detail_from_row(row: &sqlx::sqlite::SqliteRow) -> PostDetail {
    let author = row
        .get::<Option<i64>, _>("author_pk")
        .map(|id| PostAuthor {
            id,
            username: row.get("author_username"),
            email: row.get("author_email"),
        });
    let category = row
        .get::<Option<i64>, _>("category_pk")
        .map(|id| PostCategory {
            id,
            name: row.get("category_name"),
        });
    PostDetail {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        author,
        category,
        featured_image: row.get("featured_image"),
        tags: parse_tags(row.get("tags")),
        is_published: row.get("is_published"),
        created_at: row.get("time_created"),
        updated_at: row.get("time_updated"),
    }
}

fn comment_detail_from_row(row: &sqlx::sqlite::SqliteRow) -> CommentDetail {
    let author = row
        .get::<Option<i64>, _>("author_pk")
        .map(|id| CommentAuthor {
            id,
            username: row.get("author_username"),
            profile_image_url: row.get("author_avatar"),
        });
    CommentDetail {
        id: row.get("id"),
        post_id: row.get("post_id"),
        content: row.get("content"),
        is_edited: row.get("is_edited"),
        author,
        created_at: row.get("time_created"),
        updated_at: row.get("time_updated"),
    }
}

const POST_DETAIL_SELECT: &str = "SELECT p.id, p.title, p.content, p.featured_image, p.tags, \
     p.is_published, p.time_created, p.time_updated, \
     u.id AS author_pk, u.username AS author_username, u.email AS author_email, \
     c.id AS category_pk, c.name AS category_name \
     FROM posts p \
     LEFT JOIN users u ON u.id = p.author_id \
     LEFT JOIN categories c ON c.id = p.category_id";

fn push_post_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PostFilter) {
    let mut prefix = " WHERE ";
    if let Some(term) = &filter.search {
        let pattern = format!("%{}%", term);
        qb.push(prefix)
            .push("(p.title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.content LIKE ")
            .push_bind(pattern)
            .push(")");
        prefix = " AND ";
    }
    if let Some(category_id) = filter.category_id {
        qb.push(prefix).push("p.category_id = ").push_bind(category_id);
    }
}

#[async_trait]
impl DatabaseInterface for SqliteDatabase {
    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Database health check failed: {}", e)))?;
        Ok(())
    }

    async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, clerk_id, username, email, first_name, last_name, avatar_url, time_created, time_updated) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.clerk_user_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_err(
                e,
                "User with this email or username already exists",
                "Failed to create user",
            )
        })?;
        Ok(())
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user {}: {}", id, e)))?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user_by_clerk_id(&self, clerk_id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE clerk_id = ?")
            .bind(clerk_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up user: {}", e)))?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY time_created DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn create_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO categories (id, name, description, time_created, time_updated) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_err(
                e,
                "Category with this name already exists",
                "Failed to create category",
            )
        })?;
        Ok(())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list categories: {}", e)))?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn create_post(&self, post: &Post) -> AppResult<()> {
        let tags = serde_json::to_string(&post.tags)
            .map_err(|e| AppError::Internal(format!("Failed to encode tags: {}", e)))?;
        sqlx::query(
            "INSERT INTO posts (id, title, content, author_id, category_id, featured_image, tags, is_published, time_created, time_updated) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(&post.featured_image)
        .bind(tags)
        .bind(post.is_published)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create post: {}", e)))?;
        Ok(())
    }

    async fn get_post(&self, id: i64) -> AppResult<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get post {}: {}", id, e)))?;
        Ok(row.as_ref().map(post_from_row))
    }

    async fn get_post_detail(&self, id: i64) -> AppResult<Option<PostDetail>> {
        let sql = format!("{} WHERE p.id = ?", POST_DETAIL_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get post {}: {}", id, e)))?;
        Ok(row.as_ref().map(post_detail_from_row))
    }

    async fn list_posts(&self, filter: &PostFilter) -> AppResult<Page<PostDetail>> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS total FROM posts p");
        push_post_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count posts: {}", e)))?
            .get("total");

        let offset = (filter.page.saturating_sub(1) as i64) * filter.limit as i64;
        let mut qb = QueryBuilder::<Sqlite>::new(POST_DETAIL_SELECT);
        push_post_filters(&mut qb, filter);
        qb.push(" ORDER BY p.time_created DESC, p.id DESC LIMIT ")
            .push_bind(filter.limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list posts: {}", e)))?;

        Ok(Page {
            items: rows.iter().map(post_detail_from_row).collect(),
            total: total as u64,
        })
    }

    async fn update_post(&self, post: &Post) -> AppResult<()> {
        let tags = serde_json::to_string(&post.tags)
            .map_err(|e| AppError::Internal(format!("Failed to encode tags: {}", e)))?;
        sqlx::query(
            "UPDATE posts SET title = ?, content = ?, category_id = ?, featured_image = ?, tags = ?, is_published = ?, time_updated = ? \
             WHERE id = ?",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(&post.featured_image)
        .bind(tags)
        .bind(post.is_published)
        .bind(post.updated_at)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update post {}: {}", post.id, e)))?;
        Ok(())
    }

    async fn delete_post(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete post {}: {}", id, e)))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, content, is_edited, time_created, time_updated) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.is_edited)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create comment: {}", e)))?;
        Ok(())
    }

    async fn get_comment(&self, id: i64) -> AppResult<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get comment {}: {}", id, e)))?;
        Ok(row.map(|row| Comment {
            id: row.get("id"),
            post_id: row.get("post_id"),
            author_id: row.get("author_id"),
            content: row.get("content"),
            is_edited: row.get("is_edited"),
            created_at: row.get("time_created"),
            updated_at: row.get("time_updated"),
        }))
    }

    async fn get_comment_detail(&self, id: i64) -> AppResult<Option<CommentDetail>> {
        let row = sqlx::query(
            "SELECT m.id, m.post_id, m.content, m.is_edited, m.time_created, m.time_updated, \
             u.id AS author_pk, u.username AS author_username, u.avatar_url AS author_avatar \
             FROM comments m LEFT JOIN users u ON u.id = m.author_id WHERE m.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get comment {}: {}", id, e)))?;
        Ok(row.as_ref().map(comment_detail_from_row))
    }

    async fn list_comments(
        &self,
        post_id: i64,
        page: u32,
        limit: u32,
    ) -> AppResult<Page<CommentDetail>> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count comments: {}", e)))?
            .get("total");

        let offset = (page.saturating_sub(1) as i64) * limit as i64;
        let rows = sqlx::query(
            "SELECT m.id, m.post_id, m.content, m.is_edited, m.time_created, m.time_updated, \
             u.id AS author_pk, u.username AS author_username, u.avatar_url AS author_avatar \
             FROM comments m LEFT JOIN users u ON u.id = m.author_id \
             WHERE m.post_id = ? ORDER BY m.time_created DESC, m.id DESC LIMIT ? OFFSET ?",
        )
        .bind(post_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list comments: {}", e)))?;

        Ok(Page {
            items: rows.iter().map(comment_detail_from_row).collect(),
            total: total as u64,
        })
    }

    async fn update_comment(&self, id: i64, content: &str, now: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE comments SET content = ?, is_edited = 1, time_updated = ? WHERE id = ?",
        )
        .bind(content)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update comment {}: {}", id, e)))?;
        Ok(())
    }

    async fn delete_comment(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete comment {}: {}", id, e)))?;
        Ok(result.rows_affected() > 0)
    }

    async fn assoc_add(
        &self,
        source_id: i64,
        kind: AssocKind,
        target_id: i64,
        now: i64,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO associations (source_id, assoc_kind, target_id, time_created) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(source_id)
        .bind(kind.as_str())
        .bind(target_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_err(e, "Association already exists", "Failed to create association")
        })?;
        Ok(())
    }

    async fn assoc_delete(
        &self,
        source_id: i64,
        kind: AssocKind,
        target_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM associations WHERE source_id = ? AND assoc_kind = ? AND target_id = ?",
        )
        .bind(source_id)
        .bind(kind.as_str())
        .bind(target_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete association: {}", e)))?;
        Ok(result.rows_affected() > 0)
    }

    async fn assoc_exists(
        &self,
        source_id: i64,
        kind: AssocKind,
        target_id: i64,
    ) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM associations WHERE source_id = ? AND assoc_kind = ? AND target_id = ?",
        )
        .bind(source_id)
        .bind(kind.as_str())
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to check association: {}", e)))?;
        Ok(row.is_some())
    }

    async fn assoc_count_for_target(&self, kind: AssocKind, target_id: i64) -> AppResult<u64> {
        let total: i64 = sqlx::query(
            "SELECT COUNT(*) AS total FROM associations WHERE assoc_kind = ? AND target_id = ?",
        )
        .bind(kind.as_str())
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count associations: {}", e)))?
        .get("total");
        Ok(total as u64)
    }

    async fn assocs_by_source(
        &self,
        source_id: i64,
        kind: AssocKind,
    ) -> AppResult<Vec<Association>> {
        let rows = sqlx::query(
            "SELECT source_id, target_id, time_created FROM associations \
             WHERE source_id = ? AND assoc_kind = ? ORDER BY time_created DESC",
        )
        .bind(source_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list associations: {}", e)))?;
        Ok(rows
            .into_iter()
            .map(|row| Association {
                source_id: row.get("source_id"),
                kind,
                target_id: row.get("target_id"),
                created_at: row.get("time_created"),
            })
            .collect())
    }
}
