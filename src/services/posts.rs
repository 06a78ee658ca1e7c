use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::id_generator::IdGenerator;
use crate::models::{Category, CreateCategoryRequest, CreatePostRequest, Post, PostDetail, UpdatePostRequest};
use crate::store::{current_time_millis, DatabaseInterface, Page, PostFilter};

/// Post store plus the flat category catalog it references.
pub struct PostService {
    db: Arc<dyn DatabaseInterface>,
    ids: Arc<IdGenerator>,
}

impl PostService {
    pub fn new(db: Arc<dyn DatabaseInterface>, ids: Arc<IdGenerator>) -> Self {
        Self { db, ids }
    }

    /// Newest-first listing with author and category populated. Search and
    /// category filters apply only when given.
    pub async fn list(&self, filter: &PostFilter) -> AppResult<Page<PostDetail>> {
        self.db.list_posts(filter).await
    }

    pub async fn get(&self, id: i64) -> AppResult<PostDetail> {
        self.db
            .get_post_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Create a post. The author is resolved from the externally supplied
    /// identity id; a client-supplied internal id is never trusted. Nothing
    /// is written when validation or author resolution fails.
    pub async fn create(&self, req: CreatePostRequest) -> AppResult<PostDetail> {
        req.validate()?;

        let clerk_user_id = req
            .clerk_user_id
            .as_deref()
            .ok_or_else(|| AppError::invalid("clerkUserId", "clerkUserId is required"))?;
        let author = self
            .db
            .get_user_by_clerk_id(clerk_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found. Please sign in.".to_string()))?;

        let category_id = parse_category(req.category.as_deref())?;

        let now = current_time_millis();
        let post = Post {
            id: self.ids.next_id(),
            title: req.title.unwrap_or_default(),
            content: req.content.unwrap_or_default(),
            author_id: author.id,
            category_id,
            featured_image: req.featured_image.unwrap_or_default(),
            tags: req.tags,
            is_published: req.is_published,
            created_at: now,
            updated_at: now,
        };
        self.db.create_post(&post).await?;
        tracing::info!("Created post {} by user {}", post.id, author.id);

        self.db
            .get_post_detail(post.id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to load created post".to_string()))
    }

    /// Partial update; at least one field must be supplied.
    pub async fn update(&self, id: i64, req: UpdatePostRequest) -> AppResult<PostDetail> {
        req.validate()?;
        if !req.has_updates() {
            return Err(AppError::invalid(
                "update",
                "At least one field must be provided for update",
            ));
        }

        let mut post = self
            .db
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if let Some(title) = req.title {
            post.title = title;
        }
        if let Some(content) = req.content {
            post.content = content;
        }
        if let Some(category) = req.category {
            post.category_id = parse_category(Some(&category))?;
        }
        if let Some(featured_image) = req.featured_image {
            post.featured_image = featured_image;
        }
        if let Some(tags) = req.tags {
            post.tags = tags;
        }
        if let Some(is_published) = req.is_published {
            post.is_published = is_published;
        }
        post.updated_at = current_time_millis();

        self.db.update_post(&post).await?;
        self.db
            .get_post_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Delete by primary id. Comments, likes and bookmarks referencing the
    /// post are left in place as orphans.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let deleted = self.db.delete_post(id).await?;
        if !deleted {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        tracing::info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.db.list_categories().await
    }

    pub async fn create_category(&self, req: CreateCategoryRequest) -> AppResult<Category> {
        req.validate()?;
        let now = current_time_millis();
        let category = Category {
            id: self.ids.next_id(),
            name: req.name.unwrap_or_default(),
            description: req.description.filter(|d| !d.is_empty()),
            created_at: now,
            updated_at: now,
        };
        self.db.create_category(&category).await?;
        Ok(category)
    }
}

fn parse_category(raw: Option<&str>) -> AppResult<i64> {
    raw.and_then(|c| c.parse::<i64>().ok())
        .ok_or_else(|| AppError::invalid("category", "Category must be a valid category id"))
}
