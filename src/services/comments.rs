use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::id_generator::IdGenerator;
use crate::models::{
    Comment, CommentDetail, CreateCommentRequest, DeleteCommentRequest, UpdateCommentRequest,
};
use crate::store::{current_time_millis, DatabaseInterface, Page};

/// Comment management. Mutations are author-only: the caller's external id
/// is resolved to an internal user and compared to the stored author id.
/// A client-supplied id is never taken as authoritative.
pub struct CommentService {
    db: Arc<dyn DatabaseInterface>,
    ids: Arc<IdGenerator>,
}

impl CommentService {
    pub fn new(db: Arc<dyn DatabaseInterface>, ids: Arc<IdGenerator>) -> Self {
        Self { db, ids }
    }

    /// Paginated, newest-first, author populated. Deliberately no
    /// post-existence gate: comments on a deleted post stay retrievable.
    pub async fn list(&self, post_id: i64, page: u32, limit: u32) -> AppResult<Page<CommentDetail>> {
        self.db.list_comments(post_id, page, limit).await
    }

    pub async fn create(
        &self,
        post_id: i64,
        req: CreateCommentRequest,
    ) -> AppResult<CommentDetail> {
        req.validate()?;

        let post = self.db.get_post(post_id).await?;
        if post.is_none() {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let clerk_id = req
            .clerk_id
            .as_deref()
            .ok_or_else(|| AppError::invalid("clerkId", "clerkId is required"))?;
        let author = self
            .db
            .get_user_by_clerk_id(clerk_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found. Please sign in.".to_string()))?;

        let now = current_time_millis();
        let comment = Comment {
            id: self.ids.next_id(),
            post_id,
            author_id: author.id,
            content: req.content.unwrap_or_default(),
            is_edited: false,
            created_at: now,
            updated_at: now,
        };
        self.db.create_comment(&comment).await?;

        self.db
            .get_comment_detail(comment.id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to load created comment".to_string()))
    }

    /// Full-content replace by the author; marks the comment edited.
    pub async fn update(&self, id: i64, req: UpdateCommentRequest) -> AppResult<CommentDetail> {
        req.validate()?;

        let comment = self
            .db
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let clerk_id = req
            .clerk_id
            .as_deref()
            .ok_or_else(|| AppError::invalid("clerkId", "clerkId is required"))?;
        let user = self
            .db
            .get_user_by_clerk_id(clerk_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if comment.author_id != user.id {
            return Err(AppError::Forbidden(
                "You are not authorized to update this comment".to_string(),
            ));
        }

        let content = req.content.unwrap_or_default();
        self.db
            .update_comment(id, &content, current_time_millis())
            .await?;

        self.db
            .get_comment_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    /// Hard delete by the author.
    pub async fn delete(&self, id: i64, req: DeleteCommentRequest) -> AppResult<()> {
        req.validate()?;

        let comment = self
            .db
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let clerk_id = req
            .clerk_id
            .as_deref()
            .ok_or_else(|| AppError::invalid("clerkId", "clerkId is required"))?;
        let user = self
            .db
            .get_user_by_clerk_id(clerk_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if comment.author_id != user.id {
            return Err(AppError::Forbidden(
                "You are not authorized to delete this comment".to_string(),
            ));
        }

        self.db.delete_comment(id).await?;
        Ok(())
    }
}
