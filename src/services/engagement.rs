use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::{AppError, AppResult};
use crate::models::{
    AssocKind, BookmarkEntry, BookmarkedPostSummary, EngagementStatus, LikedPostAuthor,
    LikedPostSummary, ToggleOutcome, UserLikeEntry,
};
use crate::services::Viewer;
use crate::store::{current_time_millis, DatabaseInterface};

/// The toggle-association layer shared by likes and bookmarks: one
/// `(user -> post)` edge per kind, flipped by each call, counted by a fresh
/// aggregate over the rows rather than a denormalized counter.
pub struct EngagementService {
    db: Arc<dyn DatabaseInterface>,
}

impl EngagementService {
    pub fn new(db: Arc<dyn DatabaseInterface>) -> Self {
        Self { db }
    }

    /// Flip the association for `(post, user)` and return the new state
    /// with a recomputed count.
    ///
    /// Two concurrent toggles can both observe "absent" and race to insert;
    /// the compound key rejects the loser at the storage layer and that
    /// duplicate-key failure is folded into the same already-toggled
    /// outcome instead of surfacing as a 500.
    pub async fn toggle(
        &self,
        kind: AssocKind,
        post_id: i64,
        clerk_user_id: &str,
    ) -> AppResult<ToggleOutcome> {
        let post = self
            .db
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let user = self
            .db
            .get_user_by_clerk_id(clerk_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found. Please sign in.".to_string()))?;

        let active = if self.db.assoc_exists(user.id, kind, post.id).await? {
            // A concurrent removal makes the delete a no-op; the outcome is
            // the same either way.
            self.db.assoc_delete(user.id, kind, post.id).await?;
            false
        } else {
            match self
                .db
                .assoc_add(user.id, kind, post.id, current_time_millis())
                .await
            {
                Ok(()) => {}
                // Lost the insert race: the row already exists, which is
                // exactly the state this branch was establishing.
                Err(AppError::DuplicateKey(_)) => {}
                Err(e) => return Err(e),
            }
            true
        };

        let count = self.db.assoc_count_for_target(kind, post.id).await?;
        tracing::info!(
            "Toggled {} for post {} by user {}: active={} count={}",
            kind.as_str(),
            post.id,
            user.id,
            active,
            count
        );
        Ok(ToggleOutcome { active, count })
    }

    /// Count plus whether the viewer holds the association. `active` is
    /// false for anonymous viewers and for identities that do not resolve.
    pub async fn status(
        &self,
        kind: AssocKind,
        post_id: i64,
        viewer: &Viewer,
    ) -> AppResult<EngagementStatus> {
        let count = self.db.assoc_count_for_target(kind, post_id).await?;

        let active = match viewer.clerk_user_id.as_deref() {
            Some(clerk_user_id) => match self.db.get_user_by_clerk_id(clerk_user_id).await? {
                Some(user) => self.db.assoc_exists(user.id, kind, post_id).await?,
                None => false,
            },
            None => false,
        };

        Ok(EngagementStatus { active, count })
    }

    /// All likes by a user, newest-first, liked posts populated. A like
    /// whose post was deleted populates as null.
    pub async fn likes_by_user(&self, user_id: i64) -> AppResult<Vec<UserLikeEntry>> {
        let assocs = self.db.assocs_by_source(user_id, AssocKind::Like).await?;
        let posts = try_join_all(
            assocs
                .iter()
                .map(|assoc| self.db.get_post_detail(assoc.target_id)),
        )
        .await?;

        Ok(assocs
            .iter()
            .zip(posts)
            .map(|(assoc, post)| UserLikeEntry {
                created_at: assoc.created_at,
                post: post.map(|p| LikedPostSummary {
                    id: p.id,
                    title: p.title,
                    created_at: p.created_at,
                    author: p.author.map(|a| LikedPostAuthor {
                        username: a.username,
                    }),
                }),
            })
            .collect())
    }

    /// All bookmarks for the resolved user, newest-first, posts populated
    /// with author and category.
    pub async fn bookmarks_by_user(&self, clerk_user_id: &str) -> AppResult<Vec<BookmarkEntry>> {
        let user = self
            .db
            .get_user_by_clerk_id(clerk_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let assocs = self
            .db
            .assocs_by_source(user.id, AssocKind::Bookmark)
            .await?;
        let posts = try_join_all(
            assocs
                .iter()
                .map(|assoc| self.db.get_post_detail(assoc.target_id)),
        )
        .await?;

        Ok(assocs
            .iter()
            .zip(posts)
            .map(|(assoc, post)| BookmarkEntry {
                created_at: assoc.created_at,
                post: post.map(|p| BookmarkedPostSummary {
                    id: p.id,
                    title: p.title,
                    featured_image: p.featured_image,
                    author: p.author,
                    category: p.category,
                    created_at: p.created_at,
                }),
            })
            .collect())
    }
}
