use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::response::ApiResponse;
use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::models::AssocKind;
use crate::services::{parse_id, EngagementService, Viewer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBookmarkRequest {
    pub clerk_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkQuery {
    pub clerk_user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkToggleData {
    bookmarked: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkStatusData {
    bookmarked: bool,
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(req): Json<ToggleBookmarkRequest>,
) -> AppResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let clerk_user_id = req
        .clerk_user_id
        .ok_or_else(|| AppError::invalid("clerkUserId", "clerkUserId is required"))?;

    let outcome = EngagementService::new(state.db.clone())
        .toggle(AssocKind::Bookmark, post_id, &clerk_user_id)
        .await?;
    Ok(ApiResponse::ok(BookmarkToggleData {
        bookmarked: outcome.active,
        message: if outcome.active {
            "Post bookmarked"
        } else {
            "Bookmark removed"
        },
    }))
}

pub async fn check_bookmark(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<BookmarkQuery>,
) -> AppResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let viewer = match query.clerk_user_id {
        Some(id) => Viewer::identified(id),
        None => Viewer::anonymous(),
    };

    let status = EngagementService::new(state.db.clone())
        .status(AssocKind::Bookmark, post_id, &viewer)
        .await?;
    Ok(ApiResponse::ok(BookmarkStatusData {
        bookmarked: status.active,
    }))
}

pub async fn get_user_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<BookmarkQuery>,
) -> AppResult<impl IntoResponse> {
    let clerk_user_id = query
        .clerk_user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("clerkUserId is required".to_string()))?;

    let bookmarks = EngagementService::new(state.db.clone())
        .bookmarks_by_user(&clerk_user_id)
        .await?;
    Ok(ApiResponse::ok(bookmarks))
}
