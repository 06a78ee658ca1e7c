use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::response::{ApiResponse, Pagination};
use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{CreateCommentRequest, DeleteCommentRequest, UpdateCommentRequest};
use crate::services::{parse_id, CommentService};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<CommentListQuery>,
) -> AppResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let result = CommentService::new(state.db.clone(), state.ids.clone())
        .list(post_id, page, limit)
        .await?;
    Ok(ApiResponse::paginated(
        result.items,
        Pagination::new(page, limit, result.total),
    ))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let comment = CommentService::new(state.db.clone(), state.ids.clone())
        .create(post_id, req)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "Comment not found")?;
    let comment = CommentService::new(state.db.clone(), state.ids.clone())
        .update(id, req)
        .await?;
    Ok(ApiResponse::ok(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DeleteCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "Comment not found")?;
    CommentService::new(state.db.clone(), state.ids.clone())
        .delete(id, req)
        .await?;
    Ok(ApiResponse::ok(serde_json::json!({})))
}
