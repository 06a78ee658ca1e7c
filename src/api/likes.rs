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
pub struct ToggleLikeRequest {
    pub clerk_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusQuery {
    pub clerk_user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeToggleData {
    liked: bool,
    like_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeStatusData {
    like_count: u64,
    liked: bool,
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(req): Json<ToggleLikeRequest>,
) -> AppResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let clerk_user_id = req
        .clerk_user_id
        .ok_or_else(|| AppError::invalid("clerkUserId", "clerkUserId is required"))?;

    let outcome = EngagementService::new(state.db.clone())
        .toggle(AssocKind::Like, post_id, &clerk_user_id)
        .await?;
    Ok(ApiResponse::ok(LikeToggleData {
        liked: outcome.active,
        like_count: outcome.count,
    }))
}

pub async fn get_post_likes(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<LikeStatusQuery>,
) -> AppResult<impl IntoResponse> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let viewer = match query.clerk_user_id {
        Some(id) => Viewer::identified(id),
        None => Viewer::anonymous(),
    };

    let status = EngagementService::new(state.db.clone())
        .status(AssocKind::Like, post_id, &viewer)
        .await?;
    Ok(ApiResponse::ok(LikeStatusData {
        like_count: status.count,
        liked: status.active,
    }))
}

pub async fn get_user_likes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_id(&user_id, "User not found")?;
    let likes = EngagementService::new(state.db.clone())
        .likes_by_user(user_id)
        .await?;
    Ok(ApiResponse::ok(likes))
}
