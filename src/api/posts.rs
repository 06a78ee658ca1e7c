use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::response::{ApiResponse, Pagination};
use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePostRequest, UpdatePostRequest};
use crate::services::{parse_id, PostService};
use crate::store::PostFilter;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let category_id = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            AppError::invalid("category", "Category must be a valid category id")
        })?),
        None => None,
    };

    let filter = PostFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category_id,
        page,
        limit,
    };

    let result = PostService::new(state.db.clone(), state.ids.clone())
        .list(&filter)
        .await?;
    Ok(ApiResponse::paginated(
        result.items,
        Pagination::new(page, limit, result.total),
    ))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "Post not found")?;
    let post = PostService::new(state.db.clone(), state.ids.clone())
        .get(id)
        .await?;
    Ok(ApiResponse::ok(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let post = PostService::new(state.db.clone(), state.ids.clone())
        .create(req)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "Post not found")?;
    let post = PostService::new(state.db.clone(), state.ids.clone())
        .update(id, req)
        .await?;
    Ok(ApiResponse::ok(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "Post not found")?;
    PostService::new(state.db.clone(), state.ids.clone())
        .delete(id)
        .await?;
    Ok(ApiResponse::ok(serde_json::json!({})))
}
