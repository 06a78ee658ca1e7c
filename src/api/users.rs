use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use crate::api::response::ApiResponse;
use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::models::FindOrCreateUserRequest;
use crate::services::{parse_id, UserService};

pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserService::new(state.db.clone(), state.ids.clone())
        .list()
        .await?;
    Ok(ApiResponse::ok(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "User not found")?;
    let user = UserService::new(state.db.clone(), state.ids.clone())
        .get(id)
        .await?;
    Ok(ApiResponse::ok(user))
}

pub async fn get_user_by_clerk_id(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::new(state.db.clone(), state.ids.clone())
        .get_by_clerk_id(&external_id)
        .await?;
    Ok(ApiResponse::ok(user))
}

pub async fn find_or_create_user(
    State(state): State<AppState>,
    Json(req): Json<FindOrCreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate()?;
    let clerk_id = req
        .clerk_id
        .as_deref()
        .ok_or_else(|| AppError::invalid("clerkId", "clerkId is required"))?;
    let email = req.email.as_deref().unwrap_or_default();
    let username = req.username.as_deref().unwrap_or_default();

    let user = UserService::new(state.db.clone(), state.ids.clone())
        .find_or_create(clerk_id, email, username, "", "", "")
        .await?;
    Ok(ApiResponse::ok(user))
}
