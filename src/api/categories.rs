use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::response::ApiResponse;
use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::CreateCategoryRequest;
use crate::services::PostService;

pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = PostService::new(state.db.clone(), state.ids.clone())
        .list_categories()
        .await?;
    Ok(ApiResponse::ok(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let category = PostService::new(state.db.clone(), state.ids.clone())
        .create_category(req)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(category)))
}
