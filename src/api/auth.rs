use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use crate::api::response::ApiResponse;
use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::SyncPayload;
use crate::services::UserService;

/// Webhook-shaped sync from the identity provider: validates the payload
/// and upserts the user keyed on the external id.
pub async fn sync_user(
    State(state): State<AppState>,
    Json(payload): Json<SyncPayload>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::new(state.db.clone(), state.ids.clone())
        .sync(payload)
        .await?;
    info!("Synced user {} ({})", user.username, user.clerk_user_id);
    Ok(ApiResponse::ok(user))
}
