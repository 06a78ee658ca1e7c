// HTTP surface: thin, stateless handlers grouped by resource, assembled
// into one router mounted under /api by main.

pub mod auth;
pub mod bookmarks;
pub mod categories;
pub mod comments;
pub mod likes;
pub mod posts;
pub mod response;
pub mod users;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::store::current_time_millis;

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db.health_check().await {
        Ok(()) => "up",
        Err(_) => "down",
    };
    Json(serde_json::json!({
        "status": if database == "up" { "healthy" } else { "degraded" },
        "service": "Mindful Haven API",
        "database": database,
        "timestamp": current_time_millis()
    }))
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Posts
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        // Comments
        .route(
            "/posts/{post_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        // Likes
        .route("/posts/{post_id}/like", post(likes::toggle_like))
        .route("/posts/{post_id}/likes", get(likes::get_post_likes))
        .route("/users/{user_id}/likes", get(likes::get_user_likes))
        // Bookmarks
        .route(
            "/posts/{post_id}/bookmark",
            post(bookmarks::toggle_bookmark).get(bookmarks::check_bookmark),
        )
        .route("/bookmarks", get(bookmarks::get_user_bookmarks))
        // Users
        .route(
            "/users",
            get(users::list_users).post(users::find_or_create_user),
        )
        .route("/users/{id}", get(users::get_user))
        .route("/users/clerk/{external_id}", get(users::get_user_by_clerk_id))
        // Auth sync
        .route("/auth/sync", post(auth::sync_user))
        .with_state(state)
}
