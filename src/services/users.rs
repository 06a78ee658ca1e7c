use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::id_generator::IdGenerator;
use crate::models::{SyncPayload, User};
use crate::store::{current_time_millis, DatabaseInterface};

/// User directory: maps external identity-provider subjects to internal
/// user records, created lazily on first sight.
pub struct UserService {
    db: Arc<dyn DatabaseInterface>,
    ids: Arc<IdGenerator>,
}

impl UserService {
    pub fn new(db: Arc<dyn DatabaseInterface>, ids: Arc<IdGenerator>) -> Self {
        Self { db, ids }
    }

    /// Single round-trip upsert keyed on the external id. An existing record
    /// is returned unchanged: profile fields are not refreshed on repeat
    /// sync. A create that trips the username/email uniqueness constraints
    /// surfaces as a duplicate-key error.
    pub async fn find_or_create(
        &self,
        clerk_user_id: &str,
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        profile_image_url: &str,
    ) -> AppResult<User> {
        if let Some(existing) = self.db.get_user_by_clerk_id(clerk_user_id).await? {
            return Ok(existing);
        }

        let now = current_time_millis();
        let user = User {
            id: self.ids.next_id(),
            clerk_user_id: clerk_user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            profile_image_url: profile_image_url.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.db.create_user(&user).await?;
        tracing::info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Consume the identity provider's webhook payload and upsert the user.
    pub async fn sync(&self, payload: SyncPayload) -> AppResult<User> {
        let data = payload.data.ok_or_else(|| {
            AppError::BadRequest("Missing data object in request body".to_string())
        })?;

        let clerk_user_id = data
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing required field: id".to_string()))?;

        let emails = data.email_addresses.unwrap_or_default();
        let email = emails
            .first()
            .ok_or_else(|| {
                AppError::BadRequest("Missing or invalid email_addresses array".to_string())
            })?
            .email_address
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("Missing email_address in first email object".to_string())
            })?;

        // Fall back to the email local part when the provider has no username.
        let username = data
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        self.find_or_create(
            &clerk_user_id,
            &email,
            &username,
            data.first_name.as_deref().unwrap_or(""),
            data.last_name.as_deref().unwrap_or(""),
            data.image_url.as_deref().unwrap_or(""),
        )
        .await
    }

    pub async fn get(&self, id: i64) -> AppResult<User> {
        self.db
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_by_clerk_id(&self, clerk_user_id: &str) -> AppResult<User> {
        self.db
            .get_user_by_clerk_id(clerk_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.db.list_users().await
    }
}
