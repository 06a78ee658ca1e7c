use serde::{Deserialize, Serialize};
use validator::Validate;

/// Internal user record. `clerk_user_id` is the stable subject identifier
/// issued by the identity provider; it never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub clerk_user_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /users`: single round-trip find-or-create keyed on the
/// external identity id.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FindOrCreateUserRequest {
    #[validate(required(message = "clerkId is required"))]
    pub clerk_id: Option<String>,
    #[validate(
        required(message = "Email is required"),
        email(message = "Email must be a valid email address")
    )]
    pub email: Option<String>,
    #[validate(required(message = "Username is required"))]
    pub username: Option<String>,
}

/// Webhook-shaped payload from the identity provider (`POST /auth/sync`).
/// Field names follow the provider's wire format, not ours.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncPayload {
    pub data: Option<SyncUserData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncUserData {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email_addresses: Option<Vec<SyncEmailAddress>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncEmailAddress {
    pub email_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_or_create_requires_all_fields() {
        let req = FindOrCreateUserRequest {
            clerk_id: None,
            email: None,
            username: None,
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.field_errors().len(), 3);
    }

    #[test]
    fn find_or_create_rejects_bad_email() {
        let req = FindOrCreateUserRequest {
            clerk_id: Some("user_1".into()),
            email: Some("not-an-email".into()),
            username: Some("jane".into()),
        };
        assert!(req.validate().is_err());
    }
}
