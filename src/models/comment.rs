use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub is_edited: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Read-time shape with the author populated. The author is optional: a
/// comment survives its author's deletion as an orphan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub is_edited: bool,
    pub author: Option<CommentAuthor>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: i64,
    pub username: String,
    pub profile_image_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(
        required(message = "Comment content is required"),
        length(
            min = 1,
            max = 1000,
            message = "Comment must not be empty and cannot exceed 1000 characters"
        )
    )]
    pub content: Option<String>,
    #[validate(required(message = "clerkId is required"))]
    pub clerk_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(
        required(message = "Comment content is required"),
        length(
            min = 1,
            max = 1000,
            message = "Comment must not be empty and cannot exceed 1000 characters"
        )
    )]
    pub content: Option<String>,
    #[validate(required(message = "clerkId is required"))]
    pub clerk_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    #[validate(required(message = "clerkId is required"))]
    pub clerk_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_content() {
        let req = CreateCommentRequest {
            content: Some("x".repeat(1001)),
            clerk_id: Some("user_1".into()),
        };
        let err = crate::error::AppError::from(req.validate().unwrap_err());
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn rejects_empty_content() {
        let req = CreateCommentRequest {
            content: Some(String::new()),
            clerk_id: Some("user_1".into()),
        };
        assert!(req.validate().is_err());
    }
}
