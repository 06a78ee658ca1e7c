use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Post row as persisted. References are bare ids; integrity is enforced at
/// the application layer, so a referenced author or category may no longer
/// exist (read paths populate those as null).
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub category_id: i64,
    pub featured_image: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Read-time shape: the post with its author and category populated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: Option<PostAuthor>,
    pub category: Option<PostCategory>,
    pub featured_image: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCategory {
    pub id: i64,
    pub name: String,
}

/// Bookmark listings populate a trimmed post with author and category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedPostSummary {
    pub id: i64,
    pub title: String,
    pub featured_image: String,
    pub author: Option<PostAuthor>,
    pub category: Option<PostCategory>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(
        required(message = "Title is required"),
        length(
            min = 3,
            max = 200,
            message = "Title must be between 3 and 200 characters long"
        )
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Content is required"),
        length(min = 10, message = "Content must be at least 10 characters long")
    )]
    pub content: Option<String>,
    #[validate(required(message = "clerkUserId is required"))]
    pub clerk_user_id: Option<String>,
    #[validate(required(message = "Category is required"))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_image_url"))]
    pub featured_image: Option<String>,
    #[validate(length(max = 10, message = "Cannot have more than 10 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
}

/// Partial update: same rules minus required-ness. At least one field must
/// be present; the service enforces that with `has_updates`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(
        min = 3,
        max = 200,
        message = "Title must be between 3 and 200 characters long"
    ))]
    pub title: Option<String>,
    #[validate(length(min = 10, message = "Content must be at least 10 characters long"))]
    pub content: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_image_url"))]
    pub featured_image: Option<String>,
    #[validate(length(max = 10, message = "Cannot have more than 10 tags"))]
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

impl UpdatePostRequest {
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.content.is_some()
            || self.category.is_some()
            || self.featured_image.is_some()
            || self.tags.is_some()
            || self.is_published.is_some()
    }
}

/// Empty strings clear the image; anything else must look like a URL.
fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("url");
        err.message = Some("Featured image must be a valid URL".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreatePostRequest {
        CreatePostRequest {
            title: Some("Morning breathing practice".into()),
            content: Some("Ten minutes of box breathing to start the day.".into()),
            clerk_user_id: Some("user_1".into()),
            category: Some("42".into()),
            featured_image: None,
            tags: vec!["breathing".into()],
            is_published: true,
        }
    }

    #[test]
    fn create_accepts_valid_request() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn create_rejects_short_title() {
        let mut req = valid_create();
        req.title = Some("ab".into());
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));
    }

    #[test]
    fn create_rejects_too_many_tags() {
        let mut req = valid_create();
        req.tags = (0..11).map(|i| format!("tag{}", i)).collect();
        let err = crate::error::AppError::from(req.validate().unwrap_err());
        assert!(err.to_string().contains("more than 10 tags"));
    }

    #[test]
    fn create_rejects_bad_image_url() {
        let mut req = valid_create();
        req.featured_image = Some("not a url".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_allows_empty_image_url() {
        let mut req = valid_create();
        req.featured_image = Some(String::new());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_knows_when_it_is_empty() {
        assert!(!UpdatePostRequest::default().has_updates());
        let req = UpdatePostRequest {
            is_published: Some(false),
            ..Default::default()
        };
        assert!(req.has_updates());
    }
}
