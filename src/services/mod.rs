// Domain operations. Each service is a thin struct over the shared store
// handle; handlers construct them per request, so no service holds state
// beyond the connection pool.

pub mod comments;
pub mod engagement;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use engagement::EngagementService;
pub use posts::PostService;
pub use users::UserService;

use crate::error::{AppError, AppResult};

/// Explicit identity context for user-scoped reads. Passed into each call;
/// there is no ambient "current user".
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub clerk_user_id: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn identified(clerk_user_id: impl Into<String>) -> Self {
        Self {
            clerk_user_id: Some(clerk_user_id.into()),
        }
    }
}

/// Parse a path identifier, folding shape errors into the same not-found
/// outcome as a missing row.
pub fn parse_id(raw: &str, not_found: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_folds_into_not_found() {
        let err = parse_id("not-a-number", "Post not found").unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Post not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn numeric_id_parses() {
        assert_eq!(parse_id("42", "Post not found").unwrap(), 42);
    }
}
