// Entity structs and request DTOs. Request validation is declarative
// (`validator` derive); per-field failures aggregate into one
// `AppError::Validation` via the `From` impl in `error.rs`.

pub mod category;
pub mod comment;
pub mod engagement;
pub mod post;
pub mod user;

pub use category::{Category, CreateCategoryRequest};
pub use comment::{
    Comment, CommentAuthor, CommentDetail, CreateCommentRequest, DeleteCommentRequest,
    UpdateCommentRequest,
};
pub use engagement::{
    AssocKind, Association, BookmarkEntry, EngagementStatus, LikedPostAuthor, LikedPostSummary,
    ToggleOutcome, UserLikeEntry,
};
pub use post::{
    BookmarkedPostSummary, CreatePostRequest, Post, PostAuthor, PostCategory, PostDetail,
    UpdatePostRequest,
};
pub use user::{FindOrCreateUserRequest, SyncPayload, SyncUserData, User};
