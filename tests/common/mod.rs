#![allow(dead_code)]

use std::sync::Arc;

use mindful_haven::id_generator::IdGenerator;
use mindful_haven::models::{
    Category, CreateCategoryRequest, CreatePostRequest, PostDetail, User,
};
use mindful_haven::services::{CommentService, EngagementService, PostService, UserService};
use mindful_haven::store::{DatabaseInterface, SqliteDatabase};

/// In-memory store plus the service stack, the way the server wires them.
pub struct TestApp {
    pub db: Arc<dyn DatabaseInterface>,
    pub ids: Arc<IdGenerator>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = SqliteDatabase::new_in_memory()
            .await
            .expect("in-memory store");
        Self {
            db: Arc::new(db),
            ids: Arc::new(IdGenerator::new(1)),
        }
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.db.clone(), self.ids.clone())
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.db.clone(), self.ids.clone())
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.db.clone(), self.ids.clone())
    }

    pub fn engagement(&self) -> EngagementService {
        EngagementService::new(self.db.clone())
    }

    pub async fn seed_user(&self, clerk_id: &str, username: &str) -> User {
        self.users()
            .find_or_create(
                clerk_id,
                &format!("{}@example.com", username),
                username,
                "",
                "",
                "",
            )
            .await
            .expect("seed user")
    }

    pub async fn seed_category(&self, name: &str) -> Category {
        self.posts()
            .create_category(CreateCategoryRequest {
                name: Some(name.to_string()),
                description: None,
            })
            .await
            .expect("seed category")
    }

    pub async fn seed_post(
        &self,
        clerk_id: &str,
        category_id: i64,
        title: &str,
        content: &str,
    ) -> PostDetail {
        self.posts()
            .create(CreatePostRequest {
                title: Some(title.to_string()),
                content: Some(content.to_string()),
                clerk_user_id: Some(clerk_id.to_string()),
                category: Some(category_id.to_string()),
                featured_image: None,
                tags: vec![],
                is_published: true,
            })
            .await
            .expect("seed post")
    }
}
