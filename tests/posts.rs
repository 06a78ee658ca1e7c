// Post query and retrieval: search, filters, pagination, author
// resolution, partial updates and the deliberate orphan gap on delete.

mod common;

use common::TestApp;
use mindful_haven::error::AppError;
use mindful_haven::models::{CreateCommentRequest, CreatePostRequest, UpdatePostRequest};
use mindful_haven::store::PostFilter;

fn create_request(clerk: &str, category: i64, title: &str, content: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        clerk_user_id: Some(clerk.to_string()),
        category: Some(category.to_string()),
        featured_image: None,
        tags: vec![],
        is_published: true,
    }
}

#[tokio::test]
async fn create_resolves_author_and_joins_display_fields() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;
    let category = app.seed_category("Mindfulness").await;

    let post = app
        .posts()
        .create(create_request(
            "user_a",
            category.id,
            "Morning routine",
            "Ten quiet minutes before the phone comes on.",
        ))
        .await
        .unwrap();

    assert_eq!(post.author.as_ref().unwrap().username, "alice");
    assert_eq!(post.category.as_ref().unwrap().name, "Mindfulness");
}

#[tokio::test]
async fn create_with_unresolvable_user_writes_nothing() {
    let app = TestApp::new().await;
    let category = app.seed_category("Mindfulness").await;

    let err = app
        .posts()
        .create(create_request(
            "user_ghost",
            category.id,
            "Never stored",
            "This post should not be persisted at all.",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg.starts_with("User not found")));

    let page = app.posts().list(&PostFilter {
        search: None,
        category_id: None,
        page: 1,
        limit: 10,
    })
    .await
    .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn create_rejects_invalid_payload_before_persistence() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;
    let category = app.seed_category("Mindfulness").await;

    let mut req = create_request("user_a", category.id, "ab", "Too short a title on this one.");
    req.tags = (0..11).map(|i| format!("tag{}", i)).collect();
    let err = app.posts().create(req).await.unwrap_err();
    match err {
        AppError::Validation(fields) => {
            let text: Vec<&str> = fields.iter().map(|f| f.message.as_str()).collect();
            assert!(text.iter().any(|m| m.contains("Title")));
            assert!(text.iter().any(|m| m.contains("more than 10 tags")));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let page = app.posts().list(&PostFilter {
        search: None,
        category_id: None,
        page: 1,
        limit: 10,
    })
    .await
    .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn search_matches_title_and_content_newest_first() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;
    let category = app.seed_category("Calm").await;

    app.seed_post("user_a", category.id, "Breathing basics", "A primer on slow exhalation.")
        .await;
    app.seed_post("user_a", category.id, "Desk stretches", "Nothing about the usual topic here.")
        .await;
    let newest = app
        .seed_post("user_a", category.id, "Advanced practice", "More box breathing drills to try.")
        .await;

    let page = app.posts().list(&PostFilter {
        search: Some("breathing".to_string()),
        category_id: None,
        page: 1,
        limit: 10,
    })
    .await
    .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
    // Newest first: the content match from the latest post leads.
    assert_eq!(page.items[0].id, newest.id);
    assert!(page
        .items
        .iter()
        .all(|p| p.title.to_lowercase().contains("breathing")
            || p.content.to_lowercase().contains("breathing")));
}

#[tokio::test]
async fn list_filters_by_category_and_paginates() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;
    let calm = app.seed_category("Calm").await;
    let sleep = app.seed_category("Sleep").await;

    for i in 0..3 {
        app.seed_post(
            "user_a",
            calm.id,
            &format!("Calm post {}", i),
            "Some calm content that is long enough.",
        )
        .await;
    }
    app.seed_post("user_a", sleep.id, "Sleep post", "Some sleep content that is long enough.")
        .await;

    let page = app.posts().list(&PostFilter {
        search: None,
        category_id: Some(calm.id),
        page: 1,
        limit: 2,
    })
    .await
    .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = app.posts().list(&PostFilter {
        search: None,
        category_id: Some(calm.id),
        page: 2,
        limit: 2,
    })
    .await
    .unwrap();
    assert_eq!(rest.items.len(), 1);
}

#[tokio::test]
async fn get_missing_post_is_not_found() {
    let app = TestApp::new().await;
    let err = app.posts().get(123_456).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Post not found"));
}

#[tokio::test]
async fn update_is_partial_and_requires_a_field() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;
    let category = app.seed_category("Calm").await;
    let post = app
        .seed_post("user_a", category.id, "Original title", "Original content, long enough to pass.")
        .await;

    let err = app
        .posts()
        .update(post.id, UpdatePostRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = app
        .posts()
        .update(
            post.id,
            UpdatePostRequest {
                title: Some("Renamed title".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed title");
    assert_eq!(updated.content, post.content);
    assert!(updated.is_published);
}

#[tokio::test]
async fn delete_leaves_comments_retrievable_as_orphans() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;
    let category = app.seed_category("Calm").await;
    let post = app
        .seed_post("user_a", category.id, "Doomed post", "This post is going to be deleted soon.")
        .await;

    app.comments()
        .create(
            post.id,
            CreateCommentRequest {
                content: Some("Great post, saving this.".to_string()),
                clerk_id: Some("user_a".to_string()),
            },
        )
        .await
        .unwrap();

    app.posts().delete(post.id).await.unwrap();
    let err = app.posts().get(post.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The orphan gap, documented: comments survive and stay listable.
    let comments = app.comments().list(post.id, 1, 20).await.unwrap();
    assert_eq!(comments.total, 1);
    assert_eq!(comments.items[0].content, "Great post, saving this.");
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
    let app = TestApp::new().await;
    let err = app.posts().delete(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_category_name_is_rejected_with_conflict() {
    let app = TestApp::new().await;
    app.seed_category("Calm").await;
    let err = app
        .posts()
        .create_category(mindful_haven::models::CreateCategoryRequest {
            name: Some("Calm".to_string()),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(ref msg) if msg.contains("Category")));
}
