// User directory: lazy creation keyed on the external identity id,
// duplicate-key surfacing and webhook sync payload handling.

mod common;

use common::TestApp;
use mindful_haven::error::AppError;
use mindful_haven::models::{SyncPayload, SyncUserData};
use mindful_haven::models::user::SyncEmailAddress;
use mindful_haven::store::SqliteDatabase;

#[tokio::test]
async fn find_or_create_is_idempotent_and_never_refreshes() {
    let app = TestApp::new().await;

    let first = app
        .users()
        .find_or_create("user_a", "alice@example.com", "alice", "Alice", "A", "")
        .await
        .unwrap();

    // Repeat sync with different profile fields returns the stored record
    // unchanged (the documented no-refresh gap).
    let second = app
        .users()
        .find_or_create("user_a", "new@example.com", "renamed", "New", "Name", "x")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.email, "alice@example.com");
    assert_eq!(second.username, "alice");
    assert_eq!(app.users().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_username_or_email_surfaces_as_conflict() {
    let app = TestApp::new().await;
    app.seed_user("user_a", "alice").await;

    // Different external id, same username/email.
    let err = app
        .users()
        .find_or_create("user_b", "alice@example.com", "alice", "", "", "")
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::DuplicateKey(ref msg) if msg.contains("email or username"))
    );
}

#[tokio::test]
async fn lookup_by_internal_and_external_id() {
    let app = TestApp::new().await;
    let user = app.seed_user("user_a", "alice").await;

    assert_eq!(app.users().get(user.id).await.unwrap().id, user.id);
    assert_eq!(
        app.users().get_by_clerk_id("user_a").await.unwrap().id,
        user.id
    );

    let err = app.users().get(999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = app.users().get_by_clerk_id("user_ghost").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

fn sync_payload(id: Option<&str>, username: Option<&str>, email: Option<&str>) -> SyncPayload {
    SyncPayload {
        data: Some(SyncUserData {
            id: id.map(str::to_string),
            username: username.map(str::to_string),
            email_addresses: email.map(|e| {
                vec![SyncEmailAddress {
                    email_address: Some(e.to_string()),
                }]
            }),
            first_name: Some("Alice".to_string()),
            last_name: None,
            image_url: None,
        }),
    }
}

#[tokio::test]
async fn sync_creates_user_with_username_fallback() {
    let app = TestApp::new().await;

    let user = app
        .users()
        .sync(sync_payload(Some("user_a"), None, Some("alice@example.com")))
        .await
        .unwrap();
    assert_eq!(user.clerk_user_id, "user_a");
    // No provider username: falls back to the email local part.
    assert_eq!(user.username, "alice");
    assert_eq!(user.first_name, "Alice");
}

#[tokio::test]
async fn sync_rejects_malformed_payloads() {
    let app = TestApp::new().await;

    let err = app
        .users()
        .sync(SyncPayload { data: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("data")));

    let err = app
        .users()
        .sync(sync_payload(None, Some("alice"), Some("alice@example.com")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("id")));

    let err = app
        .users()
        .sync(sync_payload(Some("user_a"), Some("alice"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("email_addresses")));
}

#[tokio::test]
async fn sync_is_an_upsert_keyed_on_external_id() {
    let app = TestApp::new().await;

    let first = app
        .users()
        .sync(sync_payload(Some("user_a"), Some("alice"), Some("alice@example.com")))
        .await
        .unwrap();
    let second = app
        .users()
        .sync(sync_payload(Some("user_a"), Some("renamed"), Some("other@example.com")))
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.username, "alice");
}

#[tokio::test]
async fn file_backed_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("haven.db");
    let url = format!("sqlite:{}", path.display());

    {
        let db = SqliteDatabase::connect(&url).await.unwrap();
        db.initialize().await.unwrap();
        let app = test_app_with(db);
        app.seed_user("user_a", "alice").await;
    }

    let db = SqliteDatabase::connect(&url).await.unwrap();
    db.initialize().await.unwrap();
    let app = test_app_with(db);
    let user = app.users().get_by_clerk_id("user_a").await.unwrap();
    assert_eq!(user.username, "alice");
}

fn test_app_with(db: SqliteDatabase) -> common::TestApp {
    common::TestApp {
        db: std::sync::Arc::new(db),
        ids: std::sync::Arc::new(mindful_haven::id_generator::IdGenerator::new(2)),
    }
}
