//! End-to-end API tests for the requests feature.
//!
//! Each test assembles the real router over its own in-memory SQLite
//! database and drives it through `axum_test::TestServer`.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use giftdesk::features::requests::{routes, RequestService};
use giftdesk::modules::storage::LocalStore;

async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}

async fn test_server(test_name: &str) -> (TestServer, Arc<LocalStore>, SqlitePool) {
    let pool = test_pool().await;

    let root = std::env::temp_dir().join("giftdesk-api-tests").join(test_name);
    let _ = tokio::fs::remove_dir_all(&root).await;
    let store = Arc::new(LocalStore::new(root).await.expect("upload store"));

    let service = Arc::new(RequestService::new(pool.clone(), Arc::clone(&store)));
    let app = Router::new()
        .merge(routes::routes(service))
        .nest_service("/uploads", ServeDir::new(store.root()));

    let server = TestServer::new(app).expect("test server");
    (server, store, pool)
}

async fn create_request(server: &TestServer, recipient: &str) -> Value {
    let form = MultipartForm::new().add_text("recipient_name", recipient.to_string());
    let response = server.post("/requests/").multipart(form).await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn create_with_only_recipient_defaults_to_not_started() {
    let (server, _store, _pool) = test_server("create-minimal").await;

    let recipient: String = Name().fake();
    let body = create_request(&server, &recipient).await;

    assert_eq!(body["recipient_name"], recipient.as_str());
    assert_eq!(body["status"], "not_started");
    assert!(body["id"].as_i64().is_some());
    assert!(body["created_at"].as_str().is_some());
    assert_eq!(body["comments"], json!([]));
    assert_eq!(body["technician"], Value::Null);
    assert_eq!(body["filename"], Value::Null);
}

#[tokio::test]
async fn create_without_recipient_is_rejected() {
    let (server, _store, _pool) = test_server("create-no-recipient").await;

    let form = MultipartForm::new().add_text("description", "needs a laptop");
    let response = server.post("/requests/").multipart(form).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_missing_request_returns_404() {
    let (server, _store, _pool) = test_server("get-missing").await;

    let response = server.get("/requests/999999").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn update_only_status_leaves_other_fields_unchanged() {
    let (server, _store, _pool) = test_server("partial-update").await;

    let form = MultipartForm::new()
        .add_text("recipient_name", "Grace Hopper")
        .add_text("description", "cracked screen")
        .add_text("technician", "Lin");
    let created: Value = {
        let response = server.post("/requests/").multipart(form).await;
        response.assert_status_ok();
        response.json()
    };
    let id = created["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/requests/{}", id))
        .json(&json!({ "status": "in_progress" }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();

    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["recipient_name"], "Grace Hopper");
    assert_eq!(updated["description"], "cracked screen");
    assert_eq!(updated["technician"], "Lin");
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_missing_request_returns_404() {
    let (server, _store, _pool) = test_server("update-missing").await;

    let response = server
        .put("/requests/999999")
        .json(&json!({ "status": "completed" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn delete_cascades_to_comments_and_second_delete_is_404() {
    let (server, _store, pool) = test_server("delete-cascade").await;

    let created = create_request(&server, "Linus").await;
    let id = created["id"].as_i64().unwrap();

    for content in ["ordered parts", "parts arrived"] {
        let response = server
            .post(&format!("/requests/{}/comments/", id))
            .json(&json!({ "content": content }))
            .await;
        response.assert_status_ok();
    }

    let response = server.delete(&format!("/requests/{}", id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE request_id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    server
        .get(&format!("/requests/{}", id))
        .await
        .assert_status_not_found();
    server
        .delete(&format!("/requests/{}", id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn comment_on_missing_request_returns_404_and_creates_nothing() {
    let (server, _store, pool) = test_server("comment-missing").await;

    let response = server
        .post("/requests/424242/comments/")
        .json(&json!({ "content": "hello?" }))
        .await;
    response.assert_status_not_found();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn comment_round_trip_appears_on_request() {
    let (server, _store, _pool) = test_server("comment-roundtrip").await;

    let created = create_request(&server, "Margaret").await;
    let id = created["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/requests/{}/comments/", id))
        .json(&json!({ "content": "swapped the drive", "author": "Lin" }))
        .await;
    response.assert_status_ok();
    let comment: Value = response.json();

    assert_eq!(comment["request_id"], id);
    assert_eq!(comment["content"], "swapped the drive");
    assert_eq!(comment["author"], "Lin");
    assert!(comment["created_at"].as_str().is_some());

    let fetched: Value = server.get(&format!("/requests/{}", id)).await.json();
    assert_eq!(fetched["comments"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["comments"][0]["content"], "swapped the drive");
}

#[tokio::test]
async fn comment_with_empty_content_is_rejected() {
    let (server, _store, _pool) = test_server("comment-empty").await;

    let created = create_request(&server, "Edsger").await;
    let id = created["id"].as_i64().unwrap();

    let response = server
        .post(&format!("/requests/{}/comments/", id))
        .json(&json!({ "content": "" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn listing_with_limit_one_returns_most_recent() {
    let (server, _store, _pool) = test_server("list-limit").await;

    create_request(&server, "First").await;
    create_request(&server, "Second").await;
    create_request(&server, "Third").await;

    let response = server.get("/requests/").add_query_param("limit", 1).await;
    response.assert_status_ok();
    let listed: Value = response.json();

    let records = listed.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["recipient_name"], "Third");
}

#[tokio::test]
async fn listing_defaults_return_all_newest_first() {
    let (server, _store, _pool) = test_server("list-defaults").await;

    create_request(&server, "Older").await;
    create_request(&server, "Newer").await;

    let response = server.get("/requests/").await;
    response.assert_status_ok();
    let listed: Value = response.json();

    let records = listed.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["recipient_name"], "Newer");
    assert_eq!(records[1]["recipient_name"], "Older");
}

#[tokio::test]
async fn optional_fields_round_trip_unchanged() {
    let (server, _store, _pool) = test_server("round-trip").await;

    let form = MultipartForm::new()
        .add_text("recipient_name", "Ada Lovelace")
        .add_text("contact_info", "legacy: front desk")
        .add_text("requestor_contact", "ada@example.org")
        .add_text("client_contact", "+1 555 0100")
        .add_text("description", "needs a refurbished laptop")
        .add_text("technician", "Lin")
        .add_text("organization_name", "Analytical Engines e.V.")
        .add_text("receipt_id", "RCP-0042")
        .add_text("computer_model", "ThinkPad T480")
        .add_text("computer_type", "laptop")
        .add_text("computer_price", "120.00")
        .add_text("due_date", "2026-09-01T12:00:00Z");
    let response = server.post("/requests/").multipart(form).await;
    response.assert_status_ok();
    let created: Value = response.json();
    let id = created["id"].as_i64().unwrap();

    let fetched: Value = server.get(&format!("/requests/{}", id)).await.json();

    assert_eq!(fetched["recipient_name"], "Ada Lovelace");
    assert_eq!(fetched["contact_info"], "legacy: front desk");
    assert_eq!(fetched["requestor_contact"], "ada@example.org");
    assert_eq!(fetched["client_contact"], "+1 555 0100");
    assert_eq!(fetched["description"], "needs a refurbished laptop");
    assert_eq!(fetched["technician"], "Lin");
    assert_eq!(fetched["organization_name"], "Analytical Engines e.V.");
    assert_eq!(fetched["receipt_id"], "RCP-0042");
    assert_eq!(fetched["computer_model"], "ThinkPad T480");
    assert_eq!(fetched["computer_type"], "laptop");
    assert_eq!(fetched["computer_price"], "120.00");
    assert_eq!(fetched["due_date"], "2026-09-01T12:00:00Z");
}

#[tokio::test]
async fn uploaded_file_is_stored_and_served() {
    let (server, store, _pool) = test_server("upload-roundtrip").await;

    let form = MultipartForm::new()
        .add_text("recipient_name", "Katherine")
        .add_part(
            "file",
            Part::bytes(b"%PDF-1.4 receipt".to_vec())
                .file_name("receipt.pdf")
                .mime_type("application/pdf"),
        );
    let response = server.post("/requests/").multipart(form).await;
    response.assert_status_ok();
    let created: Value = response.json();

    assert_eq!(created["filename"], "receipt.pdf");
    assert!(store.root().join("receipt.pdf").exists());

    let served = server.get("/uploads/receipt.pdf").await;
    served.assert_status_ok();
    assert_eq!(served.as_bytes().as_ref(), b"%PDF-1.4 receipt".as_slice());

    server
        .get("/uploads/never-uploaded.pdf")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn deleting_request_removes_stored_file() {
    let (server, store, _pool) = test_server("delete-removes-file").await;

    let form = MultipartForm::new()
        .add_text("recipient_name", "Dorothy")
        .add_part(
            "file",
            Part::bytes(b"invoice".to_vec())
                .file_name("invoice.pdf")
                .mime_type("application/pdf"),
        );
    let response = server.post("/requests/").multipart(form).await;
    response.assert_status_ok();
    let created: Value = response.json();
    let id = created["id"].as_i64().unwrap();
    assert!(store.root().join("invoice.pdf").exists());

    server
        .delete(&format!("/requests/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(!store.root().join("invoice.pdf").exists());
}
