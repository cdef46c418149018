//! The credential survives a restart through the file store and is gone
//! after logout or session loss.

use prepexam::adapters::mock::{MockHttpClient, MockResponse};
use prepexam::adapters::FileCredentialsProvider;
use prepexam::startup::{AppContext, ClientConfig};
use prepexam::sync::RequestSpec;
use prepexam::traits::Response;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const BASE: &str = "http://exam.test/api";

fn context(dir: &TempDir, http: &MockHttpClient) -> AppContext {
    AppContext::with_parts(
        ClientConfig::default().with_api_url(BASE),
        Arc::new(http.clone()),
        Arc::new(FileCredentialsProvider::with_path(dir.path().join("credentials.json"))),
    )
}

fn respond(http: &MockHttpClient, path: &str, status: u16, body: serde_json::Value) {
    http.set_response(
        &format!("{}{}", BASE, path),
        MockResponse::Success(Response::json_body(status, &body)),
    );
}

#[tokio::test]
async fn test_login_persists_across_restart() {
    let dir = TempDir::new().unwrap();
    let http = MockHttpClient::new();
    respond(
        &http,
        "/login",
        200,
        json!({"token": "abc", "user": {"id": 5, "name": "Rin", "email": "rin@example.com"}}),
    );

    let first = context(&dir, &http);
    let user = first.auth.login("rin@example.com", "pw").await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Rin"));
    drop(first);

    let second = context(&dir, &http);
    assert!(second.auth.restore().await);
    assert_eq!(second.client.token().as_deref(), Some("abc"));
    assert_eq!(
        second.auth.current_user().and_then(|u| u.email),
        Some("rin@example.com".to_string())
    );
}

#[tokio::test]
async fn test_logout_removes_stored_credential() {
    let dir = TempDir::new().unwrap();
    let http = MockHttpClient::new();
    respond(&http, "/login", 200, json!({"token": "abc", "user": {"id": "u"}}));

    let ctx = context(&dir, &http);
    ctx.auth.login("a@b.c", "pw").await.unwrap();
    ctx.auth.logout().await;
    assert!(!ctx.auth.is_authenticated());

    let restarted = context(&dir, &http);
    assert!(!restarted.auth.restore().await);
}

#[tokio::test]
async fn test_session_loss_removes_stored_credential() {
    let dir = TempDir::new().unwrap();
    let http = MockHttpClient::new();
    respond(&http, "/login", 200, json!({"token": "abc", "user": {"id": "u"}}));
    respond(&http, "/profile", 401, json!({}));
    respond(&http, "/refresh", 401, json!({}));

    let ctx = context(&dir, &http);
    ctx.auth.login("a@b.c", "pw").await.unwrap();
    assert!(ctx.client.request(&RequestSpec::get("/profile")).await.is_err());

    let restarted = context(&dir, &http);
    assert!(!restarted.auth.restore().await);
}

#[tokio::test]
async fn test_renewed_token_is_persisted_with_user() {
    let dir = TempDir::new().unwrap();
    let http = MockHttpClient::new();
    respond(&http, "/login", 200, json!({"token": "t1", "user": {"id": "u", "name": "Ana"}}));
    http.push_response(
        &format!("{}/profile", BASE),
        MockResponse::Success(Response::json_body(401, &json!({}))),
    );
    respond(&http, "/profile", 200, json!({}));
    respond(&http, "/refresh", 200, json!({"token": "t2"}));

    let ctx = context(&dir, &http);
    ctx.auth.login("a@b.c", "pw").await.unwrap();
    ctx.client.request(&RequestSpec::get("/profile")).await.unwrap();

    let restarted = context(&dir, &http);
    assert!(restarted.auth.restore().await);
    assert_eq!(restarted.client.token().as_deref(), Some("t2"));
    assert_eq!(
        restarted.auth.current_user().and_then(|u| u.name),
        Some("Ana".to_string())
    );
}
