#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backoffice_api::{ApiClient, Error, Page};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Row {
    id: u64,
    name: String,
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "user": { "id": 1, "username": "ops", "email": "ops@example.com", "role": "admin" }
        })))
        .mount(&server)
        .await;

    let resp = client.login("ops@example.com", &secret("hunter2")).await.unwrap();
    assert_eq!(resp.token, "tok-123");
    assert_eq!(resp.user.username, "ops");
    assert_eq!(resp.user.role.as_deref(), Some("admin"));
    assert!(!client.has_token(), "login must not adopt the token implicitly");
}

#[tokio::test]
async fn test_login_rejected_with_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Invalid email or password" })),
        )
        .mount(&server)
        .await;

    let result = client.login("ops@example.com", &secret("wrong")).await;
    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid email or password"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unauthorized_keeps_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid email or password" })),
        )
        .mount(&server)
        .await;

    let err = client.login("ops@example.com", &secret("wrong")).await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got: {err:?}");
    assert_eq!(err.server_message(), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_login_unauthorized_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.login("ops@example.com", &secret("wrong")).await.unwrap_err();
    assert_eq!(
        err.server_message(),
        Some("Login failed. Please check your credentials.")
    );
}

#[tokio::test]
async fn test_login_server_error_is_not_auth() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.login("ops@example.com", &secret("pw")).await;
    assert!(
        matches!(result, Err(Error::Api { status: 500, .. })),
        "expected Api error, got: {result:?}"
    );
}

// ── List tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_page_sends_bearer_and_paging() {
    let (server, client) = setup().await;
    client.set_token(secret("tok-123"));

    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "20"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": 21, "name": "Asha" }, { "id": 22, "name": "Bela" } ],
            "pagination": { "page": 2, "per_page": 20, "total": 22, "total_pages": 2 }
        })))
        .mount(&server)
        .await;

    let page: Page<Row> = client.get_page("admin/users", 2, 20).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0], Row { id: 21, name: "Asha".into() });
    assert_eq!(page.pagination.total, 22);
    assert_eq!(page.pagination.total_pages, 2);
}

#[tokio::test]
async fn test_get_page_unauthorized_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result: Result<Page<Row>, _> = client.get_page("admin/products", 1, 20).await;
    assert!(matches!(result, Err(Error::SessionExpired { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_get_page_bad_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result: Result<Page<Row>, _> = client.get_page("admin/products", 1, 20).await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Delete tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_success() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("admin/products/9").await.unwrap();
}

#[tokio::test]
async fn test_delete_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Product not found" })))
        .mount(&server)
        .await;

    let err = client.delete("admin/products/404").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Product not found"));
}
