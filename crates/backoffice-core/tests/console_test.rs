#![allow(clippy::unwrap_used)]
// End-to-end tests: `Console` against a wiremock admin API.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backoffice_core::storage::{IDENTITY_KEY, TOKEN_KEY};
use backoffice_core::{
    AuthError, Console, ConsoleConfig, Credentials, DurableStorage, GuardDecision, ListPhase, MemoryStorage,
    Navigator, RouteGuard,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console, Arc<MemoryStorage>) {
    let server = MockServer::start().await;
    let config = ConsoleConfig::new(Url::parse(&format!("{}/api", server.uri())).unwrap());
    let storage = Arc::new(MemoryStorage::new());
    let console = Console::new(config, storage.clone()).unwrap();
    (server, console, storage)
}

fn creds(password: &str) -> Credentials {
    Credentials::new("ops@example.com", SecretString::from(password.to_string()))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-abc",
            "user": { "id": 1, "username": "ops", "email": "ops@example.com", "role": "admin" }
        })))
        .mount(server)
        .await;
}

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl Navigator for Recorder {
    fn navigate(&self, path: &str, _query: &[(String, String)]) {
        self.0.lock().unwrap().push(path.to_owned());
    }
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn login_persists_session_and_opens_guards() {
    let (server, console, storage) = setup().await;
    mount_login(&server).await;

    assert!(matches!(console.auth_guard().check("/users"), GuardDecision::Redirect(_)));
    assert!(console.login_guard().check("/login").is_proceed());

    let nav = Recorder::default();
    let who = console
        .gateway()
        .login_and_resume(&creds("pw"), Some("/users"), &nav)
        .await
        .unwrap();

    assert_eq!(who.username, "ops");
    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("tok-abc"));
    assert!(storage.get_item(IDENTITY_KEY).unwrap().contains("ops@example.com"));
    assert_eq!(*nav.0.lock().unwrap(), vec!["/users".to_string()]);

    assert!(console.auth_guard().check("/users").is_proceed());
    assert!(!console.login_guard().check("/login").is_proceed());

    console.gateway().logout();
    assert!(storage.is_empty());
    assert!(!console.session().is_authenticated());
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let (server, console, storage) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad password" })))
        .mount(&server)
        .await;

    let err = console.gateway().login(&creds("nope")).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials { .. }), "got: {err:?}");
    assert!(storage.is_empty());
    assert!(!console.session().is_authenticated());
}

#[tokio::test]
async fn session_restores_from_storage() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "tok-saved"),
        (IDENTITY_KEY, r#"{"id":5,"username":"ops","email":"ops@example.com"}"#),
    ]));
    let config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    let console = Console::new(config, storage).unwrap();

    assert!(console.session().is_authenticated());
    assert_eq!(console.session().identity().unwrap().id, 5);
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn users_list_sends_session_token() {
    let (server, console, _) = setup().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "20"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "name": "Root", "email": "root@example.com", "role": "admin", "is_active": true },
                { "id": 2, "name": "Asha", "email": "asha@example.com", "role": "user", "is_active": true }
            ],
            "pagination": { "page": 1, "per_page": 20, "total": 2, "total_pages": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    console.gateway().login(&creds("pw")).await.unwrap();
    let users = console.users();
    users.activate().await.unwrap();

    let state = users.snapshot();
    assert_eq!(state.phase, ListPhase::Loaded);
    assert_eq!(state.total_count, 2);
    assert_eq!(state.items[1].name, "Asha");
}

#[tokio::test]
async fn unauthorized_list_invalidates_session() {
    let (server, console, storage) = setup().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    console.gateway().login(&creds("pw")).await.unwrap();
    let products = console.products();
    let err = products.activate().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(products.phase(), ListPhase::Failed);
    assert!(console.handle_list_error(&err));
    assert!(!console.session().is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn product_delete_hits_item_endpoint() {
    let (server, console, _) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": 7, "name": "Ikat", "stock_quantity": 55 } ],
            "pagination": { "page": 1, "per_page": 20, "total": 1, "total_pages": 1 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    let products = console.products();
    products.activate().await.unwrap();
    products.delete(7).await.unwrap();

    let state = products.snapshot();
    assert!(state.items.is_empty());
    assert_eq!(state.total_count, 0);
}
