mod common;

use common::TestApp;
use pretty_assertions::assert_eq;
use recipebook_client::error::ApiError;
use recipebook_client::session::{SessionStatus, TOKEN_KEY, USER_ID_KEY};
use recipebook_client::storage::KeyValueStorage;
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn test_startup_with_empty_storage_settles_anonymous() {
    common::init_test_logging();
    let app = TestApp::new();

    let before = app.store.snapshot();
    assert!(before.loading, "should be loading before the startup check");
    assert_eq!(before.status(), SessionStatus::Unknown);

    app.store.bootstrap();

    let after = app.store.snapshot();
    assert!(!after.loading, "loading should clear once the check completes");
    assert_eq!(after.status(), SessionStatus::Anonymous);
    assert!(!after.is_authenticated());
}

#[tokio::test]
async fn test_startup_restores_stored_credential() {
    common::init_test_logging();
    let app = TestApp::new();
    app.seed_credentials("abc", "u1");

    app.store.bootstrap();

    let snapshot = app.store.snapshot();
    assert_eq!(snapshot.status(), SessionStatus::Authenticated);
    assert_eq!(snapshot.token.as_deref(), Some("abc"));
    assert_eq!(snapshot.user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_startup_check_is_idempotent() {
    common::init_test_logging();
    let app = TestApp::new();
    app.seed_credentials("abc", "u1");

    app.store.bootstrap();
    let first = app.store.snapshot();
    app.store.bootstrap();
    let second = app.store.snapshot();

    assert_eq!(first, second, "rerunning the startup check must not change state");
}

#[tokio::test]
async fn test_startup_clears_incomplete_credential() {
    common::init_test_logging();
    let app = TestApp::new();
    // Token without an identity is treated as invalid, not half-restored.
    app.storage.set(TOKEN_KEY, "abc");

    app.store.bootstrap();

    assert_eq!(app.store.snapshot().status(), SessionStatus::Anonymous);
    assert_eq!(app.storage.get(TOKEN_KEY), None);
    assert_eq!(app.storage.get(USER_ID_KEY), None);
}

#[tokio::test]
async fn test_login_success_persists_credential() {
    common::init_test_logging();
    let app = TestApp::at("/login");
    app.store.bootstrap();
    app.transport.respond(
        Method::POST,
        "/auth/login",
        200,
        json!({"token": "t1", "userId": "u1"}),
    );

    let payload = app
        .store
        .login("a@b.com", "secret")
        .await
        .expect("login should succeed");

    assert_eq!(payload.user_id.as_deref(), Some("u1"));

    let snapshot = app.store.snapshot();
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user_id.as_deref(), Some("u1"));
    assert_eq!(app.storage.get(TOKEN_KEY).as_deref(), Some("t1"));
    assert_eq!(app.storage.get(USER_ID_KEY).as_deref(), Some("u1"));

    // The login call itself goes out unauthenticated.
    let requests = app.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer, None);
    let body = requests[0].body.as_ref().expect("login sends a body");
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["password"], "secret");
}

#[tokio::test]
async fn test_login_with_missing_fields_never_hits_network() {
    common::init_test_logging();
    let app = TestApp::at("/login");
    app.store.bootstrap();

    let result = app.store.login("", "secret").await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert!(app.transport.requests().is_empty(), "no request should be sent");
    assert_eq!(app.store.snapshot().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_login_rejected_leaves_state_unchanged() {
    common::init_test_logging();
    let app = TestApp::at("/login");
    app.store.bootstrap();
    app.transport.respond(
        Method::POST,
        "/auth/login",
        401,
        json!({"error": "Invalid email or password"}),
    );

    let result = app.store.login("a@b.com", "wrong").await;

    match result {
        Err(ApiError::Auth(message)) => assert_eq!(message, "Invalid email or password"),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert_eq!(app.store.snapshot().status(), SessionStatus::Anonymous);
    assert_eq!(app.storage.get(TOKEN_KEY), None);
    // Already at the login entry point, so the guard suppresses any redirect.
    assert!(app.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_login_response_without_token_is_a_failure() {
    common::init_test_logging();
    let app = TestApp::at("/login");
    app.store.bootstrap();
    app.transport.respond(
        Method::POST,
        "/auth/login",
        200,
        json!({"error": "account locked"}),
    );

    let result = app.store.login("a@b.com", "secret").await;

    match result {
        Err(ApiError::Auth(message)) => assert_eq!(message, "account locked"),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert!(!app.store.snapshot().is_authenticated());
    assert_eq!(app.storage.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn test_register_success_establishes_session() {
    common::init_test_logging();
    let app = TestApp::at("/register");
    app.store.bootstrap();
    app.transport.respond(
        Method::POST,
        "/auth/register",
        201,
        json!({"token": "t2", "userId": "u2"}),
    );

    let payload = app
        .store
        .register("Alice", "alice@example.com", "secret")
        .await
        .expect("register should succeed");

    assert_eq!(payload.user_id.as_deref(), Some("u2"));
    assert!(app.store.snapshot().is_authenticated());
    assert_eq!(app.storage.get(TOKEN_KEY).as_deref(), Some("t2"));

    let requests = app.transport.requests();
    let body = requests[0].body.as_ref().expect("register sends a body");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn test_register_rejection_surfaces_server_message() {
    common::init_test_logging();
    let app = TestApp::at("/register");
    app.store.bootstrap();
    app.transport.respond(
        Method::POST,
        "/auth/register",
        400,
        json!({"error": "Email already registered"}),
    );

    let before = app.store.snapshot();
    let result = app
        .store
        .register("Alice", "alice@example.com", "secret")
        .await;

    match result {
        Err(ApiError::Auth(message)) => assert_eq!(message, "Email already registered"),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert_eq!(app.store.snapshot(), before, "failed register must not change state");
}

#[tokio::test]
async fn test_register_with_missing_name_never_hits_network() {
    common::init_test_logging();
    let app = TestApp::at("/register");
    app.store.bootstrap();

    let result = app.store.register("  ", "alice@example.com", "secret").await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert!(app.transport.requests().is_empty());
}

#[tokio::test]
async fn test_login_then_logout_ends_anonymous_with_empty_storage() {
    common::init_test_logging();
    let app = TestApp::at("/login");
    app.store.bootstrap();
    app.transport.respond(
        Method::POST,
        "/auth/login",
        200,
        json!({"token": "t1", "userId": "u1"}),
    );

    app.store
        .login("a@b.com", "secret")
        .await
        .expect("login should succeed");
    app.store.logout();

    let snapshot = app.store.snapshot();
    assert_eq!(snapshot.status(), SessionStatus::Anonymous);
    assert_eq!(snapshot.user_id, None);
    assert_eq!(app.storage.get(TOKEN_KEY), None);
    assert_eq!(app.storage.get(USER_ID_KEY), None);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    common::init_test_logging();
    let app = TestApp::new();
    app.store.bootstrap();

    // Already anonymous; must be a safe no-op both times.
    app.store.logout();
    app.store.logout();

    assert_eq!(app.store.snapshot().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_subscribers_are_notified_on_every_transition() {
    common::init_test_logging();
    let app = TestApp::at("/login");
    app.transport.respond(
        Method::POST,
        "/auth/login",
        200,
        json!({"token": "t1", "userId": "u1"}),
    );

    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = seen.clone();
    app.store.subscribe(move |snapshot| {
        sink.lock().push(snapshot.clone());
    });

    app.store.bootstrap();
    app.store
        .login("a@b.com", "secret")
        .await
        .expect("login should succeed");
    app.store.logout();

    let seen = seen.lock();
    assert_eq!(seen.len(), 3, "bootstrap, login and logout each notify once");
    assert!(!seen[0].loading && !seen[0].is_authenticated());
    assert!(seen[1].is_authenticated());
    assert_eq!(seen[1].user_id.as_deref(), Some("u1"));
    assert!(!seen[2].is_authenticated());
    assert_eq!(seen[2].user_id, None);
}
