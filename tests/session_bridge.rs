#![cfg(not(target_arch = "wasm32"))]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Page, StatusLine};
use dashboard_bridge::app::{
    initialize_app, initialize_app_with_persistence, DashboardApp, DashboardConfig,
    IdentityOptions,
};
use dashboard_bridge::auth::{AuthPersistence, InMemoryPersistence, PersistedAuthState};
use dashboard_bridge::session::{
    BridgeError, BridgeOutcome, BridgeState, SessionBridge, StatusDisplay,
};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;

fn config_for(server: &MockServer) -> DashboardConfig {
    let identity = IdentityOptions {
        api_key: Some("test-key".into()),
        identity_toolkit_endpoint: Some(server.url("/identitytoolkit/v1")),
        secure_token_endpoint: Some(server.url("/securetoken/v1/token")),
        ..IdentityOptions::default()
    };
    DashboardConfig::new(server.base_url()).with_identity(identity)
}

fn app_for(server: &MockServer) -> DashboardApp {
    initialize_app(config_for(server)).unwrap()
}

fn bridge_on(app: &DashboardApp, page: &Arc<Page>, status: &Arc<StatusLine>) -> Arc<SessionBridge> {
    let display: Arc<dyn StatusDisplay> = status.clone();
    app.session_bridge(page.clone(), Some(display))
        .unwrap()
        .expect("identity is enabled")
}

fn mock_password_sign_in(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/identitytoolkit/v1/accounts:signInWithPassword")
            .query_param("key", "test-key")
            .json_body(json!({
                "email": "ada@example.com",
                "password": "hunter2",
                "returnSecureToken": true
            }));
        then.status(200).json_body(json!({
            "idToken": "provider-id-token",
            "refreshToken": "provider-refresh-token",
            "localId": "uid-ada",
            "email": "ada@example.com",
            "expiresIn": "3600"
        }));
    })
}

#[tokio::test(flavor = "current_thread")]
async fn sign_in_establishes_session_and_lands_once() {
    let server = MockServer::start();
    let provider = mock_password_sign_in(&server);
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/login")
            .header("authorization", "Bearer provider-id-token")
            .json_body(json!({ "idToken": "provider-id-token" }));
        then.status(200)
            .delay(Duration::from_millis(30))
            .json_body(json!({ "message": "ok" }));
    });
    let app = app_for(&server);
    let page = Page::at("/login");
    let status = Arc::new(StatusLine::default());
    let bridge = bridge_on(&app, &page, &status);

    let outcome = bridge.sign_in("ada@example.com", "hunter2").await.unwrap();
    // Let the passive reconciliation triggered by the sign-in notification run.
    tokio::time::sleep(Duration::from_millis(150)).await;

    provider.assert();
    login.assert_hits(1);
    assert!(matches!(outcome, BridgeOutcome::Established { navigated: true }));
    assert_eq!(page.visits(), vec!["/".to_string()]);
    assert_eq!(bridge.state(), BridgeState::Established);
    let last = status.last().unwrap();
    assert_eq!((last.text.as_str(), last.color), ("ok", "green"));
}

#[tokio::test(flavor = "current_thread")]
async fn rejected_session_shows_server_message() {
    let server = MockServer::start();
    mock_password_sign_in(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(401).json_body(json!({ "message": "invalid token" }));
    });
    let app = app_for(&server);
    let page = Page::at("/login");
    let status = Arc::new(StatusLine::default());
    let bridge = bridge_on(&app, &page, &status);

    let error = bridge.sign_in("ada@example.com", "hunter2").await.unwrap_err();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(matches!(error, BridgeError::Rejected { status: 401, .. }));
    let last = status.last().unwrap();
    assert_eq!(last.text, "Login failed: invalid token");
    assert_eq!(last.color, "red");
    assert!(page.visits().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn wrong_password_never_reaches_the_server() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/identitytoolkit/v1/accounts:signInWithPassword");
        then.status(400).json_body(json!({
            "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
        }));
    });
    let login = server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(200);
    });
    let app = app_for(&server);
    let page = Page::at("/login");
    let status = Arc::new(StatusLine::default());
    let bridge = bridge_on(&app, &page, &status);

    let error = bridge.sign_in("ada@example.com", "nope").await.unwrap_err();

    assert!(matches!(error, BridgeError::Provider(_)));
    login.assert_hits(0);
    assert_eq!(
        status.last().unwrap().text,
        "Login failed: Firebase: The supplied auth credential is incorrect, malformed or has expired. (auth/invalid-credential)."
    );
    assert_eq!(bridge.state(), BridgeState::Anonymous);
}

#[tokio::test(flavor = "current_thread")]
async fn sign_out_always_goes_to_logout() {
    let server = MockServer::start();
    mock_password_sign_in(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(200).json_body(json!({ "message": "ok" }));
    });
    let app = app_for(&server);
    let page = Page::at("/dashboard");
    let status = Arc::new(StatusLine::default());
    let bridge = bridge_on(&app, &page, &status);

    bridge.sign_in("ada@example.com", "hunter2").await.unwrap();
    bridge.sign_out().await;

    assert_eq!(page.visits(), vec!["/logout".to_string()]);
    assert!(app.auth().unwrap().current_user().is_none());
    assert_eq!(bridge.state(), BridgeState::Anonymous);
}

#[tokio::test(flavor = "current_thread")]
async fn revoked_stored_credential_is_reported_on_login_page() {
    let server = MockServer::start();
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/securetoken/v1/token")
            .query_param("key", "test-key");
        then.status(400).json_body(json!({
            "error": { "code": 400, "message": "INVALID_REFRESH_TOKEN" }
        }));
    });
    let login = server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(200).json_body(json!({ "message": "ok" }));
    });
    let stored: Arc<dyn AuthPersistence> = Arc::new(InMemoryPersistence::with_state(
        PersistedAuthState {
            user_id: "uid-ada".into(),
            email: Some("ada@example.com".into()),
            refresh_token: Some("revoked-refresh-token".into()),
            id_token: Some("expired-id-token".into()),
            expires_at: Some(1),
        },
    ));
    let app = initialize_app_with_persistence(config_for(&server), Some(stored)).unwrap();
    let page = Page::at("/login");
    let status = Arc::new(StatusLine::default());

    let bridge = bridge_on(&app, &page, &status);
    tokio::time::sleep(Duration::from_millis(150)).await;

    refresh.assert();
    login.assert_hits(0);
    let last = status.last().expect("the failure is shown");
    assert_eq!(
        last.text,
        "Login failed: Firebase: This user's credential isn't valid for this project. The user must sign in again. (auth/invalid-user-token)."
    );
    assert_eq!(last.color, "red");
    assert_eq!(bridge.state(), BridgeState::Anonymous);
    assert!(page.visits().is_empty());
}
