use std::sync::{Arc, LazyLock, Mutex};
use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::app::IdentityOptions;
use crate::auth::error::{map_error_body, AuthError, AuthResult};
use crate::auth::model::{
    EmailAuthProvider, SignInWithPasswordRequest, SignInWithPasswordResponse, User,
    UserCredential, UserInfo,
};
use crate::auth::persistence::{AuthPersistence, InMemoryPersistence, PersistedAuthState};
use crate::auth::provider::{AuthStateObserver, IdentityProvider};
use crate::auth::token::{self, DEFAULT_SECURE_TOKEN_ENDPOINT};
use crate::logger::Logger;
use crate::platform::http::describe_transport_error;
use crate::util::{decode_claims, ObserverList, Unsubscribe};

pub(crate) const DEFAULT_IDENTITY_TOOLKIT_ENDPOINT: &str =
    "https://identitytoolkit.googleapis.com/v1";

/// ID tokens expiring within this window are re-minted before use.
const TOKEN_REFRESH_TOLERANCE: Duration = Duration::from_secs(5 * 60);

pub(crate) static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@dashboard/auth"));

#[derive(Debug, Clone)]
struct AuthConfig {
    api_key: String,
    identity_toolkit_endpoint: String,
    secure_token_endpoint: String,
}

/// Email/password client for the Firebase Identity Toolkit REST API.
pub struct Auth {
    config: AuthConfig,
    current_user: Mutex<Option<Arc<User>>>,
    listeners: ObserverList<Option<Arc<User>>>,
    rest_client: Client,
    token_refresh_tolerance: Duration,
    persistence: Arc<dyn AuthPersistence>,
}

impl Auth {
    pub fn builder(options: &IdentityOptions) -> AuthBuilder {
        AuthBuilder::new(options)
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.current_user.lock().unwrap().clone()
    }

    /// Restores a persisted credential, if any, and announces it to observers.
    pub fn initialize(&self) -> AuthResult<()> {
        let Some(state) = self.persistence.get()? else {
            return Ok(());
        };
        if !state.has_refresh_token() {
            self.persistence.set(None)?;
            return Ok(());
        }

        let user = Arc::new(build_user_from_persisted_state(&state));
        LOGGER.debug(format!("Restored credential for user {}", user.uid()));
        *self.current_user.lock().unwrap() = Some(Arc::clone(&user));
        self.listeners.notify(&Some(user));
        Ok(())
    }

    pub async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<UserCredential> {
        let request = SignInWithPasswordRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            return_secure_token: true,
        };

        let response: SignInWithPasswordResponse = self
            .execute_request("accounts:signInWithPassword", &request)
            .await?;

        let expires_in = parse_expires_in(&response.expires_in)?;
        let email = response
            .email
            .clone()
            .or_else(|| decode_claims(&response.id_token).and_then(|c| c.email().map(str::to_owned)));
        let user = User::new(UserInfo {
            uid: response.local_id.clone(),
            email,
            display_name: response.display_name.clone(),
            provider_id: EmailAuthProvider::PROVIDER_ID.to_string(),
        });
        user.update_tokens(
            Some(response.id_token),
            Some(response.refresh_token),
            Some(expires_in),
        );

        let user = Arc::new(user);
        *self.current_user.lock().unwrap() = Some(Arc::clone(&user));
        self.save_persisted_state(&user)?;
        LOGGER.info(format!("Signed in user {}", user.uid()));
        self.listeners.notify(&Some(Arc::clone(&user)));

        Ok(UserCredential {
            user,
            provider_id: Some(EmailAuthProvider::PROVIDER_ID.to_string()),
            operation_type: Some("signIn".to_string()),
        })
    }

    /// Clears the current user and the stored credential.
    ///
    /// Observers are told about the sign-out even when clearing storage fails; that
    /// failure is still returned.
    pub fn sign_out(&self) -> AuthResult<()> {
        let previous = self.current_user.lock().unwrap().take();
        if let Some(user) = previous.as_ref() {
            user.token_manager().clear();
        }
        let persisted = self.persistence.set(None);
        self.listeners.notify(&None);
        persisted
    }

    /// Returns the current ID token, re-minting it when forced or close to expiry.
    pub async fn get_token(&self, force_refresh: bool) -> AuthResult<Option<String>> {
        let Some(user) = self.current_user() else {
            return Ok(None);
        };

        let needs_refresh =
            force_refresh || user.token_manager().needs_refresh(self.token_refresh_tolerance);
        if !needs_refresh {
            return Ok(user.token_manager().id_token());
        }

        let refresh_token = user
            .refresh_token()
            .ok_or_else(|| AuthError::InvalidCredential("Missing refresh token".into()))?;
        let response = token::refresh_id_token_with_endpoint(
            &self.rest_client,
            &self.config.secure_token_endpoint,
            &self.config.api_key,
            &refresh_token,
        )
        .await?;
        let expires_in = parse_expires_in(&response.expires_in)?;
        user.update_tokens(
            Some(response.id_token.clone()),
            Some(response.refresh_token),
            Some(expires_in),
        );
        self.save_persisted_state(&user)?;
        Ok(Some(response.id_token))
    }

    /// Registers an observer; the current state is replayed to it first.
    pub fn on_auth_state_changed(&self, observer: AuthStateObserver) -> Unsubscribe {
        if let Some(next) = observer.next.clone() {
            next(&self.current_user());
        }
        self.listeners.add(observer)
    }

    async fn execute_request<TRequest, TResponse>(
        &self,
        path: &str,
        request: &TRequest,
    ) -> AuthResult<TResponse>
    where
        TRequest: Serialize,
        TResponse: serde::de::DeserializeOwned,
    {
        let url = format!(
            "{}/{}",
            self.config.identity_toolkit_endpoint.trim_end_matches('/'),
            path
        );
        let response = self
            .rest_client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|err| {
                LOGGER.warn(format!("Identity request {path} failed: {err}"));
                AuthError::Network(describe_transport_error(&err).to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            LOGGER.warn(format!("Identity request {path} rejected ({status}): {body}"));
            return Err(map_error_body(status.as_u16(), &body));
        }

        response.json().await.map_err(|err| {
            LOGGER.warn(format!("Identity response for {path} unreadable: {err}"));
            AuthError::Network(describe_transport_error(&err).to_string())
        })
    }

    fn save_persisted_state(&self, user: &User) -> AuthResult<()> {
        let expires_at = user
            .token_manager()
            .expires_at()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_secs() as i64);

        let state = PersistedAuthState {
            user_id: user.uid().to_string(),
            email: user.email().map(str::to_owned),
            refresh_token: user.refresh_token(),
            id_token: user.token_manager().id_token(),
            expires_at,
        };
        self.persistence.set(Some(state))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl IdentityProvider for Auth {
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Arc<User>> {
        Auth::sign_in_with_email_and_password(self, email, password)
            .await
            .map(|credential| credential.user)
    }

    async fn id_token(&self, force_refresh: bool) -> AuthResult<Option<String>> {
        self.get_token(force_refresh).await
    }

    async fn sign_out(&self) -> AuthResult<()> {
        Auth::sign_out(self)
    }

    fn on_auth_state_changed(&self, observer: AuthStateObserver) -> Unsubscribe {
        Auth::on_auth_state_changed(self, observer)
    }
}

fn parse_expires_in(value: &str) -> AuthResult<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|err| AuthError::InvalidCredential(format!("Invalid expiresIn value: {err}")))
}

fn build_user_from_persisted_state(state: &PersistedAuthState) -> User {
    let claims = state.id_token.as_deref().and_then(decode_claims);
    let email = state
        .email
        .clone()
        .or_else(|| claims.as_ref().and_then(|c| c.email().map(str::to_owned)));
    let user = User::new(UserInfo {
        uid: state.user_id.clone(),
        email,
        display_name: None,
        provider_id: EmailAuthProvider::PROVIDER_ID.to_string(),
    });

    let expires_at = state
        .expires_at
        .or_else(|| claims.as_ref().and_then(|c| c.expires_at()))
        .filter(|seconds| *seconds > 0)
        .and_then(|seconds| UNIX_EPOCH.checked_add(Duration::from_secs(seconds as u64)));
    user.token_manager().initialize(
        state.id_token.clone(),
        state.refresh_token.clone(),
        expires_at,
    );
    user
}

pub struct AuthBuilder {
    api_key: Option<String>,
    identity_toolkit_endpoint: String,
    secure_token_endpoint: String,
    client: Option<Client>,
    persistence: Option<Arc<dyn AuthPersistence>>,
    token_refresh_tolerance: Duration,
}

impl AuthBuilder {
    fn new(options: &IdentityOptions) -> Self {
        Self {
            api_key: options.api_key.clone(),
            identity_toolkit_endpoint: options
                .identity_toolkit_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_IDENTITY_TOOLKIT_ENDPOINT.to_string()),
            secure_token_endpoint: options
                .secure_token_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_SECURE_TOKEN_ENDPOINT.to_string()),
            client: None,
            persistence: None,
            token_refresh_tolerance: TOKEN_REFRESH_TOLERANCE,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn AuthPersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_identity_toolkit_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.identity_toolkit_endpoint = endpoint.into();
        self
    }

    pub fn with_secure_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.secure_token_endpoint = endpoint.into();
        self
    }

    pub fn with_token_refresh_tolerance(mut self, tolerance: Duration) -> Self {
        self.token_refresh_tolerance = tolerance;
        self
    }

    pub fn build(self) -> AuthResult<Arc<Auth>> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AuthError::InvalidCredential("Missing API key".into()))?;

        Ok(Arc::new(Auth {
            config: AuthConfig {
                api_key,
                identity_toolkit_endpoint: self.identity_toolkit_endpoint,
                secure_token_endpoint: self.secure_token_endpoint,
            },
            current_user: Mutex::new(None),
            listeners: ObserverList::default(),
            rest_client: self.client.unwrap_or_default(),
            token_refresh_tolerance: self.token_refresh_tolerance,
            persistence: self
                .persistence
                .unwrap_or_else(|| Arc::new(InMemoryPersistence::default())),
        }))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::start_mock_server;
    use crate::util::jwt::build_unsigned_token;
    use crate::util::PartialObserver;
    use httpmock::prelude::*;
    use serde_json::json;

    const TEST_API_KEY: &str = "test-api-key";
    const TEST_EMAIL: &str = "admin@example.com";
    const TEST_PASSWORD: &str = "secret";
    const TEST_UID: &str = "uid-123";

    fn build_auth(server: &MockServer, persistence: Arc<dyn AuthPersistence>) -> Arc<Auth> {
        let options = IdentityOptions {
            api_key: Some(TEST_API_KEY.into()),
            ..Default::default()
        };
        Auth::builder(&options)
            .with_identity_toolkit_endpoint(server.url("/v1"))
            .with_secure_token_endpoint(server.url("/token"))
            .with_persistence(persistence)
            .build()
            .expect("failed to build auth")
    }

    fn record_states(auth: &Auth) -> (Arc<Mutex<Vec<Option<String>>>>, Unsubscribe) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let unsubscribe = auth.on_auth_state_changed(PartialObserver::new().with_next(
            move |user: &Option<Arc<User>>| {
                sink.lock()
                    .unwrap()
                    .push(user.as_ref().map(|u| u.uid().to_string()));
            },
        ));
        (seen, unsubscribe)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sign_in_sets_current_user_and_notifies() {
        let server = start_mock_server();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/accounts:signInWithPassword")
                .query_param("key", TEST_API_KEY)
                .json_body(json!({
                    "email": TEST_EMAIL,
                    "password": TEST_PASSWORD,
                    "returnSecureToken": true
                }));
            then.status(200).json_body(json!({
                "localId": TEST_UID,
                "email": TEST_EMAIL,
                "idToken": "id-token",
                "refreshToken": "refresh-token",
                "expiresIn": "3600"
            }));
        });
        let persistence = Arc::new(InMemoryPersistence::default());
        let auth = build_auth(&server, persistence.clone());
        let (seen, _unsubscribe) = record_states(&auth);

        let credential = auth
            .sign_in_with_email_and_password(TEST_EMAIL, TEST_PASSWORD)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(credential.user.uid(), TEST_UID);
        assert_eq!(credential.user.email(), Some(TEST_EMAIL));
        assert_eq!(auth.get_token(false).await.unwrap().as_deref(), Some("id-token"));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[None, Some(TEST_UID.to_string())]
        );
        let stored = persistence.get().unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-token"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sign_in_rejection_is_worded() {
        let server = start_mock_server();
        server.mock(|when, then| {
            when.method(POST).path("/v1/accounts:signInWithPassword");
            then.status(400)
                .json_body(json!({"error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}}));
        });
        let auth = build_auth(&server, Arc::new(InMemoryPersistence::default()));

        let error = auth
            .sign_in_with_email_and_password(TEST_EMAIL, "wrong")
            .await
            .unwrap_err();

        assert_eq!(error.code(), Some("auth/invalid-credential"));
        assert!(auth.current_user().is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stale_token_is_re_minted_before_use() {
        let server = start_mock_server();
        let refresh = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .query_param("key", TEST_API_KEY)
                .body_contains("refresh_token=refresh-1");
            then.status(200).json_body(json!({
                "access_token": "id-2",
                "refresh_token": "refresh-2",
                "id_token": "id-2",
                "expires_in": "3600",
                "user_id": TEST_UID
            }));
        });
        let persisted = PersistedAuthState {
            user_id: TEST_UID.into(),
            email: Some(TEST_EMAIL.into()),
            refresh_token: Some("refresh-1".into()),
            id_token: Some("id-1".into()),
            expires_at: Some(1),
        };
        let auth = build_auth(&server, Arc::new(InMemoryPersistence::with_state(persisted)));
        auth.initialize().unwrap();

        let token = auth.get_token(false).await.unwrap();

        refresh.assert();
        assert_eq!(token.as_deref(), Some("id-2"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn restored_credential_reaches_existing_observers() {
        let server = start_mock_server();
        let id_token = build_unsigned_token(&json!({
            "email": TEST_EMAIL,
            "exp": 4_102_444_800_i64
        }));
        let persisted = PersistedAuthState {
            user_id: TEST_UID.into(),
            email: None,
            refresh_token: Some("refresh-1".into()),
            id_token: Some(id_token.clone()),
            expires_at: None,
        };
        let auth = build_auth(&server, Arc::new(InMemoryPersistence::with_state(persisted)));
        let (seen, _unsubscribe) = record_states(&auth);

        auth.initialize().unwrap();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[None, Some(TEST_UID.to_string())]
        );
        let user = auth.current_user().unwrap();
        assert_eq!(user.email(), Some(TEST_EMAIL));
        assert_eq!(auth.get_token(false).await.unwrap(), Some(id_token));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sign_out_clears_state_and_notifies() {
        let server = start_mock_server();
        let persisted = PersistedAuthState {
            user_id: TEST_UID.into(),
            refresh_token: Some("refresh-1".into()),
            id_token: Some("id-1".into()),
            ..Default::default()
        };
        let persistence = Arc::new(InMemoryPersistence::with_state(persisted));
        let auth = build_auth(&server, persistence.clone());
        auth.initialize().unwrap();
        let (seen, _unsubscribe) = record_states(&auth);

        auth.sign_out().unwrap();

        assert!(auth.current_user().is_none());
        assert_eq!(persistence.get().unwrap(), None);
        assert_eq!(auth.get_token(false).await.unwrap(), None);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[Some(TEST_UID.to_string()), None]
        );
    }

    #[test]
    fn builder_requires_api_key() {
        let result = Auth::builder(&IdentityOptions::default()).build();
        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }
}
