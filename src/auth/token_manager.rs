use std::sync::Mutex;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CredentialState {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<SystemTime>,
}

/// Holds the tokens of one signed-in user.
///
/// The ID token is the credential handed to the session exchange; it is short-lived and
/// re-minted from the refresh token whenever it is close to expiry.
#[derive(Debug, Default)]
pub struct TokenManager {
    state: Mutex<CredentialState>,
}

impl Clone for TokenManager {
    fn clone(&self) -> Self {
        Self {
            state: Mutex::new(self.state.lock().unwrap().clone()),
        }
    }
}

impl TokenManager {
    pub fn update(&self, update: TokenUpdate) {
        let mut state = self.state.lock().unwrap();
        if let Some(id_token) = update.id_token {
            state.id_token = Some(id_token);
        }
        if let Some(refresh_token) = update.refresh_token {
            state.refresh_token = Some(refresh_token);
        }
        if let Some(expires_in) = update.expires_in {
            state.expires_at = SystemTime::now().checked_add(expires_in);
        }
    }

    pub fn initialize(
        &self,
        id_token: Option<String>,
        refresh_token: Option<String>,
        expires_at: Option<SystemTime>,
    ) {
        *self.state.lock().unwrap() = CredentialState {
            id_token,
            refresh_token,
            expires_at,
        };
    }

    pub fn clear(&self) {
        *self.state.lock().unwrap() = CredentialState::default();
    }

    pub fn id_token(&self) -> Option<String> {
        self.state.lock().unwrap().id_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.lock().unwrap().refresh_token.clone()
    }

    pub fn expires_at(&self) -> Option<SystemTime> {
        self.state.lock().unwrap().expires_at
    }

    /// True when there is no ID token or it expires within `tolerance` of `now`.
    ///
    /// A token without a known expiry is trusted as is.
    pub fn needs_refresh_at(&self, tolerance: Duration, now: SystemTime) -> bool {
        let state = self.state.lock().unwrap();
        if state.id_token.is_none() {
            return true;
        }
        match state.expires_at {
            None => false,
            Some(expires_at) => {
                let threshold = now.checked_add(tolerance).unwrap_or(now);
                expires_at <= threshold
            }
        }
    }

    pub fn needs_refresh(&self, tolerance: Duration) -> bool {
        self.needs_refresh_at(tolerance, SystemTime::now())
    }
}

#[derive(Debug, Default)]
pub struct TokenUpdate {
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<Duration>,
}

impl TokenUpdate {
    pub fn new(
        id_token: Option<String>,
        refresh_token: Option<String>,
        expires_in: Option<Duration>,
    ) -> Self {
        Self {
            id_token,
            refresh_token,
            expires_in,
        }
    }
}
