use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::token_manager::{TokenManager, TokenUpdate};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub provider_id: String,
}

/// A user signed in with the identity provider.
#[derive(Clone, Debug)]
pub struct User {
    info: UserInfo,
    token_manager: TokenManager,
}

impl User {
    pub fn new(info: UserInfo) -> Self {
        Self {
            info,
            token_manager: TokenManager::default(),
        }
    }

    /// Returns the stable provider UID for the user.
    pub fn uid(&self) -> &str {
        &self.info.uid
    }

    pub fn email(&self) -> Option<&str> {
        self.info.email.as_deref()
    }

    pub fn info(&self) -> &UserInfo {
        &self.info
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.token_manager.refresh_token()
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }

    pub fn update_tokens(
        &self,
        id_token: Option<String>,
        refresh_token: Option<String>,
        expires_in: Option<Duration>,
    ) {
        self.token_manager
            .update(TokenUpdate::new(id_token, refresh_token, expires_in));
    }
}

#[derive(Clone, Debug)]
pub struct UserCredential {
    pub user: Arc<User>,
    pub provider_id: Option<String>,
    pub operation_type: Option<String>,
}

pub struct EmailAuthProvider;

impl EmailAuthProvider {
    pub const PROVIDER_ID: &'static str = "password";
}

#[derive(Debug, Serialize, Clone)]
pub struct SignInWithPasswordRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "returnSecureToken")]
    pub return_secure_token: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SignInWithPasswordResponse {
    #[serde(rename = "idToken")]
    pub id_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "localId")]
    pub local_id: String,
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "expiresIn")]
    pub expires_in: String,
}
