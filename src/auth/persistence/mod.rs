use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FilePersistence;
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use web::{WebStorageDriver, WebStoragePersistence};

use serde::{Deserialize, Serialize};

use crate::auth::error::AuthResult;

/// Serialized credential of the last signed-in user.
///
/// This belongs to the identity client (the equivalent of the SDK's own storage); the
/// dashboard code never reads or writes it directly.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PersistedAuthState {
    pub user_id: String,
    pub email: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    /// Expiration timestamp in seconds since the Unix epoch.
    pub expires_at: Option<i64>,
}

impl PersistedAuthState {
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token
            .as_deref()
            .map(|token| !token.is_empty())
            .unwrap_or(false)
    }
}

/// Storage backend for the identity client's credential.
///
/// Hosts plug in browser storage or a file; [`InMemoryPersistence`] is the default and
/// forgets everything when the process ends.
pub trait AuthPersistence: Send + Sync {
    fn set(&self, state: Option<PersistedAuthState>) -> AuthResult<()>;
    fn get(&self) -> AuthResult<Option<PersistedAuthState>>;
}

#[derive(Default)]
pub struct InMemoryPersistence {
    value: Mutex<Option<PersistedAuthState>>,
}

impl InMemoryPersistence {
    pub fn with_state(state: PersistedAuthState) -> Self {
        Self {
            value: Mutex::new(Some(state)),
        }
    }
}

impl AuthPersistence for InMemoryPersistence {
    fn set(&self, state: Option<PersistedAuthState>) -> AuthResult<()> {
        *self.value.lock().unwrap() = state;
        Ok(())
    }

    fn get(&self) -> AuthResult<Option<PersistedAuthState>> {
        Ok(self.value.lock().unwrap().clone())
    }
}
