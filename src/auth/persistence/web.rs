use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::persistence::{AuthPersistence, PersistedAuthState};

const DEFAULT_STORAGE_KEY: &str = "dashboard:authUser";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WebStorageDriver {
    Local,
    Session,
}

/// Credential kept in `localStorage` or `sessionStorage`, so a reload finds the user still
/// signed in and the bridge can reconcile the server session.
#[derive(Debug, Clone)]
pub struct WebStoragePersistence {
    key: String,
    driver: WebStorageDriver,
}

impl WebStoragePersistence {
    pub fn new(driver: WebStorageDriver) -> Self {
        Self::with_key(driver, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(driver: WebStorageDriver, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            driver,
        }
    }

    fn storage(&self) -> AuthResult<Storage> {
        let window: Window = web_sys::window()
            .ok_or_else(|| AuthError::Persistence("window is not available".into()))?;
        match self.driver {
            WebStorageDriver::Local => window.local_storage().map_err(map_js_error)?,
            WebStorageDriver::Session => window.session_storage().map_err(map_js_error)?,
        }
        .ok_or_else(|| AuthError::Persistence("Web storage API is unavailable".into()))
    }
}

impl AuthPersistence for WebStoragePersistence {
    fn set(&self, state: Option<PersistedAuthState>) -> AuthResult<()> {
        let storage = self.storage()?;
        match state {
            Some(state) => {
                let serialized = serde_json::to_string(&state).map_err(|err| {
                    AuthError::Persistence(format!("Failed to serialize credential: {err}"))
                })?;
                storage
                    .set_item(&self.key, &serialized)
                    .map_err(map_js_error)
            }
            None => storage.remove_item(&self.key).map_err(map_js_error),
        }
    }

    fn get(&self) -> AuthResult<Option<PersistedAuthState>> {
        let value = self.storage()?.get_item(&self.key).map_err(map_js_error)?;
        // Unreadable entries are treated as signed out.
        Ok(value
            .filter(|text| !text.is_empty())
            .and_then(|text| serde_json::from_str(&text).ok()))
    }
}

fn map_js_error(value: JsValue) -> AuthError {
    AuthError::Persistence(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}
