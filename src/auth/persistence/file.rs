use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::persistence::{AuthPersistence, PersistedAuthState};

/// Keeps the credential in a JSON file so a native host survives restarts signed in.
#[derive(Clone, Debug)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuthPersistence for FilePersistence {
    fn set(&self, state: Option<PersistedAuthState>) -> AuthResult<()> {
        let Some(state) = state else {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(AuthError::Persistence(format!(
                    "Failed to remove {}: {err}",
                    self.path.display()
                ))),
            };
        };

        let serialized = serde_json::to_string(&state).map_err(|err| {
            AuthError::Persistence(format!("Failed to serialize credential: {err}"))
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                AuthError::Persistence(format!("Failed to create {}: {err}", parent.display()))
            })?;
        }
        fs::write(&self.path, serialized).map_err(|err| {
            AuthError::Persistence(format!("Failed to write {}: {err}", self.path.display()))
        })
    }

    fn get(&self) -> AuthResult<Option<PersistedAuthState>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AuthError::Persistence(format!(
                    "Failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| AuthError::Persistence(format!("Corrupt credential file: {err}")))
    }
}
