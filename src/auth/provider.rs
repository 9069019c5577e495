use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::error::AuthResult;
use crate::auth::model::User;
use crate::util::{PartialObserver, Unsubscribe};

/// Observer of the identity provider's signed-in state; `None` means signed out.
pub type AuthStateObserver = PartialObserver<Option<Arc<User>>>;

/// The identity provider as seen by the session bridge.
///
/// [`crate::auth::Auth`] is the production implementation; tests substitute scripted
/// providers.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait IdentityProvider: Send + Sync {
    /// Verifies email and password, making the user current on success.
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Arc<User>>;

    /// Mints an ID token for the current user, refreshing it when close to expiry.
    ///
    /// Returns `Ok(None)` when nobody is signed in.
    async fn id_token(&self, force_refresh: bool) -> AuthResult<Option<String>>;

    /// Signs the current user out of the provider.
    async fn sign_out(&self) -> AuthResult<()>;

    /// Registers an observer. The current state is delivered to it immediately, then every
    /// change after that.
    fn on_auth_state_changed(&self, observer: AuthStateObserver) -> Unsubscribe;
}
