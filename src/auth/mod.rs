//! Identity provider client.
//!
//! Email/password sign-in against the Firebase Identity Toolkit, ID token re-minting via
//! the Secure Token service, sign-out, and auth-state observers. The session bridge only
//! sees this through the [`IdentityProvider`] trait.

mod api;
mod error;
mod model;
mod persistence;
mod provider;
mod token;
mod token_manager;

#[doc(inline)]
pub use api::{Auth, AuthBuilder};

#[doc(inline)]
pub use error::{map_server_error_code, AuthError, AuthResult};

#[doc(inline)]
pub use model::{EmailAuthProvider, User, UserCredential, UserInfo};

#[doc(inline)]
pub use persistence::{AuthPersistence, InMemoryPersistence, PersistedAuthState};

#[cfg(not(target_arch = "wasm32"))]
#[doc(inline)]
pub use persistence::FilePersistence;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
#[doc(inline)]
pub use persistence::{WebStorageDriver, WebStoragePersistence};

#[doc(inline)]
pub use provider::{AuthStateObserver, IdentityProvider};

#[doc(inline)]
pub use token::{refresh_id_token_with_endpoint, RefreshTokenResponse};

#[doc(inline)]
pub use token_manager::{TokenManager, TokenUpdate};
