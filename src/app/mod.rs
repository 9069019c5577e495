//! Configuration and wiring: where the dashboard lives, which routes it serves and
//! whether the identity provider is enabled.

mod api;
mod environment;
mod errors;
mod logger;
mod types;

#[doc(inline)]
pub use api::{initialize_app, initialize_app_with_persistence, DashboardApp, SDK_VERSION};

#[doc(inline)]
pub use errors::{AppError, AppResult};

#[doc(inline)]
pub use logger::LOGGER;

#[doc(inline)]
pub use types::{DashboardConfig, IdentityOptions, RoutesConfig};
