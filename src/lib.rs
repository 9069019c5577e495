//! Client side of the tenant dashboard.
//!
//! Two pieces live here:
//!
//! - [`session::SessionBridge`] signs a user in with the identity provider and trades the
//!   resulting ID token for a cookie-backed server session, keeping the two in step as the
//!   provider reports sign-ins and sign-outs.
//! - [`panels::Dashboard`] fills each region of the dashboard page from one JSON endpoint,
//!   showing a loading indicator while the request runs and a generic failure message
//!   when it does not succeed.
//!
//! [`app::initialize_app`] wires both to one configuration and one HTTP client.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dashboard_bridge::app::{initialize_app, DashboardConfig};
//! # use dashboard_bridge::session::Navigator;
//! # struct Page;
//! # impl Navigator for Page {
//! #     fn current_path(&self) -> String { "/login".into() }
//! #     fn navigate(&self, _path: &str) {}
//! # }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let app = initialize_app(DashboardConfig::from_env()?)?;
//! if let Some(bridge) = app.session_bridge(Arc::new(Page), None)? {
//!     bridge.sign_in("ada@example.com", "correct horse").await?;
//! }
//! let summary = app.dashboard()?.load_all().await;
//! println!("{summary:?}");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod auth;
pub mod logger;
pub mod panels;
pub mod platform;
pub mod session;
pub mod util;

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod test_support;
