use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::app::errors::AppResult;
use crate::app::logger::LOGGER;
use crate::app::types::DashboardConfig;
use crate::auth::{Auth, AuthPersistence};
use crate::panels::{Dashboard, PanelLoader};
use crate::platform::http::build_client;
use crate::session::{Navigator, SessionBridge, SessionEndpoint, StatusDisplay};

pub static SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one page needs: configuration, the shared HTTP client and, when enabled,
/// the identity provider.
///
/// All components built from the same app share one cookie-holding client, so the
/// session minted by the bridge is what the panels load with.
pub struct DashboardApp {
    config: DashboardConfig,
    client: Client,
    auth: Option<Arc<Auth>>,
}

/// Validates `config` and sets up the shared client and identity provider.
///
/// A disabled or key-less identity configuration is not an error: the app comes up
/// without an identity provider and [`DashboardApp::session_bridge`] returns `None`.
pub fn initialize_app(config: DashboardConfig) -> AppResult<DashboardApp> {
    initialize_app_with_persistence(config, None)
}

/// Like [`initialize_app`], restoring a previously persisted credential from
/// `persistence`.
pub fn initialize_app_with_persistence(
    config: DashboardConfig,
    persistence: Option<Arc<dyn AuthPersistence>>,
) -> AppResult<DashboardApp> {
    config.validate()?;
    let client = build_client(config.request_timeout_secs.map(Duration::from_secs))?;

    let auth = if config.identity.is_active() {
        let mut builder = Auth::builder(&config.identity).with_client(client.clone());
        if let Some(persistence) = persistence {
            builder = builder.with_persistence(persistence);
        }
        let auth = builder.build()?;
        auth.initialize()?;
        Some(auth)
    } else {
        LOGGER.warn("Identity provider is disabled or missing an API key; skipping session bridge");
        None
    };

    LOGGER.debug(format!(
        "Dashboard client {SDK_VERSION} initialized for {}",
        config.base_url
    ));
    Ok(DashboardApp {
        config,
        client,
        auth,
    })
}

impl DashboardApp {
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn auth(&self) -> Option<&Arc<Auth>> {
        self.auth.as_ref()
    }

    pub fn session_endpoint(&self) -> AppResult<SessionEndpoint> {
        let url = self.config.endpoint(&self.config.routes.login_endpoint)?;
        Ok(SessionEndpoint::new(self.client.clone(), url))
    }

    /// Builds the session bridge for the current page and subscribes it to the identity
    /// provider. `None` when identity is disabled.
    pub fn session_bridge(
        &self,
        navigator: Arc<dyn Navigator>,
        status: Option<Arc<dyn StatusDisplay>>,
    ) -> AppResult<Option<Arc<SessionBridge>>> {
        let Some(auth) = &self.auth else {
            return Ok(None);
        };
        let mut builder = SessionBridge::builder(auth.clone(), self.session_endpoint()?, navigator)
            .with_routes(self.config.routes.clone());
        if let Some(status) = status {
            builder = builder.with_status_display(status);
        }
        let bridge = builder.build();
        bridge.install();
        Ok(Some(bridge))
    }

    pub fn panel_loader(&self) -> AppResult<PanelLoader> {
        Ok(PanelLoader::new(self.client.clone(), self.config.base()?))
    }

    /// A dashboard with no regions attached yet.
    pub fn dashboard(&self) -> AppResult<Dashboard> {
        Ok(Dashboard::new(
            self.panel_loader()?,
            self.config.routes.clone(),
        ))
    }
}
