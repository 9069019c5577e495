use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::errors::{AppError, AppResult};

/// Characters escaped when an identifier is placed into a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Client-side identity provider settings (the web app config of the Firebase project).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityOptions {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    /// `false` skips identity initialization entirely; panels still load.
    pub enabled: bool,
    pub identity_toolkit_endpoint: Option<String>,
    pub secure_token_endpoint: Option<String>,
}

impl Default for IdentityOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            auth_domain: None,
            project_id: None,
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
            enabled: true,
            identity_toolkit_endpoint: None,
            secure_token_endpoint: None,
        }
    }
}

impl IdentityOptions {
    /// Identity is usable only when enabled and an API key is present.
    pub fn is_active(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .map(|key| !key.trim().is_empty())
                .unwrap_or(false)
    }
}

/// Paths of the pages and backend endpoints the client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutesConfig {
    pub landing: String,
    pub entry_pages: Vec<String>,
    pub logout: String,
    pub login_endpoint: String,
    pub clients: String,
    pub faqs: String,
    pub chat_history: String,
    pub monthly_report: String,
    pub ping: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            landing: "/".to_string(),
            entry_pages: vec!["/login".to_string(), "/login/".to_string()],
            logout: "/logout".to_string(),
            login_endpoint: "/api/login".to_string(),
            clients: "/api/clients".to_string(),
            faqs: "/api/faqs".to_string(),
            chat_history: "/api/chat_history".to_string(),
            monthly_report: "/api/reports/monthly".to_string(),
            ping: "/api/ping".to_string(),
        }
    }
}

impl RoutesConfig {
    /// Whether `path` is one of the login pages, where a fresh session triggers navigation.
    pub fn is_entry_page(&self, path: &str) -> bool {
        self.entry_pages.iter().any(|entry| entry == path)
    }

    /// Chat history path for a WhatsApp id, encoded as a single path segment.
    pub fn chat_history_path(&self, wa_id: &str) -> String {
        let encoded = utf8_percent_encode(wa_id, PATH_SEGMENT);
        format!("{}/{}", self.chat_history.trim_end_matches('/'), encoded)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Origin of the dashboard backend, e.g. `https://admin.example.com`.
    pub base_url: String,
    pub identity: IdentityOptions,
    pub routes: RoutesConfig,
    /// Optional per-request timeout; only honoured on native targets.
    pub request_timeout_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            identity: IdentityOptions::default(),
            routes: RoutesConfig::default(),
            request_timeout_secs: None,
        }
    }
}

impl DashboardConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, identity: IdentityOptions) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_landing(mut self, landing: impl Into<String>) -> Self {
        self.routes.landing = landing.into();
        self
    }

    /// Parses and checks the base URL.
    pub fn base(&self) -> AppResult<Url> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::MissingBaseUrl);
        }
        let url = Url::parse(self.base_url.trim()).map_err(|err| AppError::InvalidUrl {
            value: self.base_url.clone(),
            message: err.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(AppError::InvalidUrl {
                value: self.base_url.clone(),
                message: "URL cannot be used as a base".to_string(),
            });
        }
        Ok(url)
    }

    /// Resolves a route path against the base URL.
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base()?.join(path).map_err(|err| AppError::InvalidUrl {
            value: path.to_string(),
            message: err.to_string(),
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        self.base()?;
        if !self.routes.landing.starts_with('/') {
            return Err(AppError::InvalidRoute {
                name: "landing",
                value: self.routes.landing.clone(),
            });
        }
        if !self.routes.logout.starts_with('/') {
            return Err(AppError::InvalidRoute {
                name: "logout",
                value: self.routes.logout.clone(),
            });
        }
        Ok(())
    }
}
