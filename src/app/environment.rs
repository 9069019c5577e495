//! Loads [`DashboardConfig`] from the process environment.
//!
//! `DASHBOARD_CONFIG` may hold inline JSON, a path to a JSON file, or a comma separated
//! `key=value` list. Individual variables are applied on top of it.

use std::env;
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde_json::Value;

use crate::app::errors::{AppError, AppResult};
use crate::app::logger::LOGGER;
use crate::app::types::DashboardConfig;

const CONFIG_VARIABLE: &str = "DASHBOARD_CONFIG";

/// Variables overlaid onto the config, with the flat key they map to.
const OVERRIDES: &[(&str, &str)] = &[
    ("DASHBOARD_BASE_URL", "baseUrl"),
    ("DASHBOARD_LANDING_PATH", "landing"),
    ("DASHBOARD_REQUEST_TIMEOUT_SECS", "requestTimeoutSecs"),
    ("FIREBASE_API_KEY", "apiKey"),
    ("FIREBASE_AUTH_DOMAIN", "authDomain"),
    ("FIREBASE_PROJECT_ID", "projectId"),
    ("FIREBASE_STORAGE_BUCKET", "storageBucket"),
    ("FIREBASE_MESSAGING_SENDER_ID", "messagingSenderId"),
    ("FIREBASE_APP_ID", "appId"),
    ("FIREBASE_ENABLED", "enabled"),
];

impl DashboardConfig {
    /// Builds the configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_VARIABLE) {
            Some(raw) => parse_config_source(&raw)?,
            None => DashboardConfig::default(),
        };

        for (variable, key) in OVERRIDES {
            if let Some(value) = lookup(variable) {
                let value = value.trim();
                if !value.is_empty() {
                    apply_flat_key(&mut config, key, value, variable)?;
                }
            }
        }

        config.validate()?;
        if !config.identity.is_active() {
            LOGGER.warn("Identity provider is disabled or has no API key; sign-in is unavailable");
        }
        Ok(config)
    }
}

fn parse_config_source(raw: &str) -> AppResult<DashboardConfig> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        return parse_json(trimmed, CONFIG_VARIABLE);
    }

    if let Some(path) = treat_as_path(trimmed) {
        let contents = fs::read_to_string(&path).map_err(|err| AppError::InvalidConfig {
            source: path.clone(),
            message: err.to_string(),
        })?;
        return parse_json(&contents, &path);
    }

    let mut config = DashboardConfig::default();
    for (key, value) in parse_key_value_pairs(trimmed) {
        apply_flat_key(&mut config, &key, &value, CONFIG_VARIABLE)?;
    }
    Ok(config)
}

fn parse_json(raw: &str, source: &str) -> AppResult<DashboardConfig> {
    let value: Value = serde_json::from_str(raw).map_err(|err| AppError::InvalidConfig {
        source: source.to_string(),
        message: err.to_string(),
    })?;
    if !value.is_object() {
        return Err(AppError::InvalidConfig {
            source: source.to_string(),
            message: "expected a JSON object".to_string(),
        });
    }
    serde_json::from_value(value).map_err(|err| AppError::InvalidConfig {
        source: source.to_string(),
        message: err.to_string(),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn treat_as_path(raw: &str) -> Option<String> {
    if raw.contains('=') {
        return None;
    }
    Path::new(raw).exists().then(|| raw.to_string())
}

#[cfg(target_arch = "wasm32")]
fn treat_as_path(_raw: &str) -> Option<String> {
    None
}

fn parse_key_value_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            let (key, value) = (key.trim(), value.trim());
            (!key.is_empty() && !value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

fn apply_flat_key(
    config: &mut DashboardConfig,
    key: &str,
    value: &str,
    source: &str,
) -> AppResult<()> {
    let identity = &mut config.identity;
    match key {
        "baseUrl" => config.base_url = value.to_string(),
        "landing" => config.routes.landing = value.to_string(),
        "requestTimeoutSecs" => {
            let seconds = value.parse::<u64>().map_err(|err| AppError::InvalidConfig {
                source: source.to_string(),
                message: format!("requestTimeoutSecs: {err}"),
            })?;
            config.request_timeout_secs = Some(seconds);
        }
        "apiKey" => identity.api_key = Some(value.to_string()),
        "authDomain" => identity.auth_domain = Some(value.to_string()),
        "projectId" => identity.project_id = Some(value.to_string()),
        "storageBucket" => identity.storage_bucket = Some(value.to_string()),
        "messagingSenderId" => identity.messaging_sender_id = Some(value.to_string()),
        "appId" => identity.app_id = Some(value.to_string()),
        "enabled" => identity.enabled = parse_flag(value),
        other => LOGGER.debug(format!("Ignoring unknown config key '{other}' from {source}")),
    }
    Ok(())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off" | "disabled"
    )
}
