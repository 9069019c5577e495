use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::panels::error::{PanelError, PanelResult};
use crate::panels::region::Region;
use crate::panels::render::{FAILURE_MARKUP, LOADING_MARKUP};
use crate::panels::LOGGER;
use crate::platform::http::describe_transport_error;

/// Fetches panel payloads from the dashboard API and swaps them into regions.
#[derive(Clone, Debug)]
pub struct PanelLoader {
    client: Client,
    base: Url,
}

impl PanelLoader {
    /// `client` should be the one that ran the session exchange, so its cookie is sent.
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GETs `path` relative to the base URL and decodes the JSON body.
    pub async fn fetch_json<T>(&self, path: &str) -> PanelResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|err| PanelError::InvalidPath {
                path: path.to_string(),
                message: err.to_string(),
            })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PanelError::Transport(format!("{}: {err}", describe_transport_error(&err))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| PanelError::Transport(format!("{}: {err}", describe_transport_error(&err))))?;
        serde_json::from_slice(&body).map_err(|err| PanelError::Decode(err.to_string()))
    }

    /// Runs one fetch-and-render cycle for `region`.
    ///
    /// The loading indicator is shown until the outcome is known, then replaced wholesale by
    /// either the rendered markup or the generic failure message.
    pub async fn load<T, F>(&self, region: &dyn Region, path: &str, render: F) -> PanelResult<()>
    where
        T: DeserializeOwned,
        F: FnOnce(T) -> PanelResult<String>,
    {
        region.set_html(LOADING_MARKUP);

        match self.fetch_json::<T>(path).await.and_then(render) {
            Ok(markup) => {
                region.set_html(&markup);
                Ok(())
            }
            Err(err) => {
                LOGGER.error(format!("Failed to load {path}: {err}"));
                region.set_html(FAILURE_MARKUP);
                Err(err)
            }
        }
    }
}
