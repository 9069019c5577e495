use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::platform::http::describe_transport_error;
use crate::session::error::BridgeError;
use crate::session::LOGGER;

/// Short-lived identity token presented to the login endpoint.
///
/// Never logged or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionProof(String);

impl SessionProof {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionProof(<redacted>)")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Successful login acknowledgement. The session cookie itself lives in the client's jar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginAck {
    pub message: Option<String>,
}

/// The server's login endpoint (`POST /api/login`).
#[derive(Clone, Debug)]
pub struct SessionEndpoint {
    client: Client,
    url: Url,
}

impl SessionEndpoint {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Trades the proof for a server session.
    ///
    /// The proof travels both as a bearer header and as `{"idToken": ...}` in the body.
    pub async fn exchange(&self, proof: &SessionProof) -> Result<LoginAck, BridgeError> {
        let response = self
            .client
            .post(self.url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", proof.as_str()))
            .header(CONTENT_TYPE, "application/json")
            .json(&LoginRequest {
                id_token: proof.as_str(),
            })
            .send()
            .await
            .map_err(|err| {
                LOGGER.error(format!("Session exchange request failed: {err}"));
                BridgeError::Transport(describe_transport_error(&err).to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            LOGGER.error(format!("Could not read session exchange response: {err}"));
            BridgeError::Transport(describe_transport_error(&err).to_string())
        })?;

        if status.is_success() {
            let parsed: LoginResponse = serde_json::from_str(&body).map_err(|err| {
                LOGGER.error(format!("Malformed session exchange response: {err}"));
                BridgeError::Transport("the server sent a malformed response".to_string())
            })?;
            return Ok(LoginAck {
                message: parsed.message,
            });
        }

        let message = serde_json::from_str::<LoginResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.message);
        LOGGER.warn(format!(
            "Session exchange rejected with status {}",
            status.as_u16()
        ));
        Err(BridgeError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
