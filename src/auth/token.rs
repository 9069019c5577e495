use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::error::{map_error_body, AuthError, AuthResult};
use crate::platform::http::describe_transport_error;

pub(crate) const DEFAULT_SECURE_TOKEN_ENDPOINT: &str =
    "https://securetoken.googleapis.com/v1/token";

#[derive(Debug, Serialize)]
struct RefreshTokenRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub id_token: String,
    pub expires_in: String,
    pub user_id: Option<String>,
}

/// Exchanges a refresh token for a fresh ID token.
pub async fn refresh_id_token_with_endpoint(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    refresh_token: &str,
) -> AuthResult<RefreshTokenResponse> {
    let request = RefreshTokenRequest {
        grant_type: "refresh_token",
        refresh_token,
    };

    let response = client
        .post(endpoint)
        .query(&[("key", api_key)])
        .form(&request)
        .send()
        .await
        .map_err(|err| AuthError::Network(describe_transport_error(&err).to_string()))?;

    let status = response.status();
    if status.is_success() {
        response
            .json::<RefreshTokenResponse>()
            .await
            .map_err(|err| AuthError::Network(describe_transport_error(&err).to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(map_error_body(status.as_u16(), &body))
    }
}
