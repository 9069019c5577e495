use std::time::Duration;

use reqwest::Client;

use crate::app::{AppError, AppResult};

/// Builds the HTTP client shared by the session bridge and the panel loader.
///
/// On native targets the client keeps a cookie jar so the session cookie minted by the
/// login exchange is replayed on every later panel request. In the browser the fetch
/// layer already does this.
pub fn build_client(timeout: Option<Duration>) -> AppResult<Client> {
    build_client_impl(timeout)
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client_impl(timeout: Option<Duration>) -> AppResult<Client> {
    let mut builder = Client::builder().cookie_store(true);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| AppError::HttpClient(err.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn build_client_impl(_timeout: Option<Duration>) -> AppResult<Client> {
    Client::builder()
        .build()
        .map_err(|err| AppError::HttpClient(err.to_string()))
}

/// Short, user-presentable description of a transport failure.
///
/// The full `reqwest` error goes to the logs; only this text is ever shown.
pub fn describe_transport_error(error: &reqwest::Error) -> &'static str {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if error.is_timeout() {
            return "the request timed out";
        }
        if error.is_connect() {
            return "could not connect to the server";
        }
    }
    if error.is_decode() {
        return "the server sent a malformed response";
    }
    if error.is_body() {
        return "the response could not be read";
    }
    "the request could not be completed"
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn unreachable_host_is_described_without_detail() {
        let client = build_client(Some(Duration::from_secs(2))).unwrap();
        // Port 9 (discard) on localhost is essentially never listening.
        let error = client
            .get("http://127.0.0.1:9/api/ping")
            .send()
            .await
            .unwrap_err();
        let text = describe_transport_error(&error);
        assert!(!text.contains("127.0.0.1"));
        assert!(!text.is_empty());
    }
}
