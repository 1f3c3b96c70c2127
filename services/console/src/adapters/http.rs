//! services/console/src/adapters/http.rs
//!
//! The shared `reqwest` plumbing for every platform adapter: URL joining,
//! version/auth headers, and status/body checking.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wonderpay_core::ports::{PortError, PortResult};
use wonderpay_core::ClientHandle;

pub const VERSION_HEADER: &str = "x-monite-version";
pub const ENTITY_HEADER: &str = "x-monite-entity-id";

/// A cheaply clonable HTTP client for the platform.
#[derive(Clone, Default)]
pub struct MoniteHttp {
    http: reqwest::Client,
}

impl MoniteHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling, custom timeouts).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// A request carrying only the version header.
    pub fn versioned(&self, method: Method, api_url: &str, api_version: &str, path: &str) -> RequestBuilder {
        self.http
            .request(method, endpoint(api_url, path))
            .header(VERSION_HEADER, api_version)
    }

    /// A versioned request with a bearer token.
    pub fn bearer(
        &self,
        method: Method,
        api_url: &str,
        api_version: &str,
        path: &str,
        token: &str,
    ) -> RequestBuilder {
        self.versioned(method, api_url, api_version, path)
            .bearer_auth(token)
    }

    /// A request scoped to the handle's entity, with a token fetched now.
    pub async fn scoped(&self, client: &ClientHandle, method: Method, path: &str) -> PortResult<RequestBuilder> {
        let token = client
            .token()
            .await
            .map_err(|e| PortError::Token(e.to_string()))?;
        Ok(self
            .bearer(method, client.api_url(), client.api_version(), path, &token)
            .header(ENTITY_HEADER, client.entity_id()))
    }

    /// Sends the request and decodes a successful body into `T`.
    ///
    /// An empty body decodes as JSON `null`.
    pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> PortResult<T> {
        let response = request.send().await.map_err(transport)?;
        let response = ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| PortError::Decode(e.to_string()));
        }
        serde_json::from_slice(&bytes).map_err(|e| PortError::Decode(e.to_string()))
    }
}

/// Joins the base URL and a relative resource path with exactly one slash.
pub fn endpoint(api_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Returns the response unchanged on 2xx, or a [`PortError::Status`] with the body text.
async fn ensure_success(response: Response) -> PortResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(PortError::Status {
        status: status.as_u16(),
        body,
    })
}

fn transport(e: reqwest::Error) -> PortError {
    if e.is_decode() {
        PortError::Decode(e.to_string())
    } else {
        PortError::Transport(e.to_string())
    }
}
