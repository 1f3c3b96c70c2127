//! services/console/src/adapters/auth.rs
//!
//! The client-credentials token endpoint. Implements the `AuthGateway` port.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use wonderpay_core::ports::{AuthGateway, PortResult};
use wonderpay_core::{Credentials, TokenGrant};

use super::http::MoniteHttp;

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Clone)]
pub struct MoniteAuthAdapter {
    http: MoniteHttp,
}

impl MoniteAuthAdapter {
    pub fn new(http: MoniteHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthGateway for MoniteAuthAdapter {
    /// `POST {api_url}/auth/token` with a JSON client-credentials body.
    async fn exchange(&self, credentials: &Credentials) -> PortResult<TokenGrant> {
        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        };
        let request = self
            .http
            .versioned(
                Method::POST,
                &credentials.api_url,
                &credentials.api_version,
                "auth/token",
            )
            .json(&body);

        MoniteHttp::send_json(request).await
    }
}
