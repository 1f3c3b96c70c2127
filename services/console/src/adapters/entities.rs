//! services/console/src/adapters/entities.rs
//!
//! Entity listing and creation used while resolving the tenant.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use wonderpay_core::domain::Page;
use wonderpay_core::ports::{EntityGateway, PortResult};
use wonderpay_core::{Credentials, Entity};

use super::http::MoniteHttp;

#[derive(Clone)]
pub struct MoniteEntityAdapter {
    http: MoniteHttp,
    api_url: String,
    api_version: String,
}

impl MoniteEntityAdapter {
    pub fn new(http: MoniteHttp, credentials: &Credentials) -> Self {
        Self {
            http,
            api_url: credentials.api_url.clone(),
            api_version: credentials.api_version.clone(),
        }
    }
}

#[async_trait]
impl EntityGateway for MoniteEntityAdapter {
    async fn list_entities(&self, token: &str) -> PortResult<Vec<Entity>> {
        let request = self
            .http
            .bearer(Method::GET, &self.api_url, &self.api_version, "entities", token);
        let page: Page<Entity> = MoniteHttp::send_json(request).await?;
        Ok(page.data)
    }

    async fn create_entity(&self, token: &str, body: &Value) -> PortResult<Entity> {
        let request = self
            .http
            .bearer(Method::POST, &self.api_url, &self.api_version, "entities", token)
            .json(body);
        MoniteHttp::send_json(request).await
    }
}
