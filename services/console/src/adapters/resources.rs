//! services/console/src/adapters/resources.rs
//!
//! Generic REST access for the resource hooks.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use wonderpay_core::ports::{HttpMethod, PortResult, ResourceGateway, ResourceRequest};
use wonderpay_core::ClientHandle;

use super::http::MoniteHttp;

#[derive(Clone)]
pub struct MoniteResourceAdapter {
    http: MoniteHttp,
}

impl MoniteResourceAdapter {
    pub fn new(http: MoniteHttp) -> Self {
        Self { http }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl ResourceGateway for MoniteResourceAdapter {
    async fn send(&self, client: &ClientHandle, request: ResourceRequest) -> PortResult<Value> {
        let mut builder = self
            .http
            .scoped(client, method(request.method), &request.path)
            .await?;
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        match request.body {
            Some(body) if !body.is_null() => builder = builder.json(&body),
            _ => {}
        }
        MoniteHttp::send_json(builder).await
    }
}
