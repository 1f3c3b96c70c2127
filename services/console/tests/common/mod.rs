//! A fake platform bound to a local port, recording every request it serves.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use console_lib::adapters::MoniteHttp;
use console_lib::config::Config;
use console_lib::web::state::AppState;
use serde_json::{json, Value};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const API_VERSION: &str = "2024-01-31";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Inner {
    calls: Vec<Recorded>,
    entities: Vec<Value>,
    statuses: VecDeque<&'static str>,
    reject_auth: bool,
}

#[derive(Clone, Default)]
pub struct FakePlatform {
    inner: Arc<Mutex<Inner>>,
    addr: Option<SocketAddr>,
}

impl FakePlatform {
    /// Starts a platform that already has one entity and processes documents at once.
    pub async fn start() -> Self {
        Self::builder(vec![json!({"id": "ent-1", "type": "organization"})], vec!["processed"])
            .await
    }

    pub async fn builder(entities: Vec<Value>, statuses: Vec<&'static str>) -> Self {
        let mut platform = FakePlatform::default();
        {
            let mut inner = platform.inner.lock().unwrap();
            inner.entities = entities;
            inner.statuses = statuses.into();
        }

        let app = Router::new()
            .fallback(handle)
            .with_state(platform.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        platform.addr = Some(listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        platform
    }

    pub fn reject_auth(&self) {
        self.inner.lock().unwrap().reject_auth = true;
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/v1", self.addr.unwrap())
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    pub fn config(&self) -> Config {
        let api_url = self.api_url();
        Config::from_lookup(|key| match key {
            "MONITE_API_URL" => Some(api_url.clone()),
            "MONITE_CLIENT_ID" => Some(CLIENT_ID.to_string()),
            "MONITE_CLIENT_SECRET" => Some(CLIENT_SECRET.to_string()),
            "OCR_MAX_RETRIES" => Some("3".to_string()),
            "OCR_RETRY_DELAY_MS" => Some("10".to_string()),
            _ => None,
        })
        .unwrap()
    }

    pub fn app_state(&self) -> Arc<AppState> {
        self.app_state_with(self.config())
    }

    pub fn app_state_with(&self, config: Config) -> Arc<AppState> {
        Arc::new(AppState::build(Arc::new(config), MoniteHttp::new()))
    }
}

async fn handle(
    State(platform): State<FakePlatform>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches("/v1").to_string();
    let mut inner = platform.inner.lock().unwrap();
    inner.calls.push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.clone(),
    });

    match (method, path.as_str()) {
        (Method::POST, "/auth/token") if inner.reject_auth => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        )
            .into_response(),
        (Method::POST, "/auth/token") => Json(json!({
            "access_token": "tok-1",
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .into_response(),
        (Method::GET, "/entities") => Json(json!({"data": inner.entities})).into_response(),
        (Method::POST, "/entities") => {
            let mut created: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
            created["id"] = json!("ent-new");
            inner.entities.push(created.clone());
            (StatusCode::CREATED, Json(created)).into_response()
        }
        (Method::POST, "/documents") => Json(json!({"id": "doc-1"})).into_response(),
        (Method::GET, "/documents/doc-1") => {
            let status = if inner.statuses.len() > 1 {
                inner.statuses.pop_front()
            } else {
                inner.statuses.front().copied()
            };
            Json(json!({"status": status.unwrap_or("pending")})).into_response()
        }
        (Method::POST, "/payables") => {
            let mut payable: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
            payable["id"] = json!("pay-1");
            (StatusCode::CREATED, Json(payable)).into_response()
        }
        (Method::GET, "/payables") => Json(json!({
            "data": [{"id": "p1", "amount": 50.0}, {"id": "p2", "amount": 25.5}]
        }))
        .into_response(),
        (Method::GET, "/receivables") => {
            Json(json!({"data": [{"id": "r1", "amount": 100.0}]})).into_response()
        }
        (Method::GET, "/analytics/payments") => Json(json!({
            "data": [{"date": "2024-05-31", "inflow": 300.0, "outflow": 120.0}]
        }))
        .into_response(),
        (Method::GET, "/bank_accounts") => {
            Json(json!({"data": [{"id": "ba-1", "iban": "DE89370400440532013000"}]})).into_response()
        }
        (Method::DELETE, "/bank_accounts/ba-1") => StatusCode::NO_CONTENT.into_response(),
        _ => (StatusCode::NOT_FOUND, "no such route").into_response(),
    }
}
