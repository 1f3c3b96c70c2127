//! crates/wonderpay_core/src/ports.rs
//!
//! Defines the service contracts (traits) between the core components and the
//! financial platform. The core never talks HTTP itself; adapters in the
//! service crate implement these traits.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    ClientHandle, Credentials, DocumentState, Entity, NewPayable, Notification, Payable,
    TokenGrant, UploadFile, UploadedDocument,
};
use crate::error::CoreResult;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Errors reported by adapters for a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The platform answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
    /// No token could be obtained for the call.
    #[error("Token unavailable: {0}")]
    Token(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Resource Requests
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// One REST call under `{api_url}/{path}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ResourceRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query parameter; `None` values are skipped.
    pub fn with_query(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The client-credentials token endpoint.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn exchange(&self, credentials: &Credentials) -> PortResult<TokenGrant>;
}

/// Entity listing and creation, called before any client handle exists.
#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn list_entities(&self, token: &str) -> PortResult<Vec<Entity>>;
    async fn create_entity(&self, token: &str, body: &Value) -> PortResult<Entity>;
}

/// Document upload, OCR status, and payable creation.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    async fn upload(&self, client: &ClientHandle, file: &UploadFile) -> PortResult<UploadedDocument>;
    async fn status(&self, client: &ClientHandle, document_id: &str) -> PortResult<DocumentState>;
    async fn create_payable(&self, client: &ClientHandle, payable: &NewPayable) -> PortResult<Payable>;
}

/// Generic single-call access to the platform's REST resources.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    async fn send(&self, client: &ClientHandle, request: ResourceRequest) -> PortResult<Value>;
}

/// Supplies a usable bearer token on every call.
#[async_trait]
pub trait TokenSupplier: Send + Sync {
    async fn access_token(&self) -> CoreResult<String>;
}

/// Presents toasts to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
