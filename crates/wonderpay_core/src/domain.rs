//! crates/wonderpay_core/src/domain.rs
//!
//! Defines the core data structures for the console.
//! Everything durable lives on the financial platform; these types only model
//! what the console holds in memory between calls.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::error::{CoreError, CoreResult};
use crate::ports::TokenSupplier;

//=========================================================================================
// Credentials & Tokens
//=========================================================================================

/// Client-credentials configuration for the financial platform.
///
/// Immutable for the lifetime of the process. Emptiness is not rejected at
/// construction so the console can still start and report the failure at
/// bootstrap time.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub api_version: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_url: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        }
    }

    /// Fails with [`CoreError::Config`] naming every blank field.
    pub fn validate(&self) -> CoreResult<()> {
        let missing: Vec<&str> = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("api_url", &self.api_url),
            ("api_version", &self.api_version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Config(format!(
                "missing required Monite configuration: {}",
                missing.join(", ")
            )))
        }
    }

    /// Whether the pair used by the token exchange is present.
    pub fn has_client_pair(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

// The secret never reaches logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// The body returned by a successful client-credentials exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A bearer token together with the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub expires_at: Instant,
}

impl Token {
    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

//=========================================================================================
// Tenants (Entities)
//=========================================================================================

/// An entity as returned by the platform. Only the id is interpreted;
/// everything else is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

/// The envelope used by every list endpoint on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub line1: String,
    pub postal_code: String,
    pub state: String,
}

/// The fixed organization the console creates when the platform has no entity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationProfile {
    pub legal_name: String,
    pub legal_type: String,
    pub tax_id: String,
    pub address: Address,
    pub email: String,
    pub phone: String,
}

impl Default for OrganizationProfile {
    fn default() -> Self {
        Self {
            legal_name: "Wonderland Studio LLC".to_string(),
            legal_type: "llc".to_string(),
            tax_id: "123456789".to_string(),
            address: Address {
                country: "US".to_string(),
                city: "Los Angeles".to_string(),
                line1: "123 Main St".to_string(),
                postal_code: "90001".to_string(),
                state: "CA".to_string(),
            },
            email: "mitch@wonderland.studio".to_string(),
            phone: "+12125551234".to_string(),
        }
    }
}

impl OrganizationProfile {
    /// The `POST /entities` payload for this profile.
    pub fn to_request(&self) -> Value {
        serde_json::json!({
            "type": "organization",
            "organization": {
                "legal_name": self.legal_name,
                "legal_type": self.legal_type,
                "tax_id": self.tax_id,
                "is_vendor": true,
                "is_customer": true,
            },
            "address": self.address,
            "email": self.email,
            "phone": self.phone,
        })
    }
}

//=========================================================================================
// Client Handle
//=========================================================================================

/// The tenant-bound handle every resource call goes through.
///
/// It never stores a token: each call asks the supplier, which answers from
/// the cache or refreshes lazily.
#[derive(Clone)]
pub struct ClientHandle {
    entity_id: String,
    api_url: String,
    api_version: String,
    tokens: Arc<dyn TokenSupplier>,
}

impl ClientHandle {
    pub fn new(
        entity_id: impl Into<String>,
        api_url: impl Into<String>,
        api_version: impl Into<String>,
        tokens: Arc<dyn TokenSupplier>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            api_url: api_url.into(),
            api_version: api_version.into(),
            tokens,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Fetches a current bearer token through the supplier.
    pub async fn token(&self) -> CoreResult<String> {
        self.tokens.access_token().await
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("entity_id", &self.entity_id)
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

//=========================================================================================
// Documents & Payables
//=========================================================================================

/// A file dropped into the document scanner.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Returned by the upload endpoint. The id is optional so a missing one is
/// reported as an ingestion failure rather than a decode error.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedDocument {
    #[serde(default)]
    pub id: Option<String>,
}

/// OCR processing status of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Uploading,
    Pending,
    Processed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentState {
    pub status: DocumentStatus,
}

/// Body of the draft-bill creation call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPayable {
    pub document_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl NewPayable {
    pub fn draft_bill(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            kind: "bill".to_string(),
            status: "draft".to_string(),
        }
    }
}

/// A payable record created from a processed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payable {
    pub id: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

//=========================================================================================
// Notifications
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Destructive,
}

/// A user-facing toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::destructive("Error", description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }
}
