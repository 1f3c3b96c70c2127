//! crates/wonderpay_core/src/token.rs
//!
//! Acquires and memoizes the platform bearer token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Credentials, Token};
use crate::error::{CoreError, CoreResult};
use crate::ports::{AuthGateway, TokenSupplier};

/// Caches one bearer token and refreshes it lazily after expiry.
///
/// The slot lock is held across the exchange, so concurrent callers that all
/// find the cache empty still produce a single auth request.
pub struct TokenCache {
    credentials: Arc<Credentials>,
    gateway: Arc<dyn AuthGateway>,
    slot: Mutex<Option<Token>>,
}

impl TokenCache {
    pub fn new(credentials: Arc<Credentials>, gateway: Arc<dyn AuthGateway>) -> Self {
        Self {
            credentials,
            gateway,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached token value, exchanging credentials when none is valid.
    pub async fn get_token(&self) -> CoreResult<String> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if token.is_valid_at(Instant::now()) {
                return Ok(token.value.clone());
            }
            debug!("Cached access token expired");
        }

        if !self.credentials.has_client_pair() {
            return Err(CoreError::Auth("missing required Monite credentials".to_string()));
        }

        let grant = self.gateway.exchange(&self.credentials).await.map_err(|e| {
            warn!(error = %e, "Token exchange failed");
            CoreError::auth(e)
        })?;

        if grant.access_token.is_empty() {
            return Err(CoreError::Auth("invalid token response from server".to_string()));
        }

        // A missing lifetime means the token is used once and never cached as valid.
        let lifetime = Duration::from_secs(grant.expires_in.unwrap_or(0));
        let token = Token {
            value: grant.access_token,
            expires_at: Instant::now() + lifetime,
        };
        info!(expires_in_secs = lifetime.as_secs(), "Obtained access token");

        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Forgets the cached token; the next call performs a new exchange.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}

#[async_trait]
impl TokenSupplier for TokenCache {
    async fn access_token(&self) -> CoreResult<String> {
        self.get_token().await
    }
}
