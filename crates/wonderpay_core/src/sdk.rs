//! crates/wonderpay_core/src/sdk.rs
//!
//! Owns the single tenant-bound client handle for the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{ClientHandle, Credentials};
use crate::error::{CoreError, CoreResult};
use crate::ports::TokenSupplier;
use crate::tenant::TenantResolver;
use crate::token::TokenCache;

/// Lifecycle owner for the [`ClientHandle`].
///
/// `initialize` runs token acquisition, entity resolution and handle
/// construction in that order, at most once at a time. Callers arriving while
/// a bootstrap is in flight wait for it and receive the same handle.
pub struct SdkManager {
    credentials: Arc<Credentials>,
    tokens: Arc<TokenCache>,
    resolver: TenantResolver,
    handle: RwLock<Option<Arc<ClientHandle>>>,
    bootstrap: Mutex<()>,
    // Bumped by `clear`; a bootstrap that straddles a clear does not store its handle.
    generation: AtomicU64,
}

impl SdkManager {
    pub fn new(
        credentials: Arc<Credentials>,
        tokens: Arc<TokenCache>,
        resolver: TenantResolver,
    ) -> Self {
        Self {
            credentials,
            tokens,
            resolver,
            handle: RwLock::new(None),
            bootstrap: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the live handle, bootstrapping it first if there is none.
    pub async fn initialize(&self) -> CoreResult<Arc<ClientHandle>> {
        if let Some(handle) = self.current() {
            return Ok(handle);
        }

        let _gate = self.bootstrap.lock().await;
        if let Some(handle) = self.current() {
            debug!("Reusing handle built by a concurrent bootstrap");
            return Ok(handle);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        self.credentials.validate()?;

        let token = self.tokens.get_token().await?;
        let entity_id = self.resolver.resolve_tenant(&token).await?;

        let supplier: Arc<dyn TokenSupplier> = self.tokens.clone();
        let handle = Arc::new(ClientHandle::new(
            entity_id,
            self.credentials.api_url.clone(),
            self.credentials.api_version.clone(),
            supplier,
        ));

        let mut slot = self.handle.write().unwrap_or_else(|e| e.into_inner());
        if self.generation.load(Ordering::SeqCst) == generation {
            *slot = Some(handle.clone());
            info!(entity_id = %handle.entity_id(), "Monite client initialized");
        } else {
            debug!(entity_id = %handle.entity_id(), "Client cleared during bootstrap; not retained");
        }

        Ok(handle)
    }

    /// The live handle, or [`CoreError::NotInitialized`].
    pub fn get(&self) -> CoreResult<Arc<ClientHandle>> {
        self.current().ok_or(CoreError::NotInitialized)
    }

    /// Drops the handle, the resolved entity and the cached token.
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let dropped = self
            .handle
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        self.tokens.invalidate().await;
        if let Some(handle) = dropped {
            info!(entity_id = %handle.entity_id(), "Monite client cleared");
        }
    }

    pub fn entity_id(&self) -> Option<String> {
        self.current().map(|h| h.entity_id().to_string())
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    fn current(&self) -> Option<Arc<ClientHandle>> {
        self.handle
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
