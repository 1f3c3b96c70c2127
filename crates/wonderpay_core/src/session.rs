//! crates/wonderpay_core/src/session.rs
//!
//! The UI-facing coordinator around the SDK bootstrap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::domain::{ClientHandle, Notification};
use crate::error::CoreError;
use crate::ports::Notifier;
use crate::sdk::SdkManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Initializing,
    Ready,
    Failed,
}

/// What the component tree sees: `{client, initializing, error}`.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    pub client: Option<Arc<ClientHandle>>,
    pub error: Option<CoreError>,
}

impl SessionState {
    fn idle() -> Self {
        Self {
            status: SessionStatus::Idle,
            client: None,
            error: None,
        }
    }

    pub fn initializing(&self) -> bool {
        self.status == SessionStatus::Initializing
    }
}

/// Drives `Idle -> Initializing -> {Ready, Failed}` and back to
/// `Initializing` on every explicit `initialize`.
///
/// Errors never escape: they are stored in the state, surfaced as a
/// destructive notification, and the call resolves to `None`.
///
/// An `unmount` that lands while a bootstrap is in flight wins: the late
/// outcome is dropped and the session stays `Idle`.
pub struct SessionContext {
    sdk: Arc<SdkManager>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SessionState>,
    generation: AtomicU64,
}

impl SessionContext {
    pub fn new(sdk: Arc<SdkManager>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::idle());
        Self {
            sdk,
            notifier,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Starts the bootstrap the way a freshly mounted provider does.
    pub async fn mount(&self) -> Option<Arc<ClientHandle>> {
        self.initialize().await
    }

    pub async fn initialize(&self) -> Option<Arc<ClientHandle>> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.state.send_modify(|s| {
            s.status = SessionStatus::Initializing;
            s.error = None;
        });

        match self.sdk.initialize().await {
            Ok(client) => {
                let retained = self
                    .sdk
                    .get()
                    .is_ok_and(|live| Arc::ptr_eq(&live, &client));
                let published = self.state.send_if_modified(|s| {
                    if !retained || !self.is_current(generation) {
                        return false;
                    }
                    s.status = SessionStatus::Ready;
                    s.client = Some(client.clone());
                    s.error = None;
                    true
                });
                if !published {
                    debug!(entity_id = %client.entity_id(), "Session torn down during bootstrap; handle dropped");
                    return None;
                }
                info!(entity_id = %client.entity_id(), "Session ready");
                self.notifier
                    .notify(Notification::success("Connected to Monite successfully"));
                Some(client)
            }
            Err(e) => {
                error!(error = %e, "Monite initialization error");
                let description = e.to_string();
                let published = self.state.send_if_modified(|s| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    s.status = SessionStatus::Failed;
                    s.client = None;
                    s.error = Some(e);
                    true
                });
                if !published {
                    return None;
                }
                self.notifier
                    .notify(Notification::destructive("Initialization Error", description));
                None
            }
        }
    }

    /// Tears the session down; the next mount bootstraps from scratch.
    pub async fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.sdk.clear().await;
        self.state.send_replace(SessionState::idle());
    }

    pub fn client(&self) -> Option<Arc<ClientHandle>> {
        self.state.borrow().client.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
