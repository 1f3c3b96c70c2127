//! crates/wonderpay_core/src/hooks/mod.rs
//!
//! Thin request/response wrappers around the client handle, one per resource
//! family. Every operation needs a live handle, performs exactly one call
//! through the [`ResourceGateway`], turns failures into a notification and
//! resolves to an empty sentinel instead of an error.

pub mod banking;
pub mod counterparts;
pub mod entities;
pub mod invoices;
pub mod metrics;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::domain::{ClientHandle, Notification, Page};
use crate::ports::{Notifier, PortError, PortResult, ResourceGateway, ResourceRequest};
use crate::session::SessionContext;

pub use banking::{BankingHooks, ConnectBankAccount};
pub use counterparts::CounterpartHooks;
pub use entities::{EntityHooks, EntityStatus};
pub use invoices::{InvoiceHooks, InvoiceListParams};
pub use metrics::{CashFlow, DashboardHooks, DashboardMetrics, LedgerSummary};

/// Pagination shared by the list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListParams {
    pub(crate) fn apply(&self, request: ResourceRequest) -> ResourceRequest {
        request
            .with_query("limit", self.limit)
            .with_query("offset", self.offset)
    }
}

/// Notification texts for one operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Toasts {
    success: Option<&'static str>,
    failure: Option<&'static str>,
}

impl Toasts {
    pub(crate) fn failure(message: &'static str) -> Self {
        Self {
            success: None,
            failure: Some(message),
        }
    }

    pub(crate) fn silent() -> Self {
        Self {
            success: None,
            failure: None,
        }
    }

    pub(crate) fn with_success(mut self, message: &'static str) -> Self {
        self.success = Some(message);
        self
    }
}

/// The machinery shared by all resource families.
pub struct ResourceHook {
    session: Arc<SessionContext>,
    gateway: Arc<dyn ResourceGateway>,
    notifier: Arc<dyn Notifier>,
    not_ready: &'static str,
    in_flight: AtomicUsize,
}

impl ResourceHook {
    pub fn new(
        session: Arc<SessionContext>,
        gateway: Arc<dyn ResourceGateway>,
        not_ready: &'static str,
    ) -> Self {
        let notifier = session.notifier().clone();
        Self {
            session,
            gateway,
            notifier,
            not_ready,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while any operation of this family is awaiting the platform.
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn client_or_notify(&self) -> Option<Arc<ClientHandle>> {
        let client = self.session.client();
        if client.is_none() {
            self.notifier.notify(Notification::error(self.not_ready));
        }
        client
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// One call, decoded into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        client: &ClientHandle,
        request: ResourceRequest,
    ) -> PortResult<T> {
        let _loading = Loading::start(&self.in_flight);
        let path = request.path.clone();
        let value = self.gateway.send(client, request).await.map_err(|e| {
            warn!(%path, error = %e, "Resource call failed");
            e
        })?;
        serde_json::from_value(value).map_err(|e| {
            warn!(%path, error = %e, "Unexpected resource payload");
            PortError::Decode(e.to_string())
        })
    }

    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        request: ResourceRequest,
        toasts: Toasts,
    ) -> Option<T> {
        let client = self.client_or_notify()?;
        match self.fetch(&client, request).await {
            Ok(value) => {
                if let Some(message) = toasts.success {
                    self.notify(Notification::success(message));
                }
                Some(value)
            }
            Err(_) => {
                if let Some(message) = toasts.failure {
                    self.notify(Notification::error(message));
                }
                None
            }
        }
    }

    pub(crate) async fn call_list<T: DeserializeOwned>(
        &self,
        request: ResourceRequest,
        toasts: Toasts,
    ) -> Vec<T> {
        self.call::<Page<T>>(request, toasts)
            .await
            .map(|page| page.data)
            .unwrap_or_default()
    }

    /// Runs an action whose response body is irrelevant.
    pub(crate) async fn call_action(&self, request: ResourceRequest, toasts: Toasts) -> bool {
        self.call::<serde::de::IgnoredAny>(request, toasts)
            .await
            .is_some()
    }

    pub(crate) fn bound_entity_id(&self) -> Option<String> {
        self.session.client().map(|c| c.entity_id().to_string())
    }
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
