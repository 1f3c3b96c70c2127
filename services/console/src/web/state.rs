//! services/console/src/web/state.rs
//!
//! Defines the console's shared state and how it is wired from configuration.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use wonderpay_core::hooks::{
    BankingHooks, CounterpartHooks, DashboardHooks, EntityHooks, InvoiceHooks, ResourceHook,
};
use wonderpay_core::ports::{DocumentGateway, Notifier, ResourceGateway};
use wonderpay_core::{
    DocumentPipeline, IngestionJob, SdkManager, SessionContext, TenantResolver, TokenCache,
};

use crate::adapters::{
    MoniteAuthAdapter, MoniteDocumentAdapter, MoniteEntityAdapter, MoniteHttp,
    MoniteResourceAdapter, NotificationLog,
};
use crate::config::Config;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionContext>,
    pub pipeline: Arc<DocumentPipeline>,
    pub banking: BankingHooks,
    pub invoices: InvoiceHooks,
    pub counterparts: CounterpartHooks,
    pub entities: EntityHooks,
    pub dashboard: DashboardHooks,
    pub notifications: Arc<NotificationLog>,
    pub sign_in: RwLock<Option<SignInRecord>>,
    pub jobs: JobBoard,
}

/// What a successful sign-in leaves behind for the browser.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignInRecord {
    pub email: String,
    pub entity_id: String,
    pub token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the platform adapters, the core components and the hooks.
    pub fn build(config: Arc<Config>, http: MoniteHttp) -> Self {
        let credentials = Arc::new(config.credentials());
        let notifications = Arc::new(NotificationLog::default());
        let notifier: Arc<dyn Notifier> = notifications.clone();

        let tokens = Arc::new(TokenCache::new(
            credentials.clone(),
            Arc::new(MoniteAuthAdapter::new(http.clone())),
        ));
        let resolver = TenantResolver::new(
            Arc::new(MoniteEntityAdapter::new(http.clone(), &credentials)),
            config.entity_profile.clone(),
        );
        let sdk = Arc::new(SdkManager::new(credentials, tokens, resolver));
        let session = Arc::new(SessionContext::new(sdk, notifier.clone()));

        let documents: Arc<dyn DocumentGateway> = Arc::new(MoniteDocumentAdapter::new(http.clone()));
        let pipeline = Arc::new(DocumentPipeline::new(
            session.clone(),
            documents,
            notifier,
            config.retry_policy(),
        ));

        let resources: Arc<dyn ResourceGateway> = Arc::new(MoniteResourceAdapter::new(http));

        let hook = |not_ready: &'static str| ResourceHook::new(session.clone(), resources.clone(), not_ready);

        Self {
            banking: BankingHooks::new(hook("Banking service not initialized")),
            invoices: InvoiceHooks::new(hook("Invoice service not initialized")),
            counterparts: CounterpartHooks::new(hook("Monite SDK not initialized")),
            entities: EntityHooks::new(hook("Monite SDK not initialized")),
            dashboard: DashboardHooks::new(hook("Monite SDK not initialized")),
            config,
            session,
            pipeline,
            notifications,
            sign_in: RwLock::new(None),
            jobs: JobBoard::default(),
        }
    }

    pub fn sign_in_record(&self) -> Option<SignInRecord> {
        self.sign_in.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_sign_in(&self, record: Option<SignInRecord>) {
        *self.sign_in.write().unwrap_or_else(|e| e.into_inner()) = record;
    }
}

//=========================================================================================
// JobBoard (Background Document Jobs)
//=========================================================================================

/// Ingestion jobs started over HTTP, addressable by id until evicted.
#[derive(Default)]
pub struct JobBoard {
    jobs: RwLock<HashMap<Uuid, Arc<IngestionJob>>>,
}

impl JobBoard {
    pub fn insert(&self, job: Arc<IngestionJob>) -> Uuid {
        let id = Uuid::new_v4();
        self.jobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, job);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<IngestionJob>> {
        self.jobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<IngestionJob>> {
        self.jobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
