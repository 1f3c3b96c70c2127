//! In-memory fakes of the platform ports shared by the core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::time::Instant;

use wonderpay_core::domain::{DocumentState, UploadedDocument};
use wonderpay_core::{
    AuthGateway, ClientHandle, Credentials, DocumentGateway, DocumentStatus, Entity,
    EntityGateway, NewPayable, Notification, NotificationKind, Notifier, OrganizationProfile,
    Payable, PortError, PortResult, ResourceGateway, ResourceRequest, SdkManager,
    SessionContext, TenantResolver, TokenCache, TokenGrant, UploadFile,
};

pub fn credentials() -> Credentials {
    Credentials::new("X", "Y", "https://api.test/v1", "2024-01-31")
}

pub fn entity(id: &str) -> Entity {
    Entity {
        id: id.to_string(),
        details: Map::new(),
    }
}

pub fn payable(id: &str) -> Payable {
    Payable {
        id: id.to_string(),
        details: Map::new(),
    }
}

pub fn unauthorized() -> PortError {
    PortError::Status {
        status: 401,
        body: r#"{"detail":"Invalid credentials"}"#.to_string(),
    }
}

//=========================================================================================
// Auth
//=========================================================================================

pub struct FakeAuth {
    calls: AtomicUsize,
    failures: Mutex<VecDeque<PortError>>,
    expires_in: Option<u64>,
    latency: Duration,
}

impl FakeAuth {
    pub fn granting(expires_in: Option<u64>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
            expires_in,
            latency: Duration::ZERO,
        })
    }

    pub fn slow(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
            expires_in: Some(3600),
            latency,
        })
    }

    /// The next `n` exchanges fail with `error`.
    pub fn failing_first(n: usize, error: PortError) -> Arc<Self> {
        let fake = Self::granting(Some(3600));
        fake.failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat(error).take(n));
        fake
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthGateway for FakeAuth {
    async fn exchange(&self, credentials: &Credentials) -> PortResult<TokenGrant> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        assert_eq!(credentials.client_id, "X");
        Ok(TokenGrant {
            access_token: format!("T{n}"),
            token_type: Some("Bearer".to_string()),
            expires_in: self.expires_in,
        })
    }
}

//=========================================================================================
// Entities
//=========================================================================================

pub struct FakeEntities {
    existing: Mutex<Vec<Entity>>,
    list_error: Mutex<Option<PortError>>,
    create_error: Mutex<Option<PortError>>,
    list_latency: Mutex<Duration>,
    pub lists: AtomicUsize,
    pub creates: AtomicUsize,
    pub created_bodies: Mutex<Vec<Value>>,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl FakeEntities {
    pub fn with(existing: Vec<Entity>) -> Arc<Self> {
        Arc::new(Self {
            existing: Mutex::new(existing),
            list_error: Mutex::new(None),
            create_error: Mutex::new(None),
            list_latency: Mutex::new(Duration::ZERO),
            lists: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            created_bodies: Mutex::new(Vec::new()),
            seen_tokens: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with(Vec::new())
    }

    pub fn fail_listing(&self, error: PortError) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    pub fn fail_creation(&self, error: PortError) {
        *self.create_error.lock().unwrap() = Some(error);
    }

    pub fn delay_listing(&self, latency: Duration) {
        *self.list_latency.lock().unwrap() = latency;
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityGateway for FakeEntities {
    async fn list_entities(&self, token: &str) -> PortResult<Vec<Entity>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_string());
        let latency = *self.list_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.existing.lock().unwrap().clone())
    }

    async fn create_entity(&self, token: &str, body: &Value) -> PortResult<Entity> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen_tokens.lock().unwrap().push(token.to_string());
        self.created_bodies.lock().unwrap().push(body.clone());
        if let Some(error) = self.create_error.lock().unwrap().clone() {
            return Err(error);
        }
        let created = entity(&format!("created-{n}"));
        self.existing.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

//=========================================================================================
// Documents
//=========================================================================================

pub struct FakeDocuments {
    upload: Mutex<PortResult<UploadedDocument>>,
    statuses: Mutex<VecDeque<PortResult<DocumentStatus>>>,
    payable_error: Mutex<Option<PortError>>,
    payable_glitches: Mutex<VecDeque<PortError>>,
    pub uploads: AtomicUsize,
    pub status_checks: Mutex<Vec<Instant>>,
    pub payables: Mutex<Vec<(Instant, NewPayable)>>,
}

impl FakeDocuments {
    /// Uploads succeed with id `doc-1`; status answers are taken from
    /// `statuses` and the last one repeats.
    pub fn new(statuses: Vec<PortResult<DocumentStatus>>) -> Arc<Self> {
        Arc::new(Self {
            upload: Mutex::new(Ok(UploadedDocument {
                id: Some("doc-1".to_string()),
            })),
            statuses: Mutex::new(statuses.into()),
            payable_error: Mutex::new(None),
            payable_glitches: Mutex::new(VecDeque::new()),
            uploads: AtomicUsize::new(0),
            status_checks: Mutex::new(Vec::new()),
            payables: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_upload(&self, result: PortResult<UploadedDocument>) {
        *self.upload.lock().unwrap() = result;
    }

    pub fn fail_payable(&self, error: PortError) {
        *self.payable_error.lock().unwrap() = Some(error);
    }

    /// Only the next payable creation fails.
    pub fn fail_payable_once(&self, error: PortError) {
        self.payable_glitches.lock().unwrap().push_back(error);
    }

    pub fn status_checks(&self) -> Vec<Instant> {
        self.status_checks.lock().unwrap().clone()
    }

    pub fn payables(&self) -> Vec<(Instant, NewPayable)> {
        self.payables.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentGateway for FakeDocuments {
    async fn upload(&self, client: &ClientHandle, _file: &UploadFile) -> PortResult<UploadedDocument> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        client
            .token()
            .await
            .map_err(|e| PortError::Token(e.to_string()))?;
        self.upload.lock().unwrap().clone()
    }

    async fn status(&self, _client: &ClientHandle, document_id: &str) -> PortResult<DocumentState> {
        assert_eq!(document_id, "doc-1");
        self.status_checks.lock().unwrap().push(Instant::now());
        let mut statuses = self.statuses.lock().unwrap();
        let next = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        next.unwrap_or(Ok(DocumentStatus::Pending))
            .map(|status| DocumentState { status })
    }

    async fn create_payable(&self, _client: &ClientHandle, payable_request: &NewPayable) -> PortResult<Payable> {
        self.payables
            .lock()
            .unwrap()
            .push((Instant::now(), payable_request.clone()));
        if let Some(error) = self.payable_glitches.lock().unwrap().pop_front() {
            return Err(error);
        }
        if let Some(error) = self.payable_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(payable("payable-1"))
    }
}

//=========================================================================================
// Resources
//=========================================================================================

type Responder = Box<dyn Fn(&ResourceRequest) -> PortResult<Value> + Send + Sync>;

pub struct FakeResources {
    responder: Responder,
    pub requests: Mutex<Vec<(String, ResourceRequest)>>,
}

impl FakeResources {
    pub fn new(
        responder: impl Fn(&ResourceRequest) -> PortResult<Value> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ResourceRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn entity_ids(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(e, _)| e.clone())
            .collect()
    }
}

#[async_trait]
impl ResourceGateway for FakeResources {
    async fn send(&self, client: &ClientHandle, request: ResourceRequest) -> PortResult<Value> {
        client
            .token()
            .await
            .map_err(|e| PortError::Token(e.to_string()))?;
        let response = (self.responder)(&request);
        self.requests
            .lock()
            .unwrap()
            .push((client.entity_id().to_string(), request));
        response
    }
}

//=========================================================================================
// Notifications
//=========================================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn destructive(&self) -> Vec<String> {
        self.of_kind(NotificationKind::Destructive)
    }

    pub fn successes(&self) -> Vec<String> {
        self.of_kind(NotificationKind::Success)
    }

    fn of_kind(&self, kind: NotificationKind) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.description.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

//=========================================================================================
// Wiring
//=========================================================================================

pub struct Harness {
    pub auth: Arc<FakeAuth>,
    pub entities: Arc<FakeEntities>,
    pub notifier: Arc<RecordingNotifier>,
    pub tokens: Arc<TokenCache>,
    pub sdk: Arc<SdkManager>,
    pub session: Arc<SessionContext>,
}

impl Harness {
    pub fn new(auth: Arc<FakeAuth>, entities: Arc<FakeEntities>) -> Self {
        Self::with_credentials(credentials(), auth, entities)
    }

    pub fn with_credentials(
        credentials: Credentials,
        auth: Arc<FakeAuth>,
        entities: Arc<FakeEntities>,
    ) -> Self {
        let credentials = Arc::new(credentials);
        let tokens = Arc::new(TokenCache::new(credentials.clone(), auth.clone()));
        let resolver = TenantResolver::new(entities.clone(), OrganizationProfile::default());
        let sdk = Arc::new(SdkManager::new(credentials, tokens.clone(), resolver));
        let notifier = RecordingNotifier::new();
        let session = Arc::new(SessionContext::new(sdk.clone(), notifier.clone()));
        Self {
            auth,
            entities,
            notifier,
            tokens,
            sdk,
            session,
        }
    }

    /// A harness whose bootstrap succeeds against entity `ent-1`.
    pub fn ready_defaults() -> Self {
        Self::new(FakeAuth::granting(Some(3600)), FakeEntities::with(vec![entity("ent-1")]))
    }
}
