pub mod domain;
pub mod error;
pub mod hooks;
pub mod ingestion;
pub mod ports;
pub mod sdk;
pub mod session;
pub mod tenant;
pub mod token;

pub use domain::{
    ClientHandle, Credentials, DocumentStatus, Entity, NewPayable, Notification,
    NotificationKind, OrganizationProfile, Payable, Token, TokenGrant, UploadFile,
};
pub use error::{CoreError, CoreResult};
pub use ingestion::{DocumentPipeline, IngestionJob, IngestionState, RetryPolicy, MAX_RETRIES, RETRY_DELAY};
pub use ports::{
    AuthGateway, DocumentGateway, EntityGateway, HttpMethod, Notifier, PortError, PortResult,
    ResourceGateway, ResourceRequest, TokenSupplier,
};
pub use sdk::SdkManager;
pub use session::{SessionContext, SessionState, SessionStatus};
pub use tenant::TenantResolver;
pub use token::TokenCache;
