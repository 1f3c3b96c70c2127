pub mod auth;
pub mod documents;
pub mod entities;
pub mod http;
pub mod notify;
pub mod resources;

pub use auth::MoniteAuthAdapter;
pub use documents::MoniteDocumentAdapter;
pub use entities::MoniteEntityAdapter;
pub use http::MoniteHttp;
pub use notify::NotificationLog;
pub use resources::MoniteResourceAdapter;
