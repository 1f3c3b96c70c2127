//! services/console/src/web/auth.rs
//!
//! Sign-in, sign-out and session status endpoints.
//!
//! Signing in does not check the password against anything: it bootstraps the
//! platform session and records who asked for it.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use wonderpay_core::SessionStatus;

use crate::web::state::{AppState, SignInRecord};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionView {
    #[schema(value_type = String, example = "ready")]
    pub status: SessionStatus,
    pub initializing: bool,
    pub error: Option<String>,
    pub entity_id: Option<String>,
    pub email: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signin - Connect to the platform and remember the signed-in user
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInRecord),
        (status = 400, description = "Missing email"),
        (status = 401, description = "The platform session could not be initialized")
    )
)]
pub async fn signin_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "email is required".to_string()));
    }

    let Some(client) = state.session.initialize().await else {
        let message = state
            .session
            .snapshot()
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Failed to initialize Monite SDK".to_string());
        warn!(%email, error = %message, "Sign-in failed");
        return Err((StatusCode::UNAUTHORIZED, message));
    };

    let token = client
        .token()
        .await
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let record = SignInRecord {
        email: email.to_string(),
        entity_id: client.entity_id().to_string(),
        token,
        signed_in_at: Utc::now(),
    };
    state.set_sign_in(Some(record.clone()));
    info!(%email, entity_id = %record.entity_id, "User signed in");

    Ok(Json(record))
}

/// POST /auth/signout - Tear down the platform session
#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 204, description = "Signed out")
    )
)]
pub async fn signout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.session.unmount().await;
    if let Some(record) = state.sign_in_record() {
        info!(email = %record.email, "User signed out");
    }
    state.set_sign_in(None);
    StatusCode::NO_CONTENT
}

/// GET /session - The session as the UI sees it
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current session state", body = SessionView)
    )
)]
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let snapshot = state.session.snapshot();
    Json(SessionView {
        status: snapshot.status,
        initializing: snapshot.initializing(),
        error: snapshot.error.map(|e| e.to_string()),
        entity_id: snapshot.client.map(|c| c.entity_id().to_string()),
        email: state.sign_in_record().map(|r| r.email),
    })
}
