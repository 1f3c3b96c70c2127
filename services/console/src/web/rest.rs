//! services/console/src/web/rest.rs
//!
//! Contains the document ingestion and notification handlers and the master
//! definition for the OpenAPI specification.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;
use wonderpay_core::{IngestionJob, IngestionState, Notification, NotificationKind, UploadFile};

use crate::web::auth::{self, SessionView, SignInRequest};
use crate::web::state::{AppState, SignInRecord};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signin_handler,
        auth::signout_handler,
        auth::session_handler,
        upload_document_handler,
        get_job_handler,
        cancel_job_handler,
        notifications_handler,
    ),
    components(
        schemas(SignInRequest, SignInRecord, SessionView, JobAccepted, JobView, NotificationView)
    ),
    tags(
        (name = "WonderPay Console API", description = "Session, document ingestion and accounts endpoints for the console.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload sent after a document job is queued.
#[derive(Serialize, ToSchema)]
pub struct JobAccepted {
    pub job_id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct JobView {
    pub job_id: Uuid,
    #[schema(value_type = Object)]
    pub state: IngestionState,
}

#[derive(Serialize, ToSchema)]
pub struct NotificationView {
    #[schema(example = "destructive")]
    pub kind: String,
    pub title: String,
    pub description: String,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        let kind = match n.kind {
            NotificationKind::Success => "success",
            NotificationKind::Destructive => "destructive",
        };
        Self {
            kind: kind.to_string(),
            title: n.title,
            description: n.description,
        }
    }
}

//=========================================================================================
// Document Ingestion Handlers
//=========================================================================================

/// Upload a scanned document and turn it into a draft bill in the background.
///
/// Accepts a multipart/form-data request with a `file` part.
#[utoipa::path(
    post,
    path = "/documents",
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 202, description = "Job queued", body = JobAccepted),
        (status = 400, description = "Bad request (e.g., missing file)")
    )
)]
pub async fn upload_document_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        let mut file = UploadFile::new(file_name, data);
        if let Some(content_type) = content_type {
            file = file.with_content_type(content_type);
        }
        upload = Some(file);
        break;
    }

    let file = upload.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Multipart form must include a `file` part".to_string(),
        )
    })?;

    let job = Arc::new(IngestionJob::new());
    let job_id = app_state.jobs.insert(job.clone());
    info!(%job_id, file_name = %file.file_name, "Document job queued");

    tokio::spawn(async move {
        if let Err(e) = app_state.pipeline.process_with(&job, file).await {
            warn!(%job_id, error = %e, "Document job failed");
        }
        // Terminal now; keep it queryable for a while, then drop it.
        tokio::time::sleep(app_state.config.job_retention).await;
        app_state.jobs.remove(&job_id);
        debug!(%job_id, "Document job evicted");
    });

    Ok((StatusCode::ACCEPTED, Json(JobAccepted { job_id })))
}

/// Progress of a document job.
#[utoipa::path(
    get,
    path = "/documents/jobs/{id}",
    params(("id" = Uuid, Path, description = "The job id returned by the upload.")),
    responses(
        (status = 200, description = "Current job phase", body = JobView),
        (status = 404, description = "Unknown job")
    )
)]
pub async fn get_job_handler(
    State(app_state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobView>, (StatusCode, String)> {
    let job = app_state
        .jobs
        .get(&job_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Unknown job".to_string()))?;
    Ok(Json(JobView {
        job_id,
        state: job.state(),
    }))
}

/// Cancel a running document job.
#[utoipa::path(
    delete,
    path = "/documents/jobs/{id}",
    params(("id" = Uuid, Path, description = "The job id returned by the upload.")),
    responses(
        (status = 204, description = "Cancellation requested"),
        (status = 404, description = "Unknown job")
    )
)]
pub async fn cancel_job_handler(
    State(app_state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let job = app_state
        .jobs
        .get(&job_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Unknown job".to_string()))?;
    job.cancel();
    info!(%job_id, "Document job cancellation requested");
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Notifications
//=========================================================================================

/// Drain the pending toasts.
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications since the last call, oldest first", body = Vec<NotificationView>)
    )
)]
pub async fn notifications_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<NotificationView>> {
    Json(
        app_state
            .notifications
            .drain()
            .into_iter()
            .map(NotificationView::from)
            .collect(),
    )
}
