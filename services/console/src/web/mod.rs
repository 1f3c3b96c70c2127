pub mod auth;
pub mod resources;
pub mod rest;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use state::AppState;

const DEFAULT_ORIGIN: &str = "http://localhost:5173";
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the console's API router (without the Swagger UI).
pub fn router(app_state: Arc<AppState>) -> Router {
    let origin = HeaderValue::from_str(&app_state.config.cors_origin)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_ORIGIN));
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let session_routes = Router::new()
        .route("/auth/signin", post(auth::signin_handler))
        .route("/auth/signout", post(auth::signout_handler))
        .route("/session", get(auth::session_handler))
        .route("/notifications", get(rest::notifications_handler));

    let document_routes = Router::new()
        .route("/documents", post(rest::upload_document_handler))
        .route(
            "/documents/jobs/{id}",
            get(rest::get_job_handler).delete(rest::cancel_job_handler),
        );

    let resource_routes = Router::new()
        .route(
            "/bank-accounts",
            get(resources::list_bank_accounts).post(resources::connect_bank_account),
        )
        .route("/bank-accounts/{id}", delete(resources::remove_bank_account))
        .route("/bank-accounts/{id}/verify", post(resources::verify_bank_account))
        .route("/bank-accounts/{id}/transactions", get(resources::bank_transactions))
        .route("/bank-accounts/{id}/balance", get(resources::bank_balance))
        .route(
            "/invoices",
            get(resources::list_invoices).post(resources::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(resources::get_invoice).patch(resources::update_invoice),
        )
        .route("/invoices/{id}/{action}", post(resources::invoice_action))
        .route(
            "/counterparts",
            get(resources::list_counterparts).post(resources::create_counterpart),
        )
        .route("/counterparts/{id}", delete(resources::remove_counterpart))
        .route(
            "/entities",
            get(resources::list_entities).post(resources::create_entity),
        )
        .route("/entities/current", get(resources::current_entity))
        .route(
            "/entities/{id}",
            patch(resources::update_entity).delete(resources::remove_entity),
        )
        .route("/entities/{id}/status", put(resources::update_entity_status))
        .route("/entities/{id}/validate", get(resources::validate_entity))
        .route("/dashboard/metrics", get(resources::dashboard_metrics));

    Router::new()
        .merge(session_routes)
        .merge(document_routes)
        .merge(resource_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(app_state)
}
