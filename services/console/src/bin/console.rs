//! services/console/src/bin/console.rs

use std::sync::Arc;

use console_lib::{
    adapters::MoniteHttp,
    config::Config,
    error::ApiError,
    web::{router, rest::ApiDoc, state::AppState},
};
use axum::Router;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting console...");

    // --- 2. Build the Shared AppState ---
    let http = MoniteHttp::with_client(reqwest::Client::builder().build()?);
    let app_state = Arc::new(AppState::build(config.clone(), http));

    // --- 3. Bootstrap the Platform Session ---
    // A failed bootstrap is reported through /session and /notifications; the
    // server still starts so the user can retry by signing in.
    if app_state.session.mount().await.is_none() {
        warn!("Monite session not ready at startup");
    }

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(router(app_state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app_state.session.unmount().await;
    info!("Console stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
}
