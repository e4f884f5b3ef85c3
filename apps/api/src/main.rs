//! Formwright API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use formwright_application::FormAssistService;
use formwright_core::AppError;
use formwright_infrastructure::OpenAiSchemaGenerator;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let generator = Arc::new(OpenAiSchemaGenerator::new(
        http_client,
        config.ai.base_url.clone(),
        config.ai.api_key.clone(),
        config.ai.model.clone(),
        config.ai.enabled,
    ));

    let form_assist_service =
        FormAssistService::new(config.ai.form_assist_policy()?).with_generator(generator);
    let limits = form_assist_service.limits();
    if !limits.ai_enabled {
        warn!("AI assistance is disabled; set AI_ENABLED and AI_API_KEY to enable it");
    }

    let shutdown = CancellationToken::new();
    let app_state = AppState {
        form_assist_service,
        shutdown: shutdown.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        ai_enabled = limits.ai_enabled,
        max_complexity = limits.max_complexity,
        model = %config.ai.model,
        "formwright-api listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(error = %error, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("formwright-api shutting down");
            shutdown.cancel();
        })
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
