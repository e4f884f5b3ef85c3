use axum::Router;
use axum::routing::{get, post};
use formwright_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let ai_routes = Router::new()
        .route(
            "/ai/form-assist",
            post(handlers::form_assist::form_assist_handler),
        )
        .route(
            "/ai/validate-schema",
            post(handlers::form_assist::validate_schema_handler),
        )
        .route("/ai/limits", get(handlers::form_assist::limits_handler));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(ai_routes)
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
