pub mod extract;
pub mod protocol;
pub mod rest;
pub mod state;

pub use rest::{
    coach_handler, create_user_handler, get_progress_handler, list_actions_handler,
    log_action_handler, recommendations_handler,
};

use crate::error::ApiError;
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use rest::{api_doc, USER_ID_HEADER};
use state::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router: API routes, Swagger UI, CORS and request tracing.
pub fn router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
        ]);

    let api_router = Router::new()
        .route("/users", post(create_user_handler))
        .route("/progress", get(get_progress_handler))
        .route("/actions", post(log_action_handler).get(list_actions_handler))
        .route("/recommendations", get(recommendations_handler))
        .route("/coach", post(coach_handler))
        .layer(cors)
        .with_state(app_state);

    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc()))
        .layer(TraceLayer::new_for_http()))
}
