//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorResponse};
use crate::web::extract::ApiJson;
use crate::web::protocol::{
    ActionDetailsPayload, ActionResponse, CoachRequest, CoachResponse, CreateUserRequest,
    LogActionRequest, LogActionResponse, NextBadgeResponse, ProgressResponse,
    RecentActionsQuery, RecommendationsResponse, UserResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use eco_tracker_core::actions;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

/// The header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_user_handler,
        get_progress_handler,
        log_action_handler,
        list_actions_handler,
        recommendations_handler,
        coach_handler,
    ),
    components(
        schemas(
            CreateUserRequest,
            UserResponse,
            ProgressResponse,
            NextBadgeResponse,
            LogActionRequest,
            ActionDetailsPayload,
            LogActionResponse,
            ActionResponse,
            RecommendationsResponse,
            CoachRequest,
            CoachResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Eco Tracker API", description = "Log sustainable actions, track CO2e and points, and get coaching.")
    )
)]
pub struct ApiDoc;

/// The served and exported OpenAPI document, stamped with this crate's name and version.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Eco Tracker API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description =
        Some("Sustainable action logging, CO2e estimation, points, badges and coaching.".into());
    doc
}

/// Writes `api_doc()` as pretty JSON to `path`, creating missing parent
/// directories, and returns how many paths it documents.
pub fn write_api_doc(path: &Path) -> Result<usize, ApiError> {
    let doc = api_doc();
    let json = doc
        .to_pretty_json()
        .map_err(|e| ApiError::Internal(format!("Failed to render OpenAPI document: {}", e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(doc.paths.paths.len())
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Reads the caller's user id from the `x-user-id` header.
fn user_id_from(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(ApiError::Unauthenticated)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create the caller's profile, or return it unchanged if it already exists.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Profile created or already present", body = UserResponse),
        (status = 400, description = "Missing or invalid user header, or malformed body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn create_user_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = user_id_from(&headers)?;
    let user = actions::create_user(
        app_state.db.as_ref(),
        user_id,
        req.display_name.as_deref(),
        req.email.as_deref(),
    )
    .await?;

    info!("Profile ready for user {}", user_id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Current totals, points, badges and the next badge to earn.
#[utoipa::path(
    get,
    path = "/progress",
    responses(
        (status = 200, description = "Current progress", body = ProgressResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn get_progress_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ProgressResponse>, ApiError> {
    let user_id = user_id_from(&headers)?;
    let progress = actions::get_progress(app_state.db.as_ref(), user_id).await?;
    Ok(Json(ProgressResponse::from(&progress)))
}

/// Log a diet, travel or energy action and update the caller's progress.
#[utoipa::path(
    post,
    path = "/actions",
    request_body = LogActionRequest,
    responses(
        (status = 201, description = "Action logged", body = LogActionResponse),
        (status = 400, description = "Malformed body or invalid action details", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 502, description = "Storage failure", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn log_action_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<LogActionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = user_id_from(&headers)?;

    // Progress is read-modify-write; one update per user at a time.
    let _guard = app_state.user_locks.lock(user_id).await;
    let logged = actions::log_action(
        app_state.db.as_ref(),
        user_id,
        &req.category,
        req.details.into(),
    )
    .await?;

    info!(
        "Logged {} action for user {}: {:.2} kg CO2e, +{} points",
        logged.action.category, user_id, logged.action.co2e, logged.update.points_awarded
    );
    for badge in &logged.update.new_badges {
        info!("User {} unlocked badge '{}'", user_id, badge);
    }

    let response = LogActionResponse {
        success: true,
        progress: ProgressResponse::from(&logged.update.progress),
        points_awarded: logged.update.points_awarded,
        new_badges: logged.update.new_badges,
        action: ActionResponse::from(logged.action),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// The caller's most recent actions, newest first.
#[utoipa::path(
    get,
    path = "/actions",
    responses(
        (status = 200, description = "Recent actions", body = Vec<ActionResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user."),
        RecentActionsQuery
    )
)]
pub async fn list_actions_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RecentActionsQuery>,
) -> Result<Json<Vec<ActionResponse>>, ApiError> {
    let user_id = user_id_from(&headers)?;
    let limit = query.limit_or(app_state.config.recent_actions_limit);
    let recent = actions::list_recent_actions(app_state.db.as_ref(), user_id, limit).await?;
    Ok(Json(recent.into_iter().map(ActionResponse::from).collect()))
}

/// Personalized suggestions for reducing the caller's footprint.
#[utoipa::path(
    get,
    path = "/recommendations",
    responses(
        (status = 200, description = "Recommendations", body = RecommendationsResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 502, description = "Recommendation service failed", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn recommendations_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let user_id = user_id_from(&headers)?;
    let recommendations = actions::get_recommendations(
        app_state.db.as_ref(),
        app_state.recommendations_adapter.as_ref(),
        user_id,
        app_state.config.recent_actions_limit,
    )
    .await?;

    info!(
        "Generated {} recommendations for user {}",
        recommendations.len(),
        user_id
    );
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Ask the Eco-Coach a free-text question.
#[utoipa::path(
    post,
    path = "/coach",
    request_body = CoachRequest,
    responses(
        (status = 200, description = "Coach answer", body = CoachResponse),
        (status = 400, description = "Missing, empty or malformed query", body = ErrorResponse),
        (status = 502, description = "Coach service failed", body = ErrorResponse)
    )
)]
pub async fn coach_handler(
    State(app_state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CoachRequest>,
) -> Result<Json<CoachResponse>, ApiError> {
    let response =
        actions::get_coach_response(app_state.coach_adapter.as_ref(), &req.query).await?;
    Ok(Json(CoachResponse { response }))
}
