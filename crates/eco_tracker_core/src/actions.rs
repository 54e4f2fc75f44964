//! crates/eco_tracker_core/src/actions.rs
//!
//! The caller-facing operations. Each one takes its collaborators as explicit
//! port handles and turns every failure into an `ActionError` whose display
//! text is safe to show to the user.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Action, ActionDetails, DetailFields, EcoUser, UserProgress, ValidationError};
use crate::estimator::estimate_co2e;
use crate::ports::{
    CoachService, DatabaseService, PortError, RecommendationRequest, RecommendationService,
};
use crate::progress::{apply_action, ProgressError, ProgressUpdate};

/// How many recent actions the recommender sees unless told otherwise.
pub const DEFAULT_RECENT_ACTIONS: usize = 10;

/// Failures of the action surface. `Display` is the user-visible message.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Invalid action: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid action: {0}")]
    Progress(#[from] ProgressError),
    #[error("User not found.")]
    UserNotFound,
    #[error("Query cannot be empty.")]
    EmptyQuery,
    #[error("Failed to log action: {0}")]
    Persistence(PortError),
    #[error("Failed to get personalized recommendations: {0}")]
    Recommendation(PortError),
    #[error("Failed to get a response from the Eco-Coach. Please try again.")]
    Coach(PortError),
}

impl ActionError {
    fn from_lookup(err: PortError) -> Self {
        match err {
            PortError::NotFound(_) => ActionError::UserNotFound,
            other => ActionError::Persistence(other),
        }
    }
}

/// What a successful `log_action` hands back to the caller.
#[derive(Debug, Clone)]
pub struct LoggedAction {
    pub action: Action,
    pub update: ProgressUpdate,
}

/// Validates, estimates and records one action, then folds it into the user's progress.
///
/// The user is read and the new progress computed before anything is written,
/// so a missing user or a rejected update never leaves an orphaned action behind. Updates for the same user are read-modify-write
/// and must be serialized by the caller.
pub async fn log_action(
    db: &dyn DatabaseService,
    user_id: Uuid,
    category: &str,
    fields: DetailFields,
) -> Result<LoggedAction, ActionError> {
    let details = ActionDetails::parse(category, fields)?;
    let co2e = estimate_co2e(&details);

    let current = db
        .get_user_progress(user_id)
        .await
        .map_err(ActionError::from_lookup)?;

    let update = apply_action(&current, co2e)?;

    let action = Action {
        id: Uuid::new_v4(),
        user_id,
        category: details.category(),
        description: details.describe(),
        co2e,
        timestamp: Utc::now(),
    };
    db.append_action(&action)
        .await
        .map_err(ActionError::Persistence)?;
    db.save_user_progress(user_id, &update.progress)
        .await
        .map_err(ActionError::Persistence)?;

    Ok(LoggedAction { action, update })
}

/// Asks the recommender for suggestions based on the user's totals and recent actions.
pub async fn get_recommendations(
    db: &dyn DatabaseService,
    recommender: &dyn RecommendationService,
    user_id: Uuid,
    recent_limit: usize,
) -> Result<Vec<String>, ActionError> {
    let user = db.get_user(user_id).await.map_err(|e| match e {
        PortError::NotFound(_) => ActionError::UserNotFound,
        other => ActionError::Recommendation(other),
    })?;
    let actions = db
        .list_recent_actions(user_id, recent_limit)
        .await
        .map_err(ActionError::Recommendation)?;

    let request = RecommendationRequest {
        user_id: user.user_id,
        total_co2e: user.progress.total_co2e,
        points: user.progress.points,
        badges: user.progress.badges.into_iter().collect(),
        actions,
    };
    recommender
        .recommend(&request)
        .await
        .map_err(ActionError::Recommendation)
}

/// Forwards a free-text question to the Eco-Coach.
pub async fn get_coach_response(
    coach: &dyn CoachService,
    query: &str,
) -> Result<String, ActionError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ActionError::EmptyQuery);
    }
    coach.answer_query(query).await.map_err(ActionError::Coach)
}

// --- Thin read/write helpers used by the HTTP layer ---

pub async fn create_user(
    db: &dyn DatabaseService,
    user_id: Uuid,
    display_name: Option<&str>,
    email: Option<&str>,
) -> Result<EcoUser, ActionError> {
    db.create_user(user_id, display_name, email)
        .await
        .map_err(ActionError::Persistence)
}

pub async fn get_progress(
    db: &dyn DatabaseService,
    user_id: Uuid,
) -> Result<UserProgress, ActionError> {
    db.get_user_progress(user_id)
        .await
        .map_err(ActionError::from_lookup)
}

pub async fn list_recent_actions(
    db: &dyn DatabaseService,
    user_id: Uuid,
    limit: usize,
) -> Result<Vec<Action>, ActionError> {
    db.get_user(user_id).await.map_err(ActionError::from_lookup)?;
    db.list_recent_actions(user_id, limit)
        .await
        .map_err(ActionError::Persistence)
}
