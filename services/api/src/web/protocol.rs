//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use eco_tracker_core::{next_badge, Action, DetailFields, EcoUser, UserProgress};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Largest number of actions a single listing returns.
pub const MAX_ACTIONS_PAGE: usize = 50;

//=========================================================================================
// Requests FROM the Client
//=========================================================================================

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// A new action. `details` carries only the fields relevant to `category`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogActionRequest {
    /// One of `diet`, `travel` or `energy`.
    pub category: String,
    #[serde(default)]
    pub details: ActionDetailsPayload,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionDetailsPayload {
    pub meal_type: Option<String>,
    pub servings: Option<f64>,
    pub mode: Option<String>,
    pub distance: Option<f64>,
    pub action: Option<String>,
}

impl From<ActionDetailsPayload> for DetailFields {
    fn from(payload: ActionDetailsPayload) -> Self {
        DetailFields {
            meal_type: payload.meal_type,
            servings: payload.servings,
            mode: payload.mode,
            distance: payload.distance,
            action: payload.action,
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentActionsQuery {
    /// How many actions to return (1-50, default 10).
    pub limit: Option<usize>,
}

impl RecentActionsQuery {
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, MAX_ACTIONS_PAGE)
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CoachRequest {
    /// A missing query is treated like an empty one.
    #[serde(default)]
    pub query: String,
}

//=========================================================================================
// Responses TO the Client
//=========================================================================================

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextBadgeResponse {
    pub name: String,
    pub threshold: u64,
    pub points_needed: u64,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[serde(rename = "totalCO2e")]
    pub total_co2e: f64,
    pub points: u64,
    pub badges: Vec<String>,
    pub next_badge: Option<NextBadgeResponse>,
}

impl From<&UserProgress> for ProgressResponse {
    fn from(progress: &UserProgress) -> Self {
        ProgressResponse {
            total_co2e: progress.total_co2e,
            points: progress.points,
            badges: progress.badges.iter().cloned().collect(),
            next_badge: next_badge(progress.points).map(|(tier, points_needed)| {
                NextBadgeResponse {
                    name: tier.name.to_string(),
                    threshold: tier.threshold,
                    points_needed,
                }
            }),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub progress: ProgressResponse,
}

impl From<EcoUser> for UserResponse {
    fn from(user: EcoUser) -> Self {
        UserResponse {
            progress: ProgressResponse::from(&user.progress),
            user_id: user.user_id,
            display_name: user.display_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub co2e: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<Action> for ActionResponse {
    fn from(action: Action) -> Self {
        ActionResponse {
            id: action.id,
            category: action.category.to_string(),
            description: action.description,
            co2e: action.co2e,
            timestamp: action.timestamp,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogActionResponse {
    pub success: bool,
    pub action: ActionResponse,
    pub points_awarded: u64,
    /// Badges unlocked by this action.
    pub new_badges: Vec<String>,
    pub progress: ProgressResponse,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CoachResponse {
    pub response: String,
}
