//! crates/eco_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or AI APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Action, EcoUser, UserProgress};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A transient failure the caller may surface and let the user retry.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---

    /// Creates the profile if absent and returns the stored one either way.
    async fn create_user(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> PortResult<EcoUser>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<EcoUser>;

    async fn get_user_progress(&self, user_id: Uuid) -> PortResult<UserProgress>;

    async fn save_user_progress(&self, user_id: Uuid, progress: &UserProgress) -> PortResult<()>;

    // --- Action Management ---
    async fn append_action(&self, action: &Action) -> PortResult<()>;

    /// Returns at most `count` actions, most recent first.
    async fn list_recent_actions(&self, user_id: Uuid, count: usize) -> PortResult<Vec<Action>>;
}

/// Everything the recommender is told about a user.
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub user_id: Uuid,
    pub total_co2e: f64,
    pub points: u64,
    pub badges: Vec<String>,
    pub actions: Vec<Action>,
}

#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Produces an ordered list of personalized suggestions.
    async fn recommend(&self, request: &RecommendationRequest) -> PortResult<Vec<String>>;
}

#[async_trait]
pub trait CoachService: Send + Sync {
    /// Answers a free-text sustainability question.
    async fn answer_query(&self, query: &str) -> PortResult<String>;
}
