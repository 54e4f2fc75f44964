//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. Used when no
//! database URL is configured, and by the HTTP tests.

use async_trait::async_trait;
use chrono::Utc;
use eco_tracker_core::domain::{Action, EcoUser, UserProgress};
use eco_tracker_core::ports::{DatabaseService, PortError, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryDbAdapter {
    users: RwLock<HashMap<Uuid, EcoUser>>,
    /// Per-user actions in insertion order.
    actions: RwLock<HashMap<Uuid, Vec<Action>>>,
}

impl InMemoryDbAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn user_not_found(user_id: Uuid) -> PortError {
    PortError::NotFound(format!("User {} not found", user_id))
}

#[async_trait]
impl DatabaseService for InMemoryDbAdapter {
    async fn create_user(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> PortResult<EcoUser> {
        let mut users = self.users.write().await;
        let user = users.entry(user_id).or_insert_with(|| EcoUser {
            user_id,
            display_name: display_name.map(str::to_string),
            email: email.map(str::to_string),
            created_at: Utc::now(),
            progress: UserProgress::default(),
        });
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<EcoUser> {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| user_not_found(user_id))
    }

    async fn get_user_progress(&self, user_id: Uuid) -> PortResult<UserProgress> {
        Ok(self.get_user(user_id).await?.progress)
    }

    async fn save_user_progress(&self, user_id: Uuid, progress: &UserProgress) -> PortResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| user_not_found(user_id))?;
        user.progress = progress.clone();
        Ok(())
    }

    async fn append_action(&self, action: &Action) -> PortResult<()> {
        if !self.users.read().await.contains_key(&action.user_id) {
            return Err(user_not_found(action.user_id));
        }
        self.actions
            .write()
            .await
            .entry(action.user_id)
            .or_default()
            .push(action.clone());
        Ok(())
    }

    async fn list_recent_actions(&self, user_id: Uuid, count: usize) -> PortResult<Vec<Action>> {
        let actions = self.actions.read().await;
        let mut recent: Vec<Action> = actions.get(&user_id).cloned().unwrap_or_default();
        // Reversed first so ties on timestamp stay newest-inserted first.
        recent.reverse();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(count);
        Ok(recent)
    }
}
