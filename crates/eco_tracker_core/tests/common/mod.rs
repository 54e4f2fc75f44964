#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use eco_tracker_core::{
    Action, CoachService, DatabaseService, EcoUser, PortError, PortResult, RecommendationRequest,
    RecommendationService, UserProgress,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A map-backed `DatabaseService` with switchable write failures.
#[derive(Default)]
pub struct FakeDb {
    pub users: Mutex<HashMap<Uuid, EcoUser>>,
    pub actions: Mutex<Vec<Action>>,
    pub fail_writes: AtomicBool,
}

impl FakeDb {
    pub async fn with_user(user_id: Uuid, progress: UserProgress) -> Self {
        let db = FakeDb::default();
        db.users.lock().await.insert(
            user_id,
            EcoUser {
                user_id,
                display_name: Some("Test User".into()),
                email: None,
                created_at: Utc::now(),
                progress,
            },
        );
        db
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writes(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for FakeDb {
    async fn create_user(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> PortResult<EcoUser> {
        self.check_writes()?;
        let mut users = self.users.lock().await;
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
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn get_user_progress(&self, user_id: Uuid) -> PortResult<UserProgress> {
        Ok(self.get_user(user_id).await?.progress)
    }

    async fn save_user_progress(&self, user_id: Uuid, progress: &UserProgress) -> PortResult<()> {
        self.check_writes()?;
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        user.progress = progress.clone();
        Ok(())
    }

    async fn append_action(&self, action: &Action) -> PortResult<()> {
        self.check_writes()?;
        self.actions.lock().await.push(action.clone());
        Ok(())
    }

    async fn list_recent_actions(&self, user_id: Uuid, count: usize) -> PortResult<Vec<Action>> {
        let mut actions: Vec<Action> = self
            .actions
            .lock()
            .await
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        actions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        actions.truncate(count);
        Ok(actions)
    }
}

/// Records the last request and replies with canned recommendations or an error.
#[derive(Default)]
pub struct FakeRecommender {
    pub last_request: Mutex<Option<RecommendationRequest>>,
    pub fail: bool,
}

#[async_trait]
impl RecommendationService for FakeRecommender {
    async fn recommend(&self, request: &RecommendationRequest) -> PortResult<Vec<String>> {
        *self.last_request.lock().await = Some(request.clone());
        if self.fail {
            return Err(PortError::Unavailable("model timed out".into()));
        }
        Ok(vec![
            "Swap one beef meal for beans this week.".into(),
            "Take the bus for your commute on Fridays.".into(),
            "Air-dry a load of laundry.".into(),
        ])
    }
}

/// Echoes the query back, or fails.
#[derive(Default)]
pub struct FakeCoach {
    pub fail: bool,
}

#[async_trait]
impl CoachService for FakeCoach {
    async fn answer_query(&self, query: &str) -> PortResult<String> {
        if self.fail {
            return Err(PortError::Unexpected("upstream 500".into()));
        }
        Ok(format!("Great question about {query}!"))
    }
}
