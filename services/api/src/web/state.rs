//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use eco_tracker_core::ports::{CoachService, DatabaseService, RecommendationService};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub recommendations_adapter: Arc<dyn RecommendationService>,
    pub coach_adapter: Arc<dyn CoachService>,
    pub user_locks: UserLocks,
}

impl AppState {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        config: Arc<Config>,
        recommendations_adapter: Arc<dyn RecommendationService>,
        coach_adapter: Arc<dyn CoachService>,
    ) -> Self {
        Self {
            db,
            config,
            recommendations_adapter,
            coach_adapter,
            user_locks: UserLocks::default(),
        }
    }
}

//=========================================================================================
// Per-User Write Serialization
//=========================================================================================

type LockMap = HashMap<Uuid, Arc<Mutex<()>>>;

/// One async mutex per user, so progress updates for a user are applied one
/// at a time within this process. An entry lives only while some request
/// holds or waits on it.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<StdMutex<LockMap>>,
}

impl UserLocks {
    /// Waits until no other request holds `user_id`'s lock.
    pub async fn lock(&self, user_id: Uuid) -> UserLockGuard {
        let user_lock = lock_map(&self.inner).entry(user_id).or_default().clone();
        let guard = user_lock.lock_owned().await;
        UserLockGuard {
            user_id,
            locks: self.inner.clone(),
            guard: Some(guard),
        }
    }

    /// Number of users with a live lock entry.
    pub fn tracked(&self) -> usize {
        lock_map(&self.inner).len()
    }
}

/// Holds one user's lock. Dropping it releases the lock and forgets the
/// user once nobody else is waiting.
pub struct UserLockGuard {
    user_id: Uuid,
    locks: Arc<StdMutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        let mut locks = lock_map(&self.locks);
        // Release first so our own reference no longer counts.
        drop(self.guard.take());
        let idle = locks
            .get(&self.user_id)
            .is_some_and(|user_lock| Arc::strong_count(user_lock) == 1);
        if idle {
            locks.remove(&self.user_id);
        }
    }
}

// No map edit can panic halfway, so a poisoned map is still consistent.
fn lock_map(locks: &StdMutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}
