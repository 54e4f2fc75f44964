//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eco_tracker_core::domain::{Action, ActionCategory, EcoUser, UserProgress};
use eco_tracker_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn user_not_found(user_id: Uuid) -> PortError {
    PortError::NotFound(format!("User {} not found", user_id))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    display_name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    total_co2e: f64,
    points: i64,
    badges: Vec<String>,
}
impl UserRecord {
    fn to_domain(self) -> EcoUser {
        EcoUser {
            user_id: self.user_id,
            display_name: self.display_name,
            email: self.email,
            created_at: self.created_at,
            progress: UserProgress {
                total_co2e: self.total_co2e,
                points: u64::try_from(self.points).unwrap_or_default(),
                badges: self.badges.into_iter().collect(),
            },
        }
    }
}

#[derive(FromRow)]
struct ActionRecord {
    id: Uuid,
    user_id: Uuid,
    category: String,
    description: String,
    co2e: f64,
    created_at: DateTime<Utc>,
}
impl ActionRecord {
    fn to_domain(self) -> PortResult<Action> {
        let category = self
            .category
            .parse::<ActionCategory>()
            .map_err(|e| PortError::Unexpected(format!("Action {}: {}", self.id, e)))?;
        Ok(Action {
            id: self.id,
            user_id: self.user_id,
            category,
            description: self.description,
            co2e: self.co2e,
            timestamp: self.created_at,
        })
    }
}

const USER_COLUMNS: &str = "user_id, display_name, email, created_at, total_co2e, points, badges";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> PortResult<EcoUser> {
        sqlx::query(
            "INSERT INTO users (user_id, display_name, email) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(display_name)
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        self.get_user(user_id).await
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<EcoUser> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| user_not_found(user_id))?;

        Ok(record.to_domain())
    }

    async fn get_user_progress(&self, user_id: Uuid) -> PortResult<UserProgress> {
        Ok(self.get_user(user_id).await?.progress)
    }

    async fn save_user_progress(&self, user_id: Uuid, progress: &UserProgress) -> PortResult<()> {
        let points = i64::try_from(progress.points)
            .map_err(|_| PortError::Unexpected(format!("Points overflow for user {}", user_id)))?;
        let badges: Vec<String> = progress.badges.iter().cloned().collect();

        let result = sqlx::query(
            "UPDATE users SET total_co2e = $1, points = $2, badges = $3 WHERE user_id = $4",
        )
        .bind(progress.total_co2e)
        .bind(points)
        .bind(badges)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }
        Ok(())
    }

    async fn append_action(&self, action: &Action) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO actions (id, user_id, category, description, co2e, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(action.id)
        .bind(action.user_id)
        .bind(action.category.as_str())
        .bind(&action.description)
        .bind(action.co2e)
        .bind(action.timestamp)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn list_recent_actions(&self, user_id: Uuid, count: usize) -> PortResult<Vec<Action>> {
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let records = sqlx::query_as::<_, ActionRecord>(
            "SELECT id, user_id, category, description, co2e, created_at FROM actions \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }
}
