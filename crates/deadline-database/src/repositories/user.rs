//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use deadline_core::result::AppResult;
use deadline_entity::notification::NotificationPreferences;
use deadline_entity::user::{User, UserSummary};

use super::db_error;
use crate::traits::UserDirectory;

const USER_COLUMNS: &str =
    "id, username, email, display_name, notification_preferences, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user", e))
    }

    async fn find_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, display_name FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load user summaries", e))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check email", e))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check username", e))
    }

    async fn get_notification_preferences(
        &self,
        id: Uuid,
    ) -> AppResult<Option<NotificationPreferences>> {
        let prefs = sqlx::query_scalar::<_, Json<NotificationPreferences>>(
            "SELECT notification_preferences FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load notification preferences", e))?;
        Ok(prefs.map(|p| p.0))
    }

    async fn update_notification_preferences(
        &self,
        id: Uuid,
        preferences: &NotificationPreferences,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET notification_preferences = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(Json(preferences))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update notification preferences", e))?;
        Ok(result.rows_affected() > 0)
    }
}
