//! Deadline repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deadline_core::result::AppResult;
use deadline_entity::collaborator::CopyRecord;
use deadline_entity::deadline::{Deadline, NewDeadline, SentRecord};

use super::db_error;
use crate::traits::DeadlineStore;

/// Inserts the deadline and its owner row in one statement.
const INSERT_WITH_OWNER: &str = "\
    WITH inserted AS ( \
        INSERT INTO deadlines (id, owner_id, title, description, due_at, status, priority, \
                               origin_deadline_id, notifications_sent, created_at, updated_at) \
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '{}'::jsonb, $9, $9) \
        RETURNING * \
    ), owner_row AS ( \
        INSERT INTO deadline_collaborators (deadline_id, user_id, role, can_edit, can_delete, added_by, created_at) \
        SELECT id, owner_id, 'owner', TRUE, TRUE, NULL, created_at FROM inserted \
    ) \
    SELECT * FROM inserted";

/// Repository for deadlines.
#[derive(Debug, Clone)]
pub struct DeadlineRepository {
    pool: PgPool,
}

impl DeadlineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeadlineStore for DeadlineRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deadline>> {
        sqlx::query_as::<_, Deadline>("SELECT * FROM deadlines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find deadline", e))
    }

    async fn create(&self, deadline: &NewDeadline, now: DateTime<Utc>) -> AppResult<Deadline> {
        sqlx::query_as::<_, Deadline>(INSERT_WITH_OWNER)
            .bind(deadline.id)
            .bind(deadline.owner_id)
            .bind(&deadline.title)
            .bind(&deadline.description)
            .bind(deadline.due_at)
            .bind(deadline.status)
            .bind(deadline.priority)
            .bind(deadline.origin_deadline_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create deadline", e))
    }

    async fn create_copy(
        &self,
        copy: &NewDeadline,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<(Deadline, CopyRecord)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin copy transaction", e))?;

        let deadline = sqlx::query_as::<_, Deadline>(INSERT_WITH_OWNER)
            .bind(copy.id)
            .bind(copy.owner_id)
            .bind(&copy.title)
            .bind(&copy.description)
            .bind(copy.due_at)
            .bind(copy.status)
            .bind(copy.priority)
            .bind(copy.origin_deadline_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to insert deadline copy", e))?;

        let record = sqlx::query_as::<_, CopyRecord>(
            "INSERT INTO deadline_copies (id, source_deadline_id, copy_deadline_id, recipient_id, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(copy.origin_deadline_id)
        .bind(deadline.id)
        .bind(copy.owner_id)
        .bind(created_by)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to record deadline copy", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit deadline copy", e))?;
        Ok((deadline, record))
    }

    async fn update(
        &self,
        deadline: &Deadline,
        rearm: &[&str],
        now: DateTime<Utc>,
    ) -> AppResult<Deadline> {
        let rearm: Vec<String> = rearm.iter().map(|key| key.to_string()).collect();
        sqlx::query_as::<_, Deadline>(
            "UPDATE deadlines SET title = $2, description = $3, due_at = $4, status = $5, \
             priority = $6, completed_at = $7, updated_at = $8, \
             notifications_sent = notifications_sent - $9::text[] \
             WHERE id = $1 RETURNING *",
        )
        .bind(deadline.id)
        .bind(&deadline.title)
        .bind(&deadline.description)
        .bind(deadline.due_at)
        .bind(deadline.status)
        .bind(deadline.priority)
        .bind(deadline.completed_at)
        .bind(now)
        .bind(&rearm)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update deadline", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM deadlines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete deadline", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_accessible(&self, user_id: Uuid) -> AppResult<Vec<Deadline>> {
        sqlx::query_as::<_, Deadline>(
            "SELECT d.* FROM deadlines d \
             JOIN deadline_collaborators c ON c.deadline_id = d.id \
             WHERE c.user_id = $1 ORDER BY d.due_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list deadlines", e))
    }

    async fn find_due_for_reminder(
        &self,
        marker_key: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<Deadline>> {
        sqlx::query_as::<_, Deadline>(
            "SELECT * FROM deadlines \
             WHERE due_at BETWEEN $1 AND $2 \
               AND status IN ('pending', 'in_progress') \
               AND notifications_sent -> $3 IS NULL \
             ORDER BY due_at ASC",
        )
        .bind(window_start)
        .bind(window_end)
        .bind(marker_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find deadlines due for reminder", e))
    }

    async fn mark_overdue(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE deadlines SET status = 'overdue', updated_at = $1 \
             WHERE due_at < $1 AND status IN ('pending', 'in_progress')",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark overdue deadlines", e))?;
        Ok(result.rows_affected())
    }

    async fn find_overdue_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Deadline>> {
        sqlx::query_as::<_, Deadline>(
            "SELECT * FROM deadlines \
             WHERE status = 'overdue' AND due_at >= $1 AND due_at < $2 \
             ORDER BY due_at ASC",
        )
        .bind(since)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find overdue deadlines", e))
    }

    async fn record_notification(
        &self,
        id: Uuid,
        marker_key: &str,
        record: &SentRecord,
    ) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        sqlx::query(
            "UPDATE deadlines \
             SET notifications_sent = jsonb_set(notifications_sent, ARRAY[$2::text], $3::jsonb, true) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(marker_key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record notification marker", e))?;
        Ok(())
    }

    async fn find_users_with_activity(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT c.user_id FROM deadline_collaborators c \
             JOIN deadlines d ON d.id = c.deadline_id \
             WHERE d.status <> 'completed' \
                OR (d.completed_at >= $1 AND d.completed_at < $2)",
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find users with activity", e))
    }
}
