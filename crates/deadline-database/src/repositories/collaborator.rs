//! Collaborator and copy-provenance repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deadline_core::result::AppResult;
use deadline_entity::collaborator::{CopyRecord, DeadlineCollaborator, NewCollaborator};

use super::db_error;
use crate::traits::CollaboratorStore;

#[derive(Debug, Clone)]
pub struct CollaboratorRepository {
    pool: PgPool,
}

impl CollaboratorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollaboratorStore for CollaboratorRepository {
    async fn find(
        &self,
        deadline_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<DeadlineCollaborator>> {
        sqlx::query_as::<_, DeadlineCollaborator>(
            "SELECT * FROM deadline_collaborators WHERE deadline_id = $1 AND user_id = $2",
        )
        .bind(deadline_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find collaborator", e))
    }

    async fn list_for_deadline(&self, deadline_id: Uuid) -> AppResult<Vec<DeadlineCollaborator>> {
        sqlx::query_as::<_, DeadlineCollaborator>(
            "SELECT * FROM deadline_collaborators WHERE deadline_id = $1 \
             ORDER BY (role = 'owner') DESC, created_at ASC",
        )
        .bind(deadline_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list collaborators", e))
    }

    async fn insert(
        &self,
        collaborator: &NewCollaborator,
        now: DateTime<Utc>,
    ) -> AppResult<DeadlineCollaborator> {
        sqlx::query_as::<_, DeadlineCollaborator>(
            "INSERT INTO deadline_collaborators (deadline_id, user_id, role, can_edit, can_delete, added_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(collaborator.deadline_id)
        .bind(collaborator.user_id)
        .bind(collaborator.role)
        .bind(collaborator.can_edit)
        .bind(collaborator.can_delete)
        .bind(collaborator.added_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to add collaborator", e))
    }

    async fn remove(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM deadline_collaborators \
             WHERE deadline_id = $1 AND user_id = $2 AND role <> 'owner'",
        )
        .bind(deadline_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to remove collaborator", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_copies(&self, deadline_id: Uuid) -> AppResult<Vec<CopyRecord>> {
        sqlx::query_as::<_, CopyRecord>(
            "SELECT * FROM deadline_copies WHERE source_deadline_id = $1 ORDER BY created_at ASC",
        )
        .bind(deadline_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list deadline copies", e))
    }

    async fn find_copy_for_recipient(
        &self,
        deadline_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<CopyRecord>> {
        sqlx::query_as::<_, CopyRecord>(
            "SELECT * FROM deadline_copies WHERE source_deadline_id = $1 AND recipient_id = $2",
        )
        .bind(deadline_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find deadline copy", e))
    }
}
