//! Friendship lookups.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use deadline_core::result::AppResult;
use deadline_entity::friendship::FriendshipStatus;

use super::db_error;
use crate::traits::FriendshipDirectory;

#[derive(Debug, Clone)]
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipDirectory for FriendshipRepository {
    async fn get_friendship_status(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> AppResult<Option<FriendshipStatus>> {
        sqlx::query_scalar::<_, FriendshipStatus>(
            "SELECT status FROM friendships \
             WHERE (requester_id = $1 AND addressee_id = $2) \
                OR (requester_id = $2 AND addressee_id = $1) \
             LIMIT 1",
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to look up friendship", e))
    }
}
