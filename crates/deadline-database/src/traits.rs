//! Persistence seams.
//!
//! Services depend on these traits rather than on concrete repositories so
//! the same logic runs against PostgreSQL and the in-memory store.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use deadline_core::result::AppResult;
use deadline_core::types::pagination::{PageRequest, PageResponse};
use deadline_entity::collaborator::{CopyRecord, DeadlineCollaborator, NewCollaborator};
use deadline_entity::deadline::{Deadline, NewDeadline, SentRecord};
use deadline_entity::friendship::FriendshipStatus;
use deadline_entity::notification::{NewNotification, Notification, NotificationPreferences};
use deadline_entity::user::{User, UserSummary};

#[async_trait]
pub trait DeadlineStore: Send + Sync + Debug {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deadline>>;

    /// Insert a deadline together with its owner collaborator row.
    async fn create(&self, deadline: &NewDeadline, now: DateTime<Utc>) -> AppResult<Deadline>;

    /// Insert a copy owned by the recipient, its owner row and the
    /// provenance record on the source, all or nothing.
    ///
    /// `copy.origin_deadline_id` must name the source deadline.
    async fn create_copy(
        &self,
        copy: &NewDeadline,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<(Deadline, CopyRecord)>;

    /// Persist the editable fields of `deadline`. The `rearm` marker keys are
    /// dropped from `notifications_sent` in the same statement; other markers
    /// are left as stored.
    async fn update(
        &self,
        deadline: &Deadline,
        rearm: &[&str],
        now: DateTime<Utc>,
    ) -> AppResult<Deadline>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Deadlines the user owns or collaborates on, ordered by due date.
    async fn list_accessible(&self, user_id: Uuid) -> AppResult<Vec<Deadline>>;

    /// Open deadlines due inside `[window_start, window_end]` without a
    /// delivery marker for `marker_key`.
    async fn find_due_for_reminder(
        &self,
        marker_key: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<Deadline>>;

    /// Flip every open deadline with `due_at < now` to overdue.
    async fn mark_overdue(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Overdue deadlines with `due_at` in `[since, now)`.
    async fn find_overdue_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Deadline>>;

    /// Set `notifications_sent[marker_key]` without touching other keys.
    async fn record_notification(
        &self,
        id: Uuid,
        marker_key: &str,
        record: &SentRecord,
    ) -> AppResult<()>;

    /// Users with at least one open deadline, or one completed inside
    /// `[day_start, day_end)`.
    async fn find_users_with_activity(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<Vec<Uuid>>;
}

#[async_trait]
pub trait CollaboratorStore: Send + Sync + Debug {
    async fn find(&self, deadline_id: Uuid, user_id: Uuid)
    -> AppResult<Option<DeadlineCollaborator>>;

    async fn list_for_deadline(&self, deadline_id: Uuid) -> AppResult<Vec<DeadlineCollaborator>>;

    /// Insert an access row. A duplicate `(deadline, user)` pair yields a
    /// `Conflict` error.
    async fn insert(
        &self,
        collaborator: &NewCollaborator,
        now: DateTime<Utc>,
    ) -> AppResult<DeadlineCollaborator>;

    async fn remove(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Copy records whose source is `deadline_id`.
    async fn list_copies(&self, deadline_id: Uuid) -> AppResult<Vec<CopyRecord>>;

    async fn find_copy_for_recipient(
        &self,
        deadline_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<CopyRecord>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync + Debug {
    async fn create(
        &self,
        notification: &NewNotification,
        now: DateTime<Utc>,
    ) -> AppResult<Notification>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>>;

    async fn count_unread(&self, user_id: Uuid) -> AppResult<u64>;

    /// Returns `false` when the notification does not exist or belongs to
    /// another user.
    async fn mark_read(&self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64>;

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Remove notifications past `expires_at`, and read ones created
    /// before `read_before`.
    async fn delete_expired(
        &self,
        now: DateTime<Utc>,
        read_before: DateTime<Utc>,
    ) -> AppResult<u64>;
}

/// Read access to accounts owned by the account service.
#[async_trait]
pub trait UserDirectory: Send + Sync + Debug {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    async fn get_notification_preferences(
        &self,
        id: Uuid,
    ) -> AppResult<Option<NotificationPreferences>>;

    /// Returns `false` when the user does not exist.
    async fn update_notification_preferences(
        &self,
        id: Uuid,
        preferences: &NotificationPreferences,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;
}

#[async_trait]
pub trait FriendshipDirectory: Send + Sync + Debug {
    /// Status of the friendship between `a` and `b` in either direction.
    async fn get_friendship_status(&self, a: Uuid, b: Uuid)
    -> AppResult<Option<FriendshipStatus>>;
}
