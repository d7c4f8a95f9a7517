//! Deadline entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::marker::{NotificationsSent, SentRecord};
use super::priority::DeadlinePriority;
use super::status::DeadlineStatus;

/// A dated task owned by one user and possibly shared with others.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deadline {
    /// Unique deadline identifier.
    pub id: Uuid,
    /// The owning user.
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub status: DeadlineStatus,
    pub priority: DeadlinePriority,
    /// The deadline this row was copied from, if it is a copy.
    pub origin_deadline_id: Option<Uuid>,
    /// Delivered notification kinds.
    pub notifications_sent: Json<NotificationsSent>,
    /// When the deadline was marked completed.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deadline {
    /// Whether this row was produced by copy-forking another deadline.
    pub fn is_copy(&self) -> bool {
        self.origin_deadline_id.is_some()
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// The delivery record for a notification kind.
    pub fn sent(&self, key: &str) -> Option<&SentRecord> {
        self.notifications_sent.0.get(key)
    }

    /// Past due and not completed, regardless of the stored status.
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now && !self.status.is_completed()
    }
}

/// Data required to insert a new deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeadline {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub status: DeadlineStatus,
    pub priority: DeadlinePriority,
    pub origin_deadline_id: Option<Uuid>,
}

/// Partial update of a deadline's user-editable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDeadline {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub due_at: Option<DateTime<Utc>>,
    pub status: Option<DeadlineStatus>,
    pub priority: Option<DeadlinePriority>,
}

impl UpdateDeadline {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_at.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}
