//! Collaborator access row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role held on a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "collaborator_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorRole {
    Owner,
    Collaborator,
}

/// A user's access to a deadline.
///
/// This table is the only source of access. Every deadline carries
/// exactly one `owner` row matching its `owner_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeadlineCollaborator {
    pub deadline_id: Uuid,
    pub user_id: Uuid,
    pub role: CollaboratorRole,
    pub can_edit: bool,
    pub can_delete: bool,
    /// Who granted the access (`None` for owner rows).
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DeadlineCollaborator {
    pub fn is_owner(&self) -> bool {
        self.role == CollaboratorRole::Owner
    }
}

/// Data required to insert a collaborator row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollaborator {
    pub deadline_id: Uuid,
    pub user_id: Uuid,
    pub role: CollaboratorRole,
    pub can_edit: bool,
    pub can_delete: bool,
    pub added_by: Option<Uuid>,
}

impl NewCollaborator {
    /// A regular collaborator: may edit, may not delete.
    pub fn collaborator(deadline_id: Uuid, user_id: Uuid, added_by: Uuid) -> Self {
        Self {
            deadline_id,
            user_id,
            role: CollaboratorRole::Collaborator,
            can_edit: true,
            can_delete: false,
            added_by: Some(added_by),
        }
    }
}
