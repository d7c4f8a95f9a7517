//! Read-only collaborator listing.
//!
//! Built on demand from collaborator rows and copy records; never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::copy::CopyRecord;
use super::model::{CollaboratorRole, DeadlineCollaborator};
use crate::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorEntryKind {
    Owner,
    Collaborator,
    /// The user holds a copy of this deadline and has no access to it.
    CopyCollaborator,
}

/// One line of the collaborator listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorEntry {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub kind: CollaboratorEntryKind,
    pub can_edit: bool,
    pub can_delete: bool,
    pub has_copy: bool,
    pub copy_deadline_id: Option<Uuid>,
    pub added_by: Option<Uuid>,
    pub added_at: DateTime<Utc>,
}

impl CollaboratorEntry {
    pub fn from_row(row: &DeadlineCollaborator, user: Option<&UserSummary>) -> Self {
        Self {
            user_id: row.user_id,
            username: user.map(|u| u.username.clone()),
            display_name: user.and_then(|u| u.display_name.clone()),
            kind: match row.role {
                CollaboratorRole::Owner => CollaboratorEntryKind::Owner,
                CollaboratorRole::Collaborator => CollaboratorEntryKind::Collaborator,
            },
            can_edit: row.can_edit,
            can_delete: row.can_delete,
            has_copy: false,
            copy_deadline_id: None,
            added_by: row.added_by,
            added_at: row.created_at,
        }
    }

    pub fn from_copy(record: &CopyRecord, user: Option<&UserSummary>) -> Self {
        Self {
            user_id: record.recipient_id,
            username: user.map(|u| u.username.clone()),
            display_name: user.and_then(|u| u.display_name.clone()),
            kind: CollaboratorEntryKind::CopyCollaborator,
            can_edit: false,
            can_delete: false,
            has_copy: true,
            copy_deadline_id: Some(record.copy_deadline_id),
            added_by: Some(record.created_by),
            added_at: record.created_at,
        }
    }

    pub fn grants_access(&self) -> bool {
        self.kind != CollaboratorEntryKind::CopyCollaborator
    }
}
