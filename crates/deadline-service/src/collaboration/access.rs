//! Access resolution.
//!
//! Access comes from two places only: ownership of the deadline and a
//! collaborator row. Copy provenance never grants anything.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use deadline_core::error::AppError;
use deadline_core::result::AppResult;
use deadline_database::traits::{CollaboratorStore, DeadlineStore};
use deadline_entity::collaborator::DeadlineCollaborator;
use deadline_entity::deadline::Deadline;

/// Longest origin chain followed when looking for a root deadline.
const MAX_ORIGIN_DEPTH: usize = 32;

/// How a user came by their access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Owner,
    Collaborator,
}

/// A user's effective rights on one deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Access {
    pub level: AccessLevel,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Access {
    /// Full rights held by the owner.
    pub fn owner() -> Self {
        Self {
            level: AccessLevel::Owner,
            can_edit: true,
            can_delete: true,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.level == AccessLevel::Owner
    }

    /// Combine ownership with the stored row.
    pub fn resolve(
        deadline: &Deadline,
        user_id: Uuid,
        row: Option<&DeadlineCollaborator>,
    ) -> Option<Self> {
        if deadline.is_owned_by(user_id) {
            return Some(Self::owner());
        }
        row.filter(|r| r.user_id == user_id && r.deadline_id == deadline.id)
            .map(|r| Self {
                level: if r.is_owner() {
                    AccessLevel::Owner
                } else {
                    AccessLevel::Collaborator
                },
                can_edit: r.is_owner() || r.can_edit,
                can_delete: r.is_owner() || r.can_delete,
            })
    }
}

/// Resolves access and recipient sets for deadlines.
#[derive(Debug, Clone)]
pub struct AccessService {
    deadlines: Arc<dyn DeadlineStore>,
    collaborators: Arc<dyn CollaboratorStore>,
}

impl AccessService {
    /// Create a new access service.
    pub fn new(deadlines: Arc<dyn DeadlineStore>, collaborators: Arc<dyn CollaboratorStore>) -> Self {
        Self {
            deadlines,
            collaborators,
        }
    }

    /// Load a deadline or fail with `NotFound`.
    pub async fn load(&self, deadline_id: Uuid) -> AppResult<Deadline> {
        self.deadlines
            .find_by_id(deadline_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deadline {deadline_id} not found")))
    }

    /// The user's access to the deadline, or `None` when they have none.
    pub async fn resolve_access(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<Option<Access>> {
        let deadline = self.load(deadline_id).await?;
        self.access_to(&deadline, user_id).await
    }

    /// Same as [`resolve_access`](Self::resolve_access) for an already loaded deadline.
    pub async fn access_to(&self, deadline: &Deadline, user_id: Uuid) -> AppResult<Option<Access>> {
        if deadline.is_owned_by(user_id) {
            return Ok(Some(Access::owner()));
        }
        let row = self.collaborators.find(deadline.id, user_id).await?;
        Ok(Access::resolve(deadline, user_id, row.as_ref()))
    }

    /// Whether the user may edit the deadline. `NotFound` if it is missing.
    pub async fn can_edit(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .resolve_access(deadline_id, user_id)
            .await?
            .map(|a| a.can_edit)
            .unwrap_or(false))
    }

    /// Whether the user may delete the deadline. `NotFound` if it is missing.
    pub async fn can_delete(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .resolve_access(deadline_id, user_id)
            .await?
            .map(|a| a.can_delete)
            .unwrap_or(false))
    }

    /// Load a deadline the user can see. Strangers get `NotFound`.
    pub async fn require_view(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<(Deadline, Access)> {
        let deadline = self.load(deadline_id).await?;
        match self.access_to(&deadline, user_id).await? {
            Some(access) => Ok((deadline, access)),
            None => Err(AppError::not_found(format!("Deadline {deadline_id} not found"))),
        }
    }

    /// Load a deadline the user may edit.
    pub async fn require_edit(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<(Deadline, Access)> {
        let deadline = self.load(deadline_id).await?;
        match self.access_to(&deadline, user_id).await? {
            Some(access) if access.can_edit => Ok((deadline, access)),
            _ => Err(AppError::authorization(
                "You do not have permission to edit this deadline",
            )),
        }
    }

    /// Load a deadline the user may delete.
    pub async fn require_delete(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<(Deadline, Access)> {
        let deadline = self.load(deadline_id).await?;
        match self.access_to(&deadline, user_id).await? {
            Some(access) if access.can_delete => Ok((deadline, access)),
            _ => Err(AppError::authorization(
                "You do not have permission to delete this deadline",
            )),
        }
    }

    /// Everyone who should hear about the deadline: the owner first, then
    /// each collaborator row. Copy holders are not included.
    pub async fn recipients(&self, deadline: &Deadline) -> AppResult<Vec<Uuid>> {
        let rows = self.collaborators.list_for_deadline(deadline.id).await?;
        let mut seen = HashSet::with_capacity(rows.len() + 1);
        let mut recipients = Vec::with_capacity(rows.len() + 1);
        seen.insert(deadline.owner_id);
        recipients.push(deadline.owner_id);
        for row in rows {
            if seen.insert(row.user_id) {
                recipients.push(row.user_id);
            }
        }
        Ok(recipients)
    }

    /// Follow `origin_deadline_id` back to the deadline that started the chain.
    ///
    /// Stops at a missing origin, a repeated id or after a bounded number of
    /// hops, returning the last deadline reached.
    pub async fn resolve_root(&self, deadline: &Deadline) -> AppResult<Deadline> {
        let mut current = deadline.clone();
        let mut visited = HashSet::from([current.id]);
        for _ in 0..MAX_ORIGIN_DEPTH {
            let Some(origin_id) = current.origin_deadline_id else {
                break;
            };
            if !visited.insert(origin_id) {
                tracing::warn!(deadline_id = %deadline.id, "Origin chain contains a cycle");
                break;
            }
            match self.deadlines.find_by_id(origin_id).await? {
                Some(origin) => current = origin,
                None => break,
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use deadline_entity::collaborator::CollaboratorRole;
    use deadline_entity::deadline::{DeadlinePriority, DeadlineStatus, NotificationsSent};
    use sqlx::types::Json;

    fn deadline(owner_id: Uuid) -> Deadline {
        let now = Utc::now();
        Deadline {
            id: Uuid::new_v4(),
            owner_id,
            title: "Grant proposal".to_string(),
            description: None,
            due_at: now,
            status: DeadlineStatus::Pending,
            priority: DeadlinePriority::Medium,
            origin_deadline_id: None,
            notifications_sent: Json(NotificationsSent::default()),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn row(deadline: &Deadline, user_id: Uuid, can_edit: bool, can_delete: bool) -> DeadlineCollaborator {
        DeadlineCollaborator {
            deadline_id: deadline.id,
            user_id,
            role: CollaboratorRole::Collaborator,
            can_edit,
            can_delete,
            added_by: Some(deadline.owner_id),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_has_full_access() {
        let owner = Uuid::new_v4();
        let d = deadline(owner);
        assert_eq!(Access::resolve(&d, owner, None), Some(Access::owner()));
    }

    #[test]
    fn test_row_flags_are_used() {
        let d = deadline(Uuid::new_v4());
        let user = Uuid::new_v4();
        let access = Access::resolve(&d, user, Some(&row(&d, user, true, false))).unwrap();
        assert_eq!(access.level, AccessLevel::Collaborator);
        assert!(access.can_edit);
        assert!(!access.can_delete);
    }

    #[test]
    fn test_stranger_has_no_access() {
        let d = deadline(Uuid::new_v4());
        assert_eq!(Access::resolve(&d, Uuid::new_v4(), None), None);
    }

    #[test]
    fn test_row_for_another_user_is_ignored() {
        let d = deadline(Uuid::new_v4());
        let other = Uuid::new_v4();
        let r = row(&d, other, true, true);
        assert_eq!(Access::resolve(&d, Uuid::new_v4(), Some(&r)), None);
    }

    #[tokio::test]
    async fn test_edit_and_delete_rights_by_relationship() {
        use deadline_core::error::ErrorKind;

        use crate::collaboration::{AddCollaboratorsOptions, CopyOptions};
        use crate::testkit::Harness;

        let h = Harness::new();
        let owner = h.user("owner");
        let direct = h.user("direct");
        let copied = h.user("copied");
        let stranger = h.user("stranger");
        h.befriend(&owner, &direct);
        h.befriend(&owner, &copied);
        let d = h.deadline(&owner, "Grant proposal").await;
        h.add_direct(&owner, d.id, &direct).await;
        h.collaboration
            .add_collaborators(
                &owner,
                d.id,
                &[copied.user_id],
                &AddCollaboratorsOptions {
                    create_copies: true,
                    copy_options: CopyOptions::default(),
                },
            )
            .await
            .unwrap();

        assert!(h.access.can_edit(d.id, owner.user_id).await.unwrap());
        assert!(h.access.can_delete(d.id, owner.user_id).await.unwrap());
        assert!(h.access.can_edit(d.id, direct.user_id).await.unwrap());
        assert!(!h.access.can_delete(d.id, direct.user_id).await.unwrap());
        for user in [&copied, &stranger] {
            assert!(!h.access.can_edit(d.id, user.user_id).await.unwrap());
            assert!(!h.access.can_delete(d.id, user.user_id).await.unwrap());
        }

        let err = h.access.can_edit(Uuid::new_v4(), owner.user_id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
