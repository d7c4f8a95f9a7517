//! Attaching, listing and removing collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use deadline_core::error::{AppError, ErrorKind};
use deadline_core::result::AppResult;
use deadline_core::traits::Clock;
use deadline_database::traits::{
    CollaboratorStore, DeadlineStore, FriendshipDirectory, UserDirectory,
};
use deadline_entity::collaborator::{CollaboratorEntry, NewCollaborator};
use deadline_entity::deadline::{Deadline, DeadlineStatus, NewDeadline};
use deadline_entity::notification::{NotificationKind, NotificationPriority};

use super::access::AccessService;
use super::outcome::{AddCollaboratorsOutcome, AddedCollaborator, SkipReason};
use crate::context::RequestContext;
use crate::deadline::MAX_TITLE_CHARS;
use crate::notifier::{InAppMessage, InAppNotifier};

/// Suffix marking a deadline as someone's private copy.
pub const COPY_SUFFIX: &str = " (My Copy)";

/// What to carry over when copy-forking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyOptions {
    #[serde(default = "default_true")]
    pub include_description: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            include_description: true,
        }
    }
}

/// Options for [`CollaborationService::add_collaborators`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCollaboratorsOptions {
    /// Give each candidate a private copy instead of access to this deadline.
    #[serde(default)]
    pub create_copies: bool,
    #[serde(default)]
    pub copy_options: CopyOptions,
}

fn default_true() -> bool {
    true
}

/// Title for a copy: the source title with the copy suffix, never doubled.
pub fn copy_title(title: &str) -> String {
    if title.ends_with(COPY_SUFFIX) {
        return title.to_string();
    }
    let room = MAX_TITLE_CHARS - COPY_SUFFIX.chars().count();
    let base: String = title.chars().take(room).collect();
    format!("{base}{COPY_SUFFIX}")
}

/// Sharing a deadline with friends, directly or as private copies.
#[derive(Debug, Clone)]
pub struct CollaborationService {
    access: Arc<AccessService>,
    deadlines: Arc<dyn DeadlineStore>,
    collaborators: Arc<dyn CollaboratorStore>,
    users: Arc<dyn UserDirectory>,
    friendships: Arc<dyn FriendshipDirectory>,
    in_app: Arc<dyn InAppNotifier>,
    clock: Arc<dyn Clock>,
}

impl CollaborationService {
    /// Create a new collaboration service.
    pub fn new(
        access: Arc<AccessService>,
        deadlines: Arc<dyn DeadlineStore>,
        collaborators: Arc<dyn CollaboratorStore>,
        users: Arc<dyn UserDirectory>,
        friendships: Arc<dyn FriendshipDirectory>,
        in_app: Arc<dyn InAppNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access,
            deadlines,
            collaborators,
            users,
            friendships,
            in_app,
            clock,
        }
    }

    /// Attach each candidate to the deadline, directly or through a copy.
    ///
    /// Fails only for an empty candidate list, a missing deadline or a
    /// requester without edit rights. Everything per-candidate is reported
    /// in the outcome.
    pub async fn add_collaborators(
        &self,
        ctx: &RequestContext,
        deadline_id: Uuid,
        candidates: &[Uuid],
        options: &AddCollaboratorsOptions,
    ) -> AppResult<AddCollaboratorsOutcome> {
        let requester_id = ctx.user_id;
        let mut seen = HashSet::with_capacity(candidates.len());
        let candidates: Vec<Uuid> = candidates
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if candidates.is_empty() {
            return Err(AppError::validation("At least one collaborator is required"));
        }

        let deadline = self.access.load(deadline_id).await?;
        if !self.access.can_edit(deadline.id, requester_id).await? {
            return Err(AppError::authorization(
                "You do not have permission to add collaborators to this deadline",
            ));
        }

        let root = if options.create_copies {
            Some(self.access.resolve_root(&deadline).await?)
        } else {
            None
        };
        let requester_name = self.display_name(requester_id).await;
        let mut outcome = AddCollaboratorsOutcome::default();

        for candidate in candidates {
            if let Some(reason) = self.screen(&deadline, requester_id, candidate).await? {
                debug!(deadline_id = %deadline.id, user_id = %candidate, reason = %reason, "Candidate skipped");
                outcome.skip(candidate, reason);
                continue;
            }

            match &root {
                Some(root) if candidate == root.owner_id && root.id != deadline.id => {
                    outcome.deny_root_owner(candidate);
                }
                Some(root) if candidate != root.owner_id => {
                    self.add_copy(&deadline, requester_id, candidate, options, &requester_name, &mut outcome)
                        .await?;
                }
                _ => {
                    self.add_direct(&deadline, requester_id, candidate, &requester_name, &mut outcome)
                        .await?;
                }
            }
        }

        info!(
            request_id = %ctx.request_id,
            deadline_id = %deadline.id,
            requester_id = %requester_id,
            added = outcome.added.len(),
            skipped = outcome.skipped.len(),
            denied = outcome.denied.len(),
            create_copies = options.create_copies,
            "Collaborators processed"
        );
        Ok(outcome)
    }

    /// Apply the skip rules in order. `None` means the candidate may proceed.
    async fn screen(
        &self,
        deadline: &Deadline,
        requester_id: Uuid,
        candidate: Uuid,
    ) -> AppResult<Option<SkipReason>> {
        if candidate == requester_id {
            return Ok(Some(SkipReason::SelfAdd));
        }
        if candidate == deadline.owner_id {
            return Ok(Some(SkipReason::AlreadyOwner));
        }
        if self.collaborators.find(deadline.id, candidate).await?.is_some() {
            return Ok(Some(SkipReason::AlreadyCollaborator));
        }
        if self.users.find_by_id(candidate).await?.is_none() {
            return Ok(Some(SkipReason::UserNotFound));
        }
        let friends = self
            .friendships
            .get_friendship_status(requester_id, candidate)
            .await?
            .map(|s| s.allows_collaboration())
            .unwrap_or(false);
        if !friends {
            return Ok(Some(SkipReason::NotFriends));
        }
        Ok(None)
    }

    async fn add_direct(
        &self,
        deadline: &Deadline,
        requester_id: Uuid,
        candidate: Uuid,
        requester_name: &str,
        outcome: &mut AddCollaboratorsOutcome,
    ) -> AppResult<()> {
        let row = NewCollaborator::collaborator(deadline.id, candidate, requester_id);
        match self.collaborators.insert(&row, self.clock.now()).await {
            Ok(_) => {}
            Err(e) if e.is(ErrorKind::Conflict) => {
                outcome.skip(candidate, SkipReason::AlreadyCollaborator);
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        outcome.added.push(AddedCollaborator {
            user_id: candidate,
            copy_id: None,
        });
        self.notify(InAppMessage {
            recipient: candidate,
            deadline_id: Some(deadline.id),
            kind: NotificationKind::CollaboratorAdded,
            title: "Added as collaborator".to_string(),
            message: format!("{requester_name} added you to \"{}\"", deadline.title),
            data: json!({ "deadline_id": deadline.id, "added_by": requester_id }),
            priority: NotificationPriority::Medium,
        })
        .await;
        Ok(())
    }

    async fn add_copy(
        &self,
        deadline: &Deadline,
        requester_id: Uuid,
        candidate: Uuid,
        options: &AddCollaboratorsOptions,
        requester_name: &str,
        outcome: &mut AddCollaboratorsOutcome,
    ) -> AppResult<()> {
        if self
            .collaborators
            .find_copy_for_recipient(deadline.id, candidate)
            .await?
            .is_some()
        {
            outcome.skip(candidate, SkipReason::AlreadyHasCopy);
            return Ok(());
        }

        let copy = NewDeadline {
            id: Uuid::new_v4(),
            owner_id: candidate,
            title: copy_title(&deadline.title),
            description: if options.copy_options.include_description {
                deadline.description.clone()
            } else {
                None
            },
            due_at: deadline.due_at,
            status: DeadlineStatus::Pending,
            priority: deadline.priority,
            origin_deadline_id: Some(deadline.id),
        };

        let (created, _record) = match self
            .deadlines
            .create_copy(&copy, requester_id, self.clock.now())
            .await
        {
            Ok(pair) => pair,
            Err(e) if e.is(ErrorKind::Conflict) => {
                outcome.skip(candidate, SkipReason::AlreadyHasCopy);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        info!(
            source_id = %deadline.id,
            copy_id = %created.id,
            recipient_id = %candidate,
            "Deadline copy created"
        );
        outcome.added.push(AddedCollaborator {
            user_id: candidate,
            copy_id: Some(created.id),
        });
        self.notify(InAppMessage {
            recipient: candidate,
            deadline_id: Some(created.id),
            kind: NotificationKind::Shared,
            title: "Deadline shared with you".to_string(),
            message: format!("{requester_name} shared \"{}\" with you", deadline.title),
            data: json!({
                "deadline_id": created.id,
                "source_deadline_id": deadline.id,
                "shared_by": requester_id,
            }),
            priority: created.priority.into(),
        })
        .await;
        Ok(())
    }

    /// The collaborator listing: access rows followed by copy holders.
    pub async fn list_collaborators(
        &self,
        ctx: &RequestContext,
        deadline_id: Uuid,
    ) -> AppResult<Vec<CollaboratorEntry>> {
        let (deadline, _) = self.access.require_view(deadline_id, ctx.user_id).await?;
        let rows = self.collaborators.list_for_deadline(deadline.id).await?;
        let copies = self.collaborators.list_copies(deadline.id).await?;

        let ids: Vec<Uuid> = rows
            .iter()
            .map(|r| r.user_id)
            .chain(copies.iter().map(|c| c.recipient_id))
            .collect();
        let users: HashMap<Uuid, _> = self
            .users
            .find_summaries(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut entries: Vec<CollaboratorEntry> = rows
            .iter()
            .map(|r| CollaboratorEntry::from_row(r, users.get(&r.user_id)))
            .collect();
        entries.extend(
            copies
                .iter()
                .map(|c| CollaboratorEntry::from_copy(c, users.get(&c.recipient_id))),
        );
        Ok(entries)
    }

    /// Remove a collaborator row. Users may always remove themselves; anyone
    /// else needs delete rights. The owner row is permanent.
    pub async fn remove_collaborator(
        &self,
        ctx: &RequestContext,
        deadline_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<()> {
        let requester_id = ctx.user_id;
        let deadline = self.access.load(deadline_id).await?;
        if user_id == deadline.owner_id {
            return Err(AppError::validation(
                "The owner cannot be removed from their own deadline",
            ));
        }
        if requester_id != user_id && !self.access.can_delete(deadline.id, requester_id).await? {
            return Err(AppError::authorization(
                "You do not have permission to remove collaborators from this deadline",
            ));
        }

        if !self.collaborators.remove(deadline.id, user_id).await? {
            return Err(AppError::not_found("Collaborator not found"));
        }
        info!(deadline_id = %deadline.id, user_id = %user_id, removed_by = %requester_id, "Collaborator removed");
        Ok(())
    }

    async fn display_name(&self, user_id: Uuid) -> String {
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user.name().to_string(),
            _ => "Someone".to_string(),
        }
    }

    async fn notify(&self, message: InAppMessage) {
        let recipient = message.recipient;
        let kind = message.kind;
        if let Err(e) = self.in_app.create(message, self.clock.now()).await {
            warn!(user_id = %recipient, kind = %kind, error = %e, "In-app notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadline_entity::collaborator::CollaboratorEntryKind;
    use deadline_entity::friendship::FriendshipStatus;

    use crate::collaboration::outcome::ROOT_OWNER_DENIED;
    use crate::notifier::FailingInAppNotifier;
    use crate::testkit::Harness;

    fn copies() -> AddCollaboratorsOptions {
        AddCollaboratorsOptions {
            create_copies: true,
            copy_options: CopyOptions::default(),
        }
    }

    #[test]
    fn test_copy_title_appends_once() {
        assert_eq!(copy_title("Thesis draft"), "Thesis draft (My Copy)");
        assert_eq!(copy_title("Thesis draft (My Copy)"), "Thesis draft (My Copy)");
    }

    #[test]
    fn test_copy_title_fits_column() {
        let long = "x".repeat(MAX_TITLE_CHARS);
        let title = copy_title(&long);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert!(title.ends_with(COPY_SUFFIX));
    }

    #[test]
    fn test_options_default_from_json() {
        let options: AddCollaboratorsOptions = serde_json::from_str("{}").unwrap();
        assert!(!options.create_copies);
        assert!(options.copy_options.include_description);
    }

    #[tokio::test]
    async fn test_add_skips_self_and_owner() {
        let h = Harness::new();
        let owner = h.user("owner");
        let alice = h.user("alice");
        let bob = h.user("bob");
        h.befriend(&owner, &alice);
        h.befriend(&alice, &bob);
        let deadline = h.deadline(&owner, "Grant proposal").await;
        h.add_direct(&owner, deadline.id, &alice).await;

        let outcome = h
            .collaboration
            .add_collaborators(
                &alice,
                deadline.id,
                &[bob.user_id, alice.user_id, owner.user_id],
                &AddCollaboratorsOptions::default(),
            )
            .await
            .unwrap();

        assert!(outcome.was_added(bob.user_id));
        assert_eq!(outcome.skip_reason(alice.user_id), Some(SkipReason::SelfAdd));
        assert_eq!(outcome.skip_reason(owner.user_id), Some(SkipReason::AlreadyOwner));
        let skipped_self = outcome
            .skipped
            .iter()
            .find(|s| s.user_id == alice.user_id)
            .unwrap();
        assert_eq!(skipped_self.reason, "cannot add yourself");

        let row = h.access.resolve_access(deadline.id, bob.user_id).await.unwrap().unwrap();
        assert!(row.can_edit);
        assert!(!row.can_delete);
    }

    #[tokio::test]
    async fn test_add_twice_is_idempotent() {
        let h = Harness::new();
        let owner = h.user("owner");
        let bob = h.user("bob");
        h.befriend(&owner, &bob);
        let deadline = h.deadline(&owner, "Release").await;

        h.add_direct(&owner, deadline.id, &bob).await;
        let second = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[bob.user_id], &AddCollaboratorsOptions::default())
            .await
            .unwrap();

        assert!(second.added.is_empty());
        assert_eq!(second.skip_reason(bob.user_id), Some(SkipReason::AlreadyCollaborator));
        let rows = h.collaboration.list_collaborators(&owner, deadline.id).await.unwrap();
        assert_eq!(rows.iter().filter(|e| e.user_id == bob.user_id).count(), 1);
    }

    #[tokio::test]
    async fn test_only_accepted_friendship_grants() {
        let h = Harness::new();
        let owner = h.user("owner");
        let pending = h.user("pending");
        let blocked = h.user("blocked");
        let stranger = h.user("stranger");
        h.store
            .set_friendship(owner.user_id, pending.user_id, FriendshipStatus::Pending);
        h.store
            .set_friendship(blocked.user_id, owner.user_id, FriendshipStatus::Blocked);
        let deadline = h.deadline(&owner, "Audit").await;

        let outcome = h
            .collaboration
            .add_collaborators(
                &owner,
                deadline.id,
                &[pending.user_id, blocked.user_id, stranger.user_id, Uuid::new_v4()],
                &AddCollaboratorsOptions::default(),
            )
            .await
            .unwrap();

        assert!(outcome.added.is_empty());
        assert_eq!(outcome.skip_reason(pending.user_id), Some(SkipReason::NotFriends));
        assert_eq!(outcome.skip_reason(blocked.user_id), Some(SkipReason::NotFriends));
        assert_eq!(outcome.skip_reason(stranger.user_id), Some(SkipReason::NotFriends));
        assert_eq!(outcome.skipped.len(), 4);
        assert!(outcome
            .skipped
            .iter()
            .any(|s| s.code == SkipReason::UserNotFound));
    }

    #[tokio::test]
    async fn test_add_rejects_empty_list_and_non_editors() {
        let h = Harness::new();
        let owner = h.user("owner");
        let stranger = h.user("stranger");
        let deadline = h.deadline(&owner, "Move out").await;

        let err = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[], &AddCollaboratorsOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = h
            .collaboration
            .add_collaborators(&stranger, deadline.id, &[owner.user_id], &AddCollaboratorsOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = h
            .collaboration
            .add_collaborators(&owner, Uuid::new_v4(), &[stranger.user_id], &AddCollaboratorsOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_copy_fork_creates_private_copy() {
        let h = Harness::new();
        let owner = h.user("owner");
        let carol = h.user("carol");
        h.befriend(&owner, &carol);
        let deadline = h.deadline(&owner, "Marathon").await;

        let outcome = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[carol.user_id], &copies())
            .await
            .unwrap();
        let copy_id = outcome.added[0].copy_id.unwrap();

        let copy = h.deadlines.get(&carol, copy_id).await.unwrap();
        assert!(copy.access.is_owner());
        assert_eq!(copy.deadline.title, "Marathon (My Copy)");
        assert_eq!(copy.deadline.origin_deadline_id, Some(deadline.id));
        assert_eq!(copy.deadline.due_at, deadline.due_at);
        assert_eq!(copy.deadline.description, deadline.description);

        // provenance alone grants nothing on the source
        assert!(h.access.resolve_access(deadline.id, carol.user_id).await.unwrap().is_none());
        let recipients = h.access.recipients(&deadline).await.unwrap();
        assert_eq!(recipients, vec![owner.user_id]);

        let entries = h.collaboration.list_collaborators(&owner, deadline.id).await.unwrap();
        let entry = entries.iter().find(|e| e.user_id == carol.user_id).unwrap();
        assert_eq!(entry.kind, CollaboratorEntryKind::CopyCollaborator);
        assert_eq!(entry.copy_deadline_id, Some(copy_id));

        let shared = h.store.notifications_for(carol.user_id);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].kind, deadline_entity::notification::NotificationKind::Shared);
        assert_eq!(shared[0].deadline_id, Some(copy_id));
    }

    #[tokio::test]
    async fn test_copy_fork_twice_skips_and_drops_description_on_request() {
        let h = Harness::new();
        let owner = h.user("owner");
        let carol = h.user("carol");
        h.befriend(&owner, &carol);
        let deadline = h.deadline(&owner, "Exam").await;
        let options = AddCollaboratorsOptions {
            create_copies: true,
            copy_options: CopyOptions {
                include_description: false,
            },
        };

        let first = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[carol.user_id], &options)
            .await
            .unwrap();
        let copy = h.deadlines.get(&carol, first.added[0].copy_id.unwrap()).await.unwrap();
        assert!(copy.deadline.description.is_none());

        let second = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[carol.user_id], &options)
            .await
            .unwrap();
        assert_eq!(second.skip_reason(carol.user_id), Some(SkipReason::AlreadyHasCopy));
        assert_eq!(h.store.all_deadlines().len(), 2);
    }

    #[tokio::test]
    async fn test_root_owner_denied_on_copy() {
        let h = Harness::new();
        let owner = h.user("owner");
        let carol = h.user("carol");
        h.befriend(&owner, &carol);
        let deadline = h.deadline(&owner, "Thesis").await;
        let first = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[carol.user_id], &copies())
            .await
            .unwrap();
        let copy_id = first.added[0].copy_id.unwrap();

        let outcome = h
            .collaboration
            .add_collaborators(&carol, copy_id, &[owner.user_id], &copies())
            .await
            .unwrap();

        assert!(outcome.added.is_empty());
        assert_eq!(outcome.denied.len(), 1);
        assert_eq!(outcome.denied[0].user_id, owner.user_id);
        assert_eq!(outcome.denied[0].reason, ROOT_OWNER_DENIED);
        assert!(h.access.resolve_access(copy_id, owner.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_copy_of_copy_points_to_immediate_source() {
        let h = Harness::new();
        let owner = h.user("owner");
        let carol = h.user("carol");
        let dan = h.user("dan");
        h.befriend(&owner, &carol);
        h.befriend(&carol, &dan);
        let deadline = h.deadline(&owner, "Thesis").await;
        let first = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[carol.user_id], &copies())
            .await
            .unwrap();
        let carol_copy = first.added[0].copy_id.unwrap();

        let second = h
            .collaboration
            .add_collaborators(&carol, carol_copy, &[dan.user_id], &copies())
            .await
            .unwrap();
        let dan_copy = h
            .deadlines
            .get(&dan, second.added[0].copy_id.unwrap())
            .await
            .unwrap()
            .deadline;

        assert_eq!(dan_copy.origin_deadline_id, Some(carol_copy));
        assert_eq!(dan_copy.title, "Thesis (My Copy)");
        let root = h.access.resolve_root(&dan_copy).await.unwrap();
        assert_eq!(root.id, deadline.id);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_roll_back() {
        let store = Arc::new(deadline_database::memory::MemoryStore::new());
        let owner = RequestContext::new(store.add_user("owner", None));
        let bob = RequestContext::new(store.add_user("bob", None));
        store.set_friendship(owner.user_id, bob.user_id, FriendshipStatus::Accepted);
        let stored: Arc<dyn InAppNotifier> =
            Arc::new(crate::notifier::StoredInAppNotifier::new(store.clone()));
        let failing: Arc<dyn InAppNotifier> =
            Arc::new(FailingInAppNotifier::new(stored, vec![bob.user_id]));
        let h = Harness::with_in_app(store, failing);
        let deadline = h.deadline(&owner, "Budget").await;

        let outcome = h
            .collaboration
            .add_collaborators(&owner, deadline.id, &[bob.user_id], &AddCollaboratorsOptions::default())
            .await
            .unwrap();
        assert!(outcome.was_added(bob.user_id));
        assert!(h.access.resolve_access(deadline.id, bob.user_id).await.unwrap().is_some());
        assert!(h.store.notifications_for(bob.user_id).is_empty());
    }

    #[tokio::test]
    async fn test_remove_collaborator_rules() {
        let h = Harness::new();
        let owner = h.user("owner");
        let bob = h.user("bob");
        let eve = h.user("eve");
        h.befriend(&owner, &bob);
        h.befriend(&owner, &eve);
        let deadline = h.deadline(&owner, "Offsite").await;
        h.add_direct(&owner, deadline.id, &bob).await;
        h.add_direct(&owner, deadline.id, &eve).await;

        let err = h
            .collaboration
            .remove_collaborator(&owner, deadline.id, owner.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = h
            .collaboration
            .remove_collaborator(&bob, deadline.id, eve.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        h.collaboration
            .remove_collaborator(&bob, deadline.id, bob.user_id)
            .await
            .unwrap();
        h.collaboration
            .remove_collaborator(&owner, deadline.id, eve.user_id)
            .await
            .unwrap();
        assert!(h.access.resolve_access(deadline.id, bob.user_id).await.unwrap().is_none());
        assert!(h.access.resolve_access(deadline.id, eve.user_id).await.unwrap().is_none());

        let err = h
            .collaboration
            .remove_collaborator(&owner, deadline.id, eve.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
