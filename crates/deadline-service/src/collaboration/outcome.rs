//! Structured result of attaching collaborators.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Why a candidate was left out without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SelfAdd,
    AlreadyOwner,
    AlreadyCollaborator,
    UserNotFound,
    NotFriends,
    AlreadyHasCopy,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::SelfAdd => "cannot add yourself",
            Self::AlreadyOwner => "owner already has access",
            Self::AlreadyCollaborator => "already a collaborator",
            Self::UserNotFound => "user not found",
            Self::NotFriends => "not friends",
            Self::AlreadyHasCopy => "already has a copy",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A candidate who was granted access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedCollaborator {
    pub user_id: Uuid,
    /// The recipient's private copy, when one was created.
    pub copy_id: Option<Uuid>,
}

/// A candidate left out, with a machine code and a readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub user_id: Uuid,
    pub code: SkipReason,
    pub reason: String,
}

impl SkippedCandidate {
    pub fn new(user_id: Uuid, code: SkipReason) -> Self {
        Self {
            user_id,
            code,
            reason: code.message().to_string(),
        }
    }
}

/// The original owner of a copied deadline cannot be attached to a copy of it.
pub const ROOT_OWNER_DENIED: &str = "cannot add original owner to a copy of their own deadline";

/// A candidate refused outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeniedCandidate {
    pub user_id: Uuid,
    pub reason: String,
}

/// Per-candidate results of one `add_collaborators` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddCollaboratorsOutcome {
    pub added: Vec<AddedCollaborator>,
    pub skipped: Vec<SkippedCandidate>,
    pub denied: Vec<DeniedCandidate>,
}

impl AddCollaboratorsOutcome {
    pub(crate) fn skip(&mut self, user_id: Uuid, code: SkipReason) {
        self.skipped.push(SkippedCandidate::new(user_id, code));
    }

    pub(crate) fn deny_root_owner(&mut self, user_id: Uuid) {
        self.denied.push(DeniedCandidate {
            user_id,
            reason: ROOT_OWNER_DENIED.to_string(),
        });
    }

    /// Why `user_id` was skipped, if it was.
    pub fn skip_reason(&self, user_id: Uuid) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.user_id == user_id)
            .map(|s| s.code)
    }

    pub fn was_added(&self, user_id: Uuid) -> bool {
        self.added.iter().any(|a| a.user_id == user_id)
    }
}
