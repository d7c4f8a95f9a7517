//! Collaboration engine: who may see and change a deadline, and how
//! collaborators are attached (directly or by copy-forking).

pub mod access;
pub mod outcome;
pub mod service;

pub use access::{Access, AccessLevel, AccessService};
pub use outcome::{AddCollaboratorsOutcome, AddedCollaborator, DeniedCandidate, SkipReason, SkippedCandidate};
pub use service::{AddCollaboratorsOptions, CollaborationService, CopyOptions};
