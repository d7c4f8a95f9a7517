//! Collaboration entities: access rows, copy provenance and the
//! display projection built from both.

pub mod copy;
pub mod model;
pub mod view;

pub use copy::CopyRecord;
pub use model::{CollaboratorRole, DeadlineCollaborator, NewCollaborator};
pub use view::{CollaboratorEntry, CollaboratorEntryKind};
