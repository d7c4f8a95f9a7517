//! Deadline CRUD with access checks.

pub mod service;

pub use service::{CreateDeadlineInput, DeadlineService, DeadlineView};

/// Longest accepted deadline title, in characters.
pub const MAX_TITLE_CHARS: usize = 255;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;
