//! # deadline-service
//!
//! Business logic service layer. Each service orchestrates the store
//! traits and delivery channels to implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod collaboration;
pub mod context;
pub mod deadline;
pub mod notification;
pub mod notifier;

#[cfg(test)]
pub(crate) mod testkit;

pub use collaboration::{AccessService, CollaborationService};
pub use context::RequestContext;
pub use deadline::DeadlineService;
pub use notification::{NotificationService, PreferenceChecker};
