//! Deadline domain entities.

pub mod marker;
pub mod model;
pub mod priority;
pub mod status;

pub use marker::{NotificationsSent, ReminderLead, SentRecord, OVERDUE_MARKER};
pub use model::{Deadline, NewDeadline, UpdateDeadline};
pub use priority::DeadlinePriority;
pub use status::DeadlineStatus;
