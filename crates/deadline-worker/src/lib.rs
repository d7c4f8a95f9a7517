//! Scheduled notification work for the deadline tracker.
//!
//! This crate provides:
//! - `NotificationScheduler`, one method per pass (reminders, overdue,
//!   daily summaries, notification cleanup)
//! - `CronScheduler`, which runs those passes on cron schedules
//! - `PassReport`, the per-run counters every pass returns

pub mod jobs;
pub mod notification;
pub mod report;
pub mod scheduler;

pub use jobs::overdue::OverduePolicy;
pub use jobs::summary::DailySummary;
pub use notification::NotificationScheduler;
pub use report::{PassKind, PassReport};
pub use scheduler::CronScheduler;
