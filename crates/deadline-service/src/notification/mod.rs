//! Notification inbox and per-user delivery preferences.

pub mod preference;
pub mod service;

pub use preference::PreferenceChecker;
pub use service::NotificationService;
