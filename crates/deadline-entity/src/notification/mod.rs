//! Notification domain entities.

pub mod kind;
pub mod model;
pub mod preference;

pub use kind::{NotificationKind, NotificationPriority};
pub use model::{NewNotification, Notification};
pub use preference::{ChannelPreferences, NotificationPreferences, ReminderToggles};
