//! Notification kind and priority enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::deadline::DeadlinePriority;

/// What triggered an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    Overdue,
    /// A private copy of someone's deadline was created for the recipient.
    Shared,
    /// The recipient was attached to a deadline as a collaborator.
    CollaboratorAdded,
    Summary,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Overdue => "overdue",
            Self::Shared => "shared",
            Self::CollaboratorAdded => "collaborator_added",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "notification_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl NotificationPriority {
    /// Parse from string, falling back to `Medium`.
    pub fn from_str_value(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl From<DeadlinePriority> for NotificationPriority {
    fn from(priority: DeadlinePriority) -> Self {
        match priority {
            DeadlinePriority::Low => Self::Low,
            DeadlinePriority::Medium => Self::Medium,
            DeadlinePriority::High => Self::High,
            DeadlinePriority::Urgent => Self::Urgent,
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
