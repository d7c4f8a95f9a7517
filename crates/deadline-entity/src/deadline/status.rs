//! Deadline status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a deadline.
///
/// `Overdue` is assigned by the scheduler once `due_at` has passed on a
/// deadline that is not completed. Only an edit that moves `due_at` back
/// into the future returns it to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "deadline_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl DeadlineStatus {
    /// Whether reminders may still be sent for a deadline in this state.
    pub fn accepts_reminders(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeadlineStatus {
    type Err = deadline_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            _ => Err(deadline_core::AppError::validation(format!(
                "Invalid deadline status: '{s}'. Expected one of: pending, in_progress, completed, overdue"
            ))),
        }
    }
}
