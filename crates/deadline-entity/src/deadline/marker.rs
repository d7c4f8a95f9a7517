//! Idempotency markers recorded on a deadline after a notification goes out.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker key used for overdue notifications.
pub const OVERDUE_MARKER: &str = "overdue";

/// Reminder lead times, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderLead {
    #[serde(rename = "48_hours")]
    FortyEightHours,
    #[serde(rename = "24_hours")]
    TwentyFourHours,
    #[serde(rename = "12_hours")]
    TwelveHours,
    #[serde(rename = "1_hour")]
    OneHour,
}

impl ReminderLead {
    /// Every lead time in the order the reminder pass walks them.
    pub const ALL: [ReminderLead; 4] = [
        Self::FortyEightHours,
        Self::TwentyFourHours,
        Self::TwelveHours,
        Self::OneHour,
    ];

    pub fn hours(&self) -> i64 {
        match self {
            Self::FortyEightHours => 48,
            Self::TwentyFourHours => 24,
            Self::TwelveHours => 12,
            Self::OneHour => 1,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(self.hours())
    }

    /// The `notifications_sent` key for this lead time.
    pub fn marker_key(&self) -> &'static str {
        match self {
            Self::FortyEightHours => "48_hours",
            Self::TwentyFourHours => "24_hours",
            Self::TwelveHours => "12_hours",
            Self::OneHour => "1_hour",
        }
    }

    /// Human-readable phrase, e.g. "in 12 hours".
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::FortyEightHours => "in 48 hours",
            Self::TwentyFourHours => "in 24 hours",
            Self::TwelveHours => "in 12 hours",
            Self::OneHour => "in 1 hour",
        }
    }
}

impl fmt::Display for ReminderLead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker_key())
    }
}

/// One delivered notification kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentRecord {
    pub sent_at: DateTime<Utc>,
    /// Users for whom at least one channel succeeded.
    #[serde(default)]
    pub recipients: Vec<Uuid>,
}

/// Map of notification kind to its last successful delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationsSent(BTreeMap<String, SentRecord>);

impl NotificationsSent {
    pub fn get(&self, key: &str) -> Option<&SentRecord> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Record a delivery, replacing any previous record for the key.
    pub fn record(&mut self, key: &str, sent_at: DateTime<Utc>, recipients: Vec<Uuid>) {
        self.0.insert(
            key.to_string(),
            SentRecord {
                sent_at,
                recipients,
            },
        );
    }

    pub fn remove(&mut self, key: &str) -> Option<SentRecord> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
