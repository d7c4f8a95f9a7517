//! Per-user notification delivery preferences.

use serde::{Deserialize, Serialize};

use crate::deadline::ReminderLead;

/// Preferences for both delivery channels.
///
/// Stored as JSON on the user row:
/// ```json
/// {
///   "email":  { "reminders": { "48_hours": true, "24_hours": true, "12_hours": true, "1_hour": true },
///               "overdue": true, "daily_summary": false },
///   "in_app": { ... }
/// }
/// ```
/// Missing keys take their defaults, so partially stored bundles stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationPreferences {
    #[serde(default)]
    pub email: ChannelPreferences,
    #[serde(default)]
    pub in_app: ChannelPreferences,
}

/// Toggles for one delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreferences {
    #[serde(default)]
    pub reminders: ReminderToggles,
    #[serde(default = "default_true")]
    pub overdue: bool,
    /// Daily summaries are opt-in.
    #[serde(default)]
    pub daily_summary: bool,
}

impl ChannelPreferences {
    pub fn reminder_enabled(&self, lead: ReminderLead) -> bool {
        self.reminders.get(lead)
    }
}

impl Default for ChannelPreferences {
    fn default() -> Self {
        Self {
            reminders: ReminderToggles::default(),
            overdue: true,
            daily_summary: false,
        }
    }
}

/// One toggle per reminder lead time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderToggles {
    #[serde(rename = "48_hours", default = "default_true")]
    pub forty_eight_hours: bool,
    #[serde(rename = "24_hours", default = "default_true")]
    pub twenty_four_hours: bool,
    #[serde(rename = "12_hours", default = "default_true")]
    pub twelve_hours: bool,
    #[serde(rename = "1_hour", default = "default_true")]
    pub one_hour: bool,
}

impl ReminderToggles {
    pub fn get(&self, lead: ReminderLead) -> bool {
        match lead {
            ReminderLead::FortyEightHours => self.forty_eight_hours,
            ReminderLead::TwentyFourHours => self.twenty_four_hours,
            ReminderLead::TwelveHours => self.twelve_hours,
            ReminderLead::OneHour => self.one_hour,
        }
    }
}

impl Default for ReminderToggles {
    fn default() -> Self {
        Self {
            forty_eight_hours: true,
            twenty_four_hours: true,
            twelve_hours: true,
            one_hour: true,
        }
    }
}

fn default_true() -> bool {
    true
}
