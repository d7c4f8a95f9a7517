//! Per-channel preference lookups used by the scheduler.
//!
//! A failed or empty lookup counts as enabled so a directory outage never
//! silences reminders or overdue alerts. Daily summaries are opt-in and
//! fall back to disabled instead.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use deadline_database::traits::UserDirectory;
use deadline_entity::deadline::ReminderLead;
use deadline_entity::notification::NotificationPreferences;

/// Answers "should this user hear about it on this channel" for the scheduler.
#[derive(Debug, Clone)]
pub struct PreferenceChecker {
    users: Arc<dyn UserDirectory>,
}

impl PreferenceChecker {
    /// Build a checker over the user directory.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    async fn load(&self, user_id: Uuid) -> Option<NotificationPreferences> {
        match self.users.get_notification_preferences(user_id).await {
            Ok(Some(preferences)) => Some(preferences),
            Ok(None) => {
                debug!(user_id = %user_id, "No stored preferences, using fallback");
                None
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Preference lookup failed, using fallback");
                None
            }
        }
    }

    /// Email reminder toggle for one lead time.
    pub async fn is_reminder_enabled(&self, user_id: Uuid, lead: ReminderLead) -> bool {
        self.load(user_id)
            .await
            .map(|p| p.email.reminder_enabled(lead))
            .unwrap_or(true)
    }

    /// In-app reminder toggle for one lead time.
    pub async fn is_in_app_reminder_enabled(&self, user_id: Uuid, lead: ReminderLead) -> bool {
        self.load(user_id)
            .await
            .map(|p| p.in_app.reminder_enabled(lead))
            .unwrap_or(true)
    }

    /// Email toggle for overdue alerts.
    pub async fn has_overdue_notifications_enabled(&self, user_id: Uuid) -> bool {
        self.load(user_id).await.map(|p| p.email.overdue).unwrap_or(true)
    }

    /// In-app toggle for overdue alerts.
    pub async fn has_in_app_overdue_notifications_enabled(&self, user_id: Uuid) -> bool {
        self.load(user_id).await.map(|p| p.in_app.overdue).unwrap_or(true)
    }

    /// Email toggle for the daily summary. Disabled when unknown.
    pub async fn has_daily_summary_enabled(&self, user_id: Uuid) -> bool {
        self.load(user_id)
            .await
            .map(|p| p.email.daily_summary)
            .unwrap_or(false)
    }

    /// In-app toggle for the daily summary. Disabled when unknown.
    pub async fn has_in_app_daily_summary_enabled(&self, user_id: Uuid) -> bool {
        self.load(user_id)
            .await
            .map(|p| p.in_app.daily_summary)
            .unwrap_or(false)
    }
}
