//! Notification scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Cron schedules and timing windows for the notification passes.
///
/// Cron expressions use the six-field form (seconds first) and are
/// evaluated in UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reminder pass schedule (top of every hour).
    #[serde(default = "default_reminder_cron")]
    pub reminder_cron: String,
    /// Overdue pass schedule (every four minutes).
    #[serde(default = "default_overdue_cron")]
    pub overdue_cron: String,
    /// Daily summary schedule.
    #[serde(default = "default_daily_summary_cron")]
    pub daily_summary_cron: String,
    /// Expired in-app notification cleanup schedule.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
    /// Half-width of the window around each reminder lead time, in minutes.
    #[serde(default = "default_reminder_window")]
    pub reminder_window_minutes: i64,
    /// How far back the overdue pass looks for recently missed deadlines.
    #[serde(default = "default_overdue_lookback")]
    pub overdue_lookback_hours: i64,
    /// Minimum gap between two overdue notifications for one deadline.
    #[serde(default = "default_overdue_renotify")]
    pub overdue_renotify_hours: i64,
    /// Overdue deadlines older than this stop being re-notified.
    #[serde(default = "default_overdue_cutoff")]
    pub overdue_cutoff_hours: i64,
    /// Fixed UTC offset that defines "today" for daily summaries.
    #[serde(default)]
    pub summary_utc_offset_minutes: i32,
    /// Read notifications older than this are purged by the cleanup job.
    #[serde(default = "default_retention")]
    pub notification_retention_days: i64,
    /// In-app notifications expire this many days after creation, read or not.
    #[serde(default = "default_in_app_ttl")]
    pub in_app_ttl_days: i64,
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.reminder_window_minutes <= 0 {
            return Err(AppError::configuration(
                "scheduler.reminder_window_minutes must be positive",
            ));
        }
        if self.overdue_lookback_hours <= 0 || self.overdue_renotify_hours <= 0 {
            return Err(AppError::configuration(
                "scheduler overdue windows must be positive",
            ));
        }
        if self.overdue_cutoff_hours < self.overdue_renotify_hours {
            return Err(AppError::configuration(
                "scheduler.overdue_cutoff_hours must not be shorter than the re-notify interval",
            ));
        }
        if self.in_app_ttl_days <= 0 {
            return Err(AppError::configuration(
                "scheduler.in_app_ttl_days must be positive",
            ));
        }
        if self.summary_utc_offset_minutes.abs() > 14 * 60 {
            return Err(AppError::configuration(
                "scheduler.summary_utc_offset_minutes must be within +/-14h",
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reminder_cron: default_reminder_cron(),
            overdue_cron: default_overdue_cron(),
            daily_summary_cron: default_daily_summary_cron(),
            cleanup_cron: default_cleanup_cron(),
            reminder_window_minutes: default_reminder_window(),
            overdue_lookback_hours: default_overdue_lookback(),
            overdue_renotify_hours: default_overdue_renotify(),
            overdue_cutoff_hours: default_overdue_cutoff(),
            summary_utc_offset_minutes: 0,
            notification_retention_days: default_retention(),
            in_app_ttl_days: default_in_app_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reminder_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_overdue_cron() -> String {
    "0 */4 * * * *".to_string()
}

fn default_daily_summary_cron() -> String {
    "0 0 8 * * *".to_string()
}

fn default_cleanup_cron() -> String {
    "0 30 2 * * *".to_string()
}

fn default_reminder_window() -> i64 {
    30
}

fn default_overdue_lookback() -> i64 {
    4
}

fn default_overdue_renotify() -> i64 {
    24
}

fn default_overdue_cutoff() -> i64 {
    168
}

fn default_retention() -> i64 {
    30
}

fn default_in_app_ttl() -> i64 {
    90
}
