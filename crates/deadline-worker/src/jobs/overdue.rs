//! Overdue pass: status maintenance plus throttled overdue alerts.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{debug, info};

use deadline_core::config::SchedulerConfig;
use deadline_entity::deadline::{Deadline, OVERDUE_MARKER};
use deadline_entity::notification::{NotificationKind, NotificationPriority};
use deadline_service::notifier::{EmailTemplate, InAppMessage};

use crate::notification::NotificationScheduler;
use crate::report::{PassKind, PassReport};

/// When an overdue deadline may be announced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverduePolicy {
    /// Minimum gap between two overdue notifications.
    pub renotify_after: Duration,
    /// Past this much lateness the deadline is no longer re-announced.
    pub give_up_after: Duration,
}

impl OverduePolicy {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            renotify_after: Duration::hours(config.overdue_renotify_hours),
            give_up_after: Duration::hours(config.overdue_cutoff_hours),
        }
    }

    /// First notice always goes out. Later ones need the re-notify gap to
    /// have passed and the deadline to be within the give-up horizon.
    pub fn should_notify(
        &self,
        last_sent: Option<DateTime<Utc>>,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        match last_sent {
            None => true,
            Some(sent_at) => {
                now - sent_at >= self.renotify_after && now - due_at <= self.give_up_after
            }
        }
    }
}

impl Default for OverduePolicy {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}

impl NotificationScheduler {
    /// Move missed deadlines to `overdue`, then alert on recent ones.
    pub async fn run_overdue_pass(&self) -> PassReport {
        let now = self.clock.now();
        let mut report = PassReport::new(PassKind::Overdue);

        match self.deadlines.mark_overdue(now).await {
            Ok(count) => {
                report.status_updates = count;
                if count > 0 {
                    info!(count, "Deadlines marked overdue");
                }
            }
            Err(e) => {
                report.store_error("Overdue status update failed", &e);
            }
        }

        let since = now - Duration::hours(self.config.overdue_lookback_hours);
        let overdue = match self.deadlines.find_overdue_since(since, now).await {
            Ok(overdue) => overdue,
            Err(e) => {
                report.store_error("Overdue query failed", &e);
                return report;
            }
        };

        let policy = OverduePolicy::from_config(&self.config);
        for deadline in overdue {
            report.examined += 1;
            let last_sent = deadline.sent(OVERDUE_MARKER).map(|r| r.sent_at);
            if !policy.should_notify(last_sent, deadline.due_at, now) {
                debug!(deadline_id = %deadline.id, "Overdue notice not due yet");
                report.skipped += 1;
                continue;
            }
            self.announce_overdue(&deadline, now, &mut report).await;
        }
        report
    }

    async fn announce_overdue(&self, deadline: &Deadline, now: DateTime<Utc>, report: &mut PassReport) {
        let Some(recipients) = self.recipients_of(deadline, report).await else {
            return;
        };
        let data = json!({
            "title": deadline.title,
            "due_at": deadline.due_at.to_rfc3339(),
            "deadline_id": deadline.id.to_string(),
        });

        let mut delivered = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            let mut reached = false;
            if self.preferences.has_overdue_notifications_enabled(user_id).await {
                reached |= self
                    .send_email(user_id, EmailTemplate::DeadlineOverdue, &data, report)
                    .await;
            }
            if self
                .preferences
                .has_in_app_overdue_notifications_enabled(user_id)
                .await
            {
                let message = InAppMessage {
                    recipient: user_id,
                    deadline_id: Some(deadline.id),
                    kind: NotificationKind::Overdue,
                    title: format!("\"{}\" is overdue", deadline.title),
                    message: format!(
                        "\"{}\" was due at {}.",
                        deadline.title,
                        deadline.due_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                    data: data.clone(),
                    priority: NotificationPriority::Urgent,
                };
                reached |= self.send_in_app(message, now, report).await;
            }
            if reached {
                delivered.push(user_id);
            }
        }

        if delivered.is_empty() {
            report.skipped += 1;
            return;
        }
        self.mark_sent(deadline.id, OVERDUE_MARKER, now, delivered, report)
            .await;
    }
}
