//! Reminder pass: one notification per lead time before the due date.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::debug;

use deadline_entity::deadline::{Deadline, ReminderLead};
use deadline_entity::notification::{NotificationKind, NotificationPriority};
use deadline_service::notifier::{EmailTemplate, InAppMessage};

use crate::notification::NotificationScheduler;
use crate::report::{PassKind, PassReport};

/// In-app priority for a reminder. The last reminder is always urgent.
pub fn reminder_priority(deadline: &Deadline, lead: ReminderLead) -> NotificationPriority {
    match lead {
        ReminderLead::OneHour => NotificationPriority::Urgent,
        _ => deadline.priority.into(),
    }
}

impl NotificationScheduler {
    /// Send every reminder whose lead time falls inside the window around now.
    pub async fn run_reminder_pass(&self) -> PassReport {
        let now = self.clock.now();
        let window = Duration::minutes(self.config.reminder_window_minutes);
        let mut report = PassReport::new(PassKind::Reminder);

        for lead in ReminderLead::ALL {
            let target = now + lead.duration();
            let due = match self
                .deadlines
                .find_due_for_reminder(lead.marker_key(), target - window, target + window)
                .await
            {
                Ok(due) => due,
                Err(e) => {
                    report.store_error(&format!("Reminder query failed for {lead}"), &e);
                    continue;
                }
            };

            for deadline in due {
                report.examined += 1;
                self.remind(&deadline, lead, now, &mut report).await;
            }
        }
        report
    }

    async fn remind(
        &self,
        deadline: &Deadline,
        lead: ReminderLead,
        now: DateTime<Utc>,
        report: &mut PassReport,
    ) {
        let Some(recipients) = self.recipients_of(deadline, report).await else {
            return;
        };
        let data = json!({
            "title": deadline.title,
            "due_at": deadline.due_at.to_rfc3339(),
            "lead": lead.phrase(),
            "reminder": lead.marker_key(),
            "deadline_id": deadline.id.to_string(),
        });
        let priority = reminder_priority(deadline, lead);

        let mut delivered = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            let mut reached = false;
            if self.preferences.is_reminder_enabled(user_id, lead).await {
                reached |= self
                    .send_email(user_id, EmailTemplate::DeadlineReminder, &data, report)
                    .await;
            }
            if self.preferences.is_in_app_reminder_enabled(user_id, lead).await {
                let message = InAppMessage {
                    recipient: user_id,
                    deadline_id: Some(deadline.id),
                    kind: NotificationKind::Reminder,
                    title: format!("\"{}\" is due {}", deadline.title, lead.phrase()),
                    message: format!(
                        "\"{}\" is due at {}.",
                        deadline.title,
                        deadline.due_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                    data: data.clone(),
                    priority,
                };
                reached |= self.send_in_app(message, now, report).await;
            }
            if reached {
                delivered.push(user_id);
            }
        }

        if delivered.is_empty() {
            debug!(deadline_id = %deadline.id, lead = lead.marker_key(), "Reminder reached nobody");
            report.skipped += 1;
            return;
        }
        self.mark_sent(deadline.id, lead.marker_key(), now, delivered, report)
            .await;
    }
}
