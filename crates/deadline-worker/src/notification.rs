//! The notification scheduler and its delivery helpers.
//!
//! Each pass lives in `jobs/` as an `impl NotificationScheduler` block.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use deadline_core::config::SchedulerConfig;
use deadline_core::traits::Clock;
use deadline_database::traits::{DeadlineStore, NotificationStore, UserDirectory};
use deadline_entity::deadline::{Deadline, SentRecord};
use deadline_service::collaboration::AccessService;
use deadline_service::notification::PreferenceChecker;
use deadline_service::notifier::{EmailSender, EmailTemplate, InAppMessage, InAppNotifier};

use crate::report::{PassKind, PassReport};

/// Runs the reminder, overdue, summary and cleanup passes.
#[derive(Debug)]
pub struct NotificationScheduler {
    pub(crate) deadlines: Arc<dyn DeadlineStore>,
    pub(crate) users: Arc<dyn UserDirectory>,
    pub(crate) notifications: Arc<dyn NotificationStore>,
    pub(crate) access: Arc<AccessService>,
    pub(crate) preferences: PreferenceChecker,
    pub(crate) email: Arc<dyn EmailSender>,
    pub(crate) in_app: Arc<dyn InAppNotifier>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: SchedulerConfig,
}

impl NotificationScheduler {
    /// Create a new scheduler. Nothing runs until a pass is invoked.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        deadlines: Arc<dyn DeadlineStore>,
        users: Arc<dyn UserDirectory>,
        notifications: Arc<dyn NotificationStore>,
        access: Arc<AccessService>,
        preferences: PreferenceChecker,
        email: Arc<dyn EmailSender>,
        in_app: Arc<dyn InAppNotifier>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            deadlines,
            users,
            notifications,
            access,
            preferences,
            email,
            in_app,
            clock,
            config,
        }
    }

    /// Run one pass and log its report.
    pub async fn run_pass(&self, kind: PassKind) -> PassReport {
        let report = match kind {
            PassKind::Reminder => self.run_reminder_pass().await,
            PassKind::Overdue => self.run_overdue_pass().await,
            PassKind::DailySummary => self.run_daily_summary_pass().await,
            PassKind::Cleanup => self.run_cleanup().await,
        };
        report.log();
        report
    }

    /// Email one user. `false` when the channel is off, the user has no
    /// address, or the send failed.
    pub(crate) async fn send_email(
        &self,
        user_id: Uuid,
        template: EmailTemplate,
        data: &Value,
        report: &mut PassReport,
    ) -> bool {
        if !self.email.is_enabled() {
            return false;
        }
        let address = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => match user.email {
                Some(address) if !address.is_empty() => address,
                _ => return false,
            },
            Ok(None) => return false,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "User lookup for email failed");
                report.emails_failed += 1;
                return false;
            }
        };

        let outcome = self.email.send(&address, template, data).await;
        if outcome.success {
            report.emails_sent += 1;
            true
        } else {
            warn!(
                user_id = %user_id,
                template = template.as_str(),
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Email delivery failed"
            );
            report.emails_failed += 1;
            false
        }
    }

    pub(crate) async fn send_in_app(
        &self,
        message: InAppMessage,
        now: DateTime<Utc>,
        report: &mut PassReport,
    ) -> bool {
        let recipient = message.recipient;
        let kind = message.kind;
        match self.in_app.create(message, now).await {
            Ok(_) => {
                report.in_app_sent += 1;
                true
            }
            Err(e) => {
                warn!(user_id = %recipient, kind = %kind, error = %e, "In-app delivery failed");
                report.in_app_failed += 1;
                false
            }
        }
    }

    /// Everyone who should hear about a deadline, or `None` on a store error.
    pub(crate) async fn recipients_of(
        &self,
        deadline: &Deadline,
        report: &mut PassReport,
    ) -> Option<Vec<Uuid>> {
        match self.access.recipients(deadline).await {
            Ok(recipients) => Some(recipients),
            Err(e) => {
                report.store_error(&format!("Recipient lookup failed for deadline {}", deadline.id), &e);
                None
            }
        }
    }

    /// Write the delivery marker for one notification kind.
    pub(crate) async fn mark_sent(
        &self,
        deadline_id: Uuid,
        key: &str,
        now: DateTime<Utc>,
        recipients: Vec<Uuid>,
        report: &mut PassReport,
    ) {
        let record = SentRecord {
            sent_at: now,
            recipients,
        };
        match self.deadlines.record_notification(deadline_id, key, &record).await {
            Ok(()) => report.notified += 1,
            Err(e) => {
                report.store_error(
                    &format!("Failed to record {key} marker on deadline {deadline_id}"),
                    &e,
                );
            }
        }
    }
}
