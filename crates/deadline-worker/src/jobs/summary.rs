//! Daily summary pass.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use deadline_entity::deadline::{Deadline, DeadlineStatus};
use deadline_entity::notification::{NotificationKind, NotificationPriority};
use deadline_service::notifier::{EmailTemplate, InAppMessage};

use crate::notification::NotificationScheduler;
use crate::report::{PassKind, PassReport};

/// One user's counts for the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub total_active: u64,
    pub due_today: u64,
    pub due_this_week: u64,
    pub overdue: u64,
    pub completed_today: u64,
}

impl DailySummary {
    /// Count `deadlines` relative to `now` and the day `[day_start, day_end)`.
    pub fn compute(
        deadlines: &[Deadline],
        now: DateTime<Utc>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Self {
        let week_end = now + Duration::days(7);
        let today = |at: DateTime<Utc>| at >= day_start && at < day_end;
        let mut summary = Self::default();

        for deadline in deadlines {
            let completed = deadline.status.is_completed();
            let overdue = deadline.status == DeadlineStatus::Overdue || deadline.is_past_due(now);

            if !completed {
                summary.total_active += 1;
                if today(deadline.due_at) {
                    summary.due_today += 1;
                }
                if !overdue && deadline.due_at >= now && deadline.due_at <= week_end {
                    summary.due_this_week += 1;
                }
            }
            if overdue && !completed {
                summary.overdue += 1;
            }
            if deadline.completed_at.is_some_and(today) {
                summary.completed_today += 1;
            }
        }
        summary
    }

    pub fn headline(&self) -> String {
        format!(
            "{} due today, {} overdue, {} active",
            self.due_today, self.overdue, self.total_active
        )
    }
}

/// Start and end of the local day containing `now`, in UTC.
pub fn day_bounds(now: DateTime<Utc>, offset_minutes: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    let Some(offset) = FixedOffset::east_opt(offset_minutes * 60) else {
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        return (start, start + Duration::days(1));
    };
    let local_midnight = now.with_timezone(&offset).date_naive().and_time(NaiveTime::MIN);
    let start = offset
        .from_local_datetime(&local_midnight)
        .single()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(now);
    (start, start + Duration::days(1))
}

impl NotificationScheduler {
    /// Summarize the day for every user with a live or just-finished deadline.
    pub async fn run_daily_summary_pass(&self) -> PassReport {
        let now = self.clock.now();
        let (day_start, day_end) = day_bounds(now, self.config.summary_utc_offset_minutes);
        let mut report = PassReport::new(PassKind::DailySummary);

        let users = match self.deadlines.find_users_with_activity(day_start, day_end).await {
            Ok(users) => users,
            Err(e) => {
                report.store_error("Summary user query failed", &e);
                return report;
            }
        };

        for user_id in users {
            report.examined += 1;
            let deadlines = match self.deadlines.list_accessible(user_id).await {
                Ok(deadlines) => deadlines,
                Err(e) => {
                    report.store_error(&format!("Summary deadline query failed for user {user_id}"), &e);
                    continue;
                }
            };
            let summary = DailySummary::compute(&deadlines, now, day_start, day_end);
            if self.deliver_summary(user_id, &summary, now, &mut report).await {
                report.notified += 1;
            } else {
                report.skipped += 1;
            }
        }
        report
    }

    async fn deliver_summary(
        &self,
        user_id: Uuid,
        summary: &DailySummary,
        now: DateTime<Utc>,
        report: &mut PassReport,
    ) -> bool {
        let data = match serde_json::to_value(summary) {
            Ok(data) => data,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Summary not serializable");
                return false;
            }
        };

        let mut reached = false;
        if self.preferences.has_daily_summary_enabled(user_id).await {
            reached |= self
                .send_email(user_id, EmailTemplate::DailySummary, &data, report)
                .await;
        }
        if self.preferences.has_in_app_daily_summary_enabled(user_id).await {
            let message = InAppMessage {
                recipient: user_id,
                deadline_id: None,
                kind: NotificationKind::Summary,
                title: "Your daily deadline summary".to_string(),
                message: summary.headline(),
                data: json!({ "summary": data, "date": now.date_naive().to_string() }),
                priority: NotificationPriority::Low,
            };
            reached |= self.send_in_app(message, now, report).await;
        }
        reached
    }
}
