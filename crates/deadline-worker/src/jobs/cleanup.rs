//! Notification cleanup pass.

use chrono::Duration;

use crate::notification::NotificationScheduler;
use crate::report::{PassKind, PassReport};

impl NotificationScheduler {
    /// Purge expired notifications and read ones past the retention period.
    pub async fn run_cleanup(&self) -> PassReport {
        let now = self.clock.now();
        let read_before = now - Duration::days(self.config.notification_retention_days);
        let mut report = PassReport::new(PassKind::Cleanup);

        match self.notifications.delete_expired(now, read_before).await {
            Ok(removed) => report.removed = removed,
            Err(e) => {
                report.store_error("Notification cleanup failed", &e);
            }
        }
        report
    }
}
