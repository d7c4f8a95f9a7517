//! Cron wiring for the notification passes.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use deadline_core::config::SchedulerConfig;
use deadline_core::error::AppError;

use crate::notification::NotificationScheduler;
use crate::report::PassKind;

/// Cron-based runner for the notification passes.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Pass implementations invoked on each tick
    notifications: Arc<NotificationScheduler>,
    config: SchedulerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(
        notifications: Arc<NotificationScheduler>,
        config: SchedulerConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            notifications,
            config,
        })
    }

    /// Register all notification passes on their configured schedules
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register(PassKind::Reminder, &self.config.reminder_cron)
            .await?;
        self.register(PassKind::Overdue, &self.config.overdue_cron)
            .await?;
        self.register(PassKind::DailySummary, &self.config.daily_summary_cron)
            .await?;
        self.register(PassKind::Cleanup, &self.config.cleanup_cron)
            .await?;

        tracing::info!("All scheduled passes registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    async fn register(&self, kind: PassKind, cron: &str) -> Result<(), AppError> {
        let notifications = Arc::clone(&self.notifications);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let notifications = Arc::clone(&notifications);
            Box::pin(async move {
                tracing::debug!(pass = %kind, "Scheduled pass starting");
                notifications.run_pass(kind).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid cron expression for {kind} pass '{cron}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {kind} schedule: {e}")))?;

        tracing::info!(pass = %kind, cron, "Registered scheduled pass");
        Ok(())
    }
}
