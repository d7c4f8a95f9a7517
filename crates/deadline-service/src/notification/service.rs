//! Notification inbox and preference management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use deadline_core::error::AppError;
use deadline_core::result::AppResult;
use deadline_core::traits::Clock;
use deadline_core::types::pagination::{PageRequest, PageResponse};
use deadline_database::traits::{NotificationStore, UserDirectory};
use deadline_entity::notification::{Notification, NotificationPreferences};

use crate::context::RequestContext;

/// Manages the caller's notifications and delivery preferences.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            users,
            clock,
        }
    }

    /// Lists notifications for the current user, newest first.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>> {
        self.notifications
            .list_for_user(ctx.user_id, page, unread_only)
            .await
    }

    /// Number of unread notifications for the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks one of the caller's notifications as read.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        let updated = self
            .notifications
            .mark_read(notification_id, ctx.user_id, self.clock.now())
            .await?;
        if !updated {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Mark every unread notification read; returns how many changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let count = self
            .notifications
            .mark_all_read(ctx.user_id, self.clock.now())
            .await?;
        info!(request_id = %ctx.request_id, user_id = %ctx.user_id, count, "Notifications marked read");
        Ok(count)
    }

    /// Delete one of the caller's notifications.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        if !self.notifications.delete(notification_id, ctx.user_id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// The caller's stored preferences, or the defaults.
    pub async fn get_preferences(&self, ctx: &RequestContext) -> AppResult<NotificationPreferences> {
        self.users
            .get_notification_preferences(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Replaces the caller's preference bundle.
    pub async fn update_preferences(
        &self,
        ctx: &RequestContext,
        preferences: NotificationPreferences,
    ) -> AppResult<NotificationPreferences> {
        let updated = self
            .users
            .update_notification_preferences(ctx.user_id, &preferences, self.clock.now())
            .await?;
        if !updated {
            return Err(AppError::not_found("User not found"));
        }
        info!(request_id = %ctx.request_id, user_id = %ctx.user_id, "Notification preferences updated");
        Ok(preferences)
    }
}
