//! In-app delivery.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use deadline_core::result::AppResult;
use deadline_database::traits::NotificationStore;
use deadline_entity::notification::{
    NewNotification, Notification, NotificationKind, NotificationPriority,
};

/// What to put in someone's inbox.
#[derive(Debug, Clone)]
pub struct InAppMessage {
    pub recipient: Uuid,
    pub deadline_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub priority: NotificationPriority,
}

/// In-app notification channel.
#[async_trait]
pub trait InAppNotifier: Send + Sync + Debug {
    async fn create(&self, message: InAppMessage, now: DateTime<Utc>) -> AppResult<Notification>;
}

/// Writes notifications to the notification store.
#[derive(Debug, Clone)]
pub struct StoredInAppNotifier {
    store: Arc<dyn NotificationStore>,
    /// Notifications expire this many days after creation; `None` keeps them.
    ttl_days: Option<i64>,
}

impl StoredInAppNotifier {
    /// Persist notifications through `store`; they never expire unless a TTL is set.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self {
            store,
            ttl_days: None,
        }
    }

    /// Expire created notifications after `days`.
    pub fn with_ttl_days(mut self, days: i64) -> Self {
        self.ttl_days = Some(days);
        self
    }
}

#[async_trait]
impl InAppNotifier for StoredInAppNotifier {
    async fn create(&self, message: InAppMessage, now: DateTime<Utc>) -> AppResult<Notification> {
        let new = NewNotification {
            user_id: message.recipient,
            deadline_id: message.deadline_id,
            kind: message.kind,
            title: message.title,
            message: message.message,
            payload: message.data,
            priority: message.priority,
            expires_at: self.ttl_days.map(|d| now + chrono::Duration::days(d)),
        };
        self.store.create(&new, now).await
    }
}

/// Rejects deliveries to the listed users and forwards the rest.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct FailingInAppNotifier {
    inner: Arc<dyn InAppNotifier>,
    fail_for: Vec<Uuid>,
}

#[cfg(any(test, feature = "testing"))]
impl FailingInAppNotifier {
    pub fn new(inner: Arc<dyn InAppNotifier>, fail_for: Vec<Uuid>) -> Self {
        Self { inner, fail_for }
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl InAppNotifier for FailingInAppNotifier {
    async fn create(&self, message: InAppMessage, now: DateTime<Utc>) -> AppResult<Notification> {
        if self.fail_for.contains(&message.recipient) {
            return Err(deadline_core::AppError::database("simulated insert failure"));
        }
        self.inner.create(message, now).await
    }
}
