//! Shared fixture for the scheduler integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use deadline_core::config::SchedulerConfig;
use deadline_core::traits::{Clock, ManualClock};
use deadline_database::memory::MemoryStore;
use deadline_database::traits::{DeadlineStore, UserDirectory};
use deadline_entity::deadline::Deadline;
use deadline_entity::friendship::FriendshipStatus;
use deadline_entity::notification::{Notification, NotificationKind, NotificationPreferences};
use deadline_service::collaboration::{AddCollaboratorsOptions, CopyOptions};
use deadline_service::deadline::CreateDeadlineInput;
use deadline_service::notifier::{InAppNotifier, RecordingEmailSender, StoredInAppNotifier};
use deadline_service::{
    AccessService, CollaborationService, DeadlineService, PreferenceChecker, RequestContext,
};
use deadline_worker::NotificationScheduler;

pub struct TestWorld {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub email: Arc<RecordingEmailSender>,
    pub deadlines: DeadlineService,
    pub collaboration: CollaborationService,
    pub scheduler: NotificationScheduler,
}

impl TestWorld {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let in_app: Arc<dyn InAppNotifier> = Arc::new(StoredInAppNotifier::new(store.clone()));
        Self::with_in_app(store, in_app)
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let in_app: Arc<dyn InAppNotifier> = Arc::new(StoredInAppNotifier::new(store.clone()));
        Self::build(store, in_app, config)
    }

    pub fn with_in_app(store: Arc<MemoryStore>, in_app: Arc<dyn InAppNotifier>) -> Self {
        Self::build(store, in_app, SchedulerConfig::default())
    }

    fn build(store: Arc<MemoryStore>, in_app: Arc<dyn InAppNotifier>, config: SchedulerConfig) -> Self {
        let start = Utc.with_ymd_and_hms(2025, 5, 12, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let email = Arc::new(RecordingEmailSender::new());
        let access = Arc::new(AccessService::new(store.clone(), store.clone()));
        let deadlines = DeadlineService::new(store.clone(), access.clone(), clock.clone());
        let collaboration = CollaborationService::new(
            access.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            in_app.clone(),
            clock.clone(),
        );
        let scheduler = NotificationScheduler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            access,
            PreferenceChecker::new(store.clone()),
            email.clone(),
            in_app,
            clock.clone(),
            config,
        );
        Self {
            store,
            clock,
            email,
            deadlines,
            collaboration,
            scheduler,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance(&self, delta: Duration) {
        self.clock.advance(delta);
    }

    /// A user with an `<name>@example.com` address.
    pub fn user(&self, name: &str) -> RequestContext {
        let email = Self::address(name);
        RequestContext::new(self.store.add_user(name, Some(&email)))
    }

    pub fn address(name: &str) -> String {
        format!("{name}@example.com")
    }

    pub fn befriend(&self, a: &RequestContext, b: &RequestContext) {
        self.store
            .set_friendship(a.user_id, b.user_id, FriendshipStatus::Accepted);
    }

    pub async fn deadline_due_in(&self, owner: &RequestContext, title: &str, due_in: Duration) -> Deadline {
        self.deadlines
            .create(
                owner,
                CreateDeadlineInput {
                    title: title.to_string(),
                    description: None,
                    due_at: self.now() + due_in,
                    priority: None,
                    status: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn share(&self, owner: &RequestContext, deadline_id: Uuid, user: &RequestContext) {
        self.collaboration
            .add_collaborators(owner, deadline_id, &[user.user_id], &AddCollaboratorsOptions::default())
            .await
            .unwrap();
    }

    /// Give `user` a private copy and return its id.
    pub async fn copy_to(&self, owner: &RequestContext, deadline_id: Uuid, user: &RequestContext) -> Uuid {
        let outcome = self
            .collaboration
            .add_collaborators(
                owner,
                deadline_id,
                &[user.user_id],
                &AddCollaboratorsOptions {
                    create_copies: true,
                    copy_options: CopyOptions::default(),
                },
            )
            .await
            .unwrap();
        outcome.added[0].copy_id.unwrap()
    }

    pub async fn reload(&self, deadline_id: Uuid) -> Deadline {
        DeadlineStore::find_by_id(&*self.store, deadline_id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn set_preferences(&self, user: &RequestContext, edit: impl FnOnce(&mut NotificationPreferences)) {
        let mut preferences = NotificationPreferences::default();
        edit(&mut preferences);
        self.store
            .update_notification_preferences(user.user_id, &preferences, self.now())
            .await
            .unwrap();
    }

    /// In-app notifications of one kind a user received about `deadline_id`.
    pub fn inbox_for(
        &self,
        user: &RequestContext,
        deadline_id: Uuid,
        kind: NotificationKind,
    ) -> Vec<Notification> {
        self.store
            .notifications_for(user.user_id)
            .into_iter()
            .filter(|n| n.deadline_id == Some(deadline_id) && n.kind == kind)
            .collect()
    }
}
