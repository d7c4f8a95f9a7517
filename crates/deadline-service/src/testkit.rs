//! Service wiring over the in-memory store for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use deadline_core::traits::{Clock, ManualClock};
use deadline_database::memory::MemoryStore;
use deadline_database::traits::DeadlineStore;
use deadline_entity::deadline::Deadline;
use deadline_entity::friendship::FriendshipStatus;

use crate::collaboration::{AccessService, AddCollaboratorsOptions, CollaborationService};
use crate::context::RequestContext;
use crate::deadline::{CreateDeadlineInput, DeadlineService};
use crate::notification::NotificationService;
use crate::notifier::{InAppNotifier, StoredInAppNotifier};

pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub access: Arc<AccessService>,
    pub in_app: Arc<dyn InAppNotifier>,
    pub collaboration: CollaborationService,
    pub deadlines: DeadlineService,
    pub notifications: NotificationService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let in_app: Arc<dyn InAppNotifier> = Arc::new(StoredInAppNotifier::new(store.clone()));
        Self::build(store, in_app)
    }

    /// Same wiring with a custom in-app channel for the collaboration engine.
    pub fn with_in_app(store: Arc<MemoryStore>, in_app: Arc<dyn InAppNotifier>) -> Self {
        Self::build(store, in_app)
    }

    fn build(store: Arc<MemoryStore>, in_app: Arc<dyn InAppNotifier>) -> Self {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let access = Arc::new(AccessService::new(store.clone(), store.clone()));
        let collaboration = CollaborationService::new(
            access.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            in_app.clone(),
            clock.clone(),
        );
        let deadlines = DeadlineService::new(store.clone(), access.clone(), clock.clone());
        let notifications = NotificationService::new(store.clone(), store.clone(), clock.clone());
        Self {
            store,
            clock,
            access,
            in_app,
            collaboration,
            deadlines,
            notifications,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn user(&self, username: &str) -> RequestContext {
        let email = format!("{username}@example.com");
        RequestContext::new(self.store.add_user(username, Some(&email)))
    }

    pub fn befriend(&self, a: &RequestContext, b: &RequestContext) {
        self.store
            .set_friendship(a.user_id, b.user_id, FriendshipStatus::Accepted);
    }

    /// A deadline due three days from now.
    pub async fn deadline(&self, owner: &RequestContext, title: &str) -> Deadline {
        self.deadlines
            .create(
                owner,
                CreateDeadlineInput {
                    title: title.to_string(),
                    description: Some(format!("{title} notes")),
                    due_at: self.now() + Duration::days(3),
                    priority: None,
                    status: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn add_direct(&self, requester: &RequestContext, deadline_id: Uuid, user: &RequestContext) {
        let outcome = self
            .collaboration
            .add_collaborators(
                requester,
                deadline_id,
                &[user.user_id],
                &AddCollaboratorsOptions::default(),
            )
            .await
            .unwrap();
        assert!(outcome.was_added(user.user_id));
    }

    pub async fn reload(&self, deadline_id: Uuid) -> Deadline {
        DeadlineStore::find_by_id(&*self.store, deadline_id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn mark_sent(&self, deadline_id: Uuid, key: &str) {
        let record = deadline_entity::deadline::SentRecord {
            sent_at: self.now(),
            recipients: Vec::new(),
        };
        self.store
            .record_notification(deadline_id, key, &record)
            .await
            .unwrap();
    }
}
