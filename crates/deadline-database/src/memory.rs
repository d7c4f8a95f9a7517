//! In-process implementation of every store trait.
//!
//! Backs the service, scheduler and API test suites. Seeding helpers for
//! users and friendships stand in for the account service.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::types::Json;
use uuid::Uuid;

use deadline_core::error::AppError;
use deadline_core::result::AppResult;
use deadline_core::types::pagination::{PageRequest, PageResponse};
use deadline_entity::collaborator::{
    CollaboratorRole, CopyRecord, DeadlineCollaborator, NewCollaborator,
};
use deadline_entity::deadline::{
    Deadline, DeadlineStatus, NewDeadline, NotificationsSent, SentRecord,
};
use deadline_entity::friendship::{Friendship, FriendshipStatus};
use deadline_entity::notification::{NewNotification, Notification, NotificationPreferences};
use deadline_entity::user::{User, UserSummary};

use crate::traits::{
    CollaboratorStore, DeadlineStore, FriendshipDirectory, NotificationStore, UserDirectory,
};

/// All tables in concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    /// Keyed by the ordered pair so lookups are symmetric.
    friendships: DashMap<(Uuid, Uuid), Friendship>,
    deadlines: DashMap<Uuid, Deadline>,
    collaborators: DashMap<(Uuid, Uuid), DeadlineCollaborator>,
    copies: DashMap<Uuid, CopyRecord>,
    notifications: DashMap<Uuid, Notification>,
    fail_preference_lookups: AtomicBool,
}

fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with default preferences and return its id.
    pub fn add_user(&self, username: &str, email: Option<&str>) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.map(str::to_string),
            display_name: None,
            notification_preferences: Json(NotificationPreferences::default()),
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.users.insert(id, user);
        id
    }

    /// Record a friendship between two users, replacing any previous one.
    pub fn set_friendship(&self, a: Uuid, b: Uuid, status: FriendshipStatus) {
        let now = Utc::now();
        self.friendships.insert(
            pair_key(a, b),
            Friendship {
                id: Uuid::new_v4(),
                requester_id: a,
                addressee_id: b,
                status,
                created_at: now,
                updated_at: now,
            },
        );
    }

    /// Make preference lookups fail until switched back.
    pub fn fail_preference_lookups(&self, fail: bool) {
        self.fail_preference_lookups.store(fail, Ordering::SeqCst);
    }

    /// Every deadline row, for assertions.
    pub fn all_deadlines(&self) -> Vec<Deadline> {
        self.deadlines.iter().map(|e| e.value().clone()).collect()
    }

    /// Every notification addressed to `user_id`, newest first.
    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|e| e.value().user_id == user_id)
            .map(|e| e.value().clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    /// Overwrite a stored deadline as-is.
    pub fn put_deadline(&self, deadline: Deadline) {
        self.deadlines.insert(deadline.id, deadline);
    }

    fn build_deadline(new: &NewDeadline, now: DateTime<Utc>) -> Deadline {
        Deadline {
            id: new.id,
            owner_id: new.owner_id,
            title: new.title.clone(),
            description: new.description.clone(),
            due_at: new.due_at,
            status: new.status,
            priority: new.priority,
            origin_deadline_id: new.origin_deadline_id,
            notifications_sent: Json(NotificationsSent::default()),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn insert_with_owner(&self, new: &NewDeadline, now: DateTime<Utc>) -> AppResult<Deadline> {
        if self.deadlines.contains_key(&new.id) {
            return Err(AppError::conflict("Deadline already exists"));
        }
        let deadline = Self::build_deadline(new, now);
        self.collaborators.insert(
            (deadline.id, deadline.owner_id),
            DeadlineCollaborator {
                deadline_id: deadline.id,
                user_id: deadline.owner_id,
                role: CollaboratorRole::Owner,
                can_edit: true,
                can_delete: true,
                added_by: None,
                created_at: now,
            },
        );
        self.deadlines.insert(deadline.id, deadline.clone());
        Ok(deadline)
    }
}

#[async_trait]
impl DeadlineStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deadline>> {
        Ok(self.deadlines.get(&id).map(|d| d.value().clone()))
    }

    async fn create(&self, deadline: &NewDeadline, now: DateTime<Utc>) -> AppResult<Deadline> {
        self.insert_with_owner(deadline, now)
    }

    async fn create_copy(
        &self,
        copy: &NewDeadline,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<(Deadline, CopyRecord)> {
        let source_id = copy
            .origin_deadline_id
            .ok_or_else(|| AppError::validation("A copy must reference its source deadline"))?;
        let duplicate = self.copies.iter().any(|e| {
            e.value().source_deadline_id == source_id && e.value().recipient_id == copy.owner_id
        });
        if duplicate {
            return Err(AppError::conflict("Recipient already has a copy"));
        }
        let deadline = self.insert_with_owner(copy, now)?;
        let record = CopyRecord {
            id: Uuid::new_v4(),
            source_deadline_id: source_id,
            copy_deadline_id: deadline.id,
            recipient_id: copy.owner_id,
            created_by,
            created_at: now,
        };
        self.copies.insert(record.id, record.clone());
        Ok((deadline, record))
    }

    async fn update(
        &self,
        deadline: &Deadline,
        rearm: &[&str],
        now: DateTime<Utc>,
    ) -> AppResult<Deadline> {
        let mut entry = self
            .deadlines
            .get_mut(&deadline.id)
            .ok_or_else(|| AppError::not_found("Deadline not found"))?;
        let stored = entry.value_mut();
        stored.title = deadline.title.clone();
        stored.description = deadline.description.clone();
        stored.due_at = deadline.due_at;
        stored.status = deadline.status;
        stored.priority = deadline.priority;
        stored.completed_at = deadline.completed_at;
        stored.updated_at = now;
        for key in rearm {
            stored.notifications_sent.0.remove(key);
        }
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.deadlines.remove(&id).is_some();
        if removed {
            self.collaborators.retain(|(deadline_id, _), _| *deadline_id != id);
            self.copies.retain(|_, record| {
                record.source_deadline_id != id && record.copy_deadline_id != id
            });
            for mut entry in self.deadlines.iter_mut() {
                if entry.origin_deadline_id == Some(id) {
                    entry.origin_deadline_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn list_accessible(&self, user_id: Uuid) -> AppResult<Vec<Deadline>> {
        let ids: Vec<Uuid> = self
            .collaborators
            .iter()
            .filter(|e| e.value().user_id == user_id)
            .map(|e| e.value().deadline_id)
            .collect();
        let mut items: Vec<Deadline> = ids
            .iter()
            .filter_map(|id| self.deadlines.get(id).map(|d| d.value().clone()))
            .collect();
        items.sort_by_key(|d| d.due_at);
        Ok(items)
    }

    async fn find_due_for_reminder(
        &self,
        marker_key: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> AppResult<Vec<Deadline>> {
        let mut items: Vec<Deadline> = self
            .deadlines
            .iter()
            .map(|e| e.value().clone())
            .filter(|d| {
                d.due_at >= window_start
                    && d.due_at <= window_end
                    && d.status.accepts_reminders()
                    && !d.notifications_sent.contains(marker_key)
            })
            .collect();
        items.sort_by_key(|d| d.due_at);
        Ok(items)
    }

    async fn mark_overdue(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut count = 0;
        for mut entry in self.deadlines.iter_mut() {
            if entry.due_at < now && entry.status.accepts_reminders() {
                entry.status = DeadlineStatus::Overdue;
                entry.updated_at = now;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_overdue_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Deadline>> {
        let mut items: Vec<Deadline> = self
            .deadlines
            .iter()
            .map(|e| e.value().clone())
            .filter(|d| d.status == DeadlineStatus::Overdue && d.due_at >= since && d.due_at < now)
            .collect();
        items.sort_by_key(|d| d.due_at);
        Ok(items)
    }

    async fn record_notification(
        &self,
        id: Uuid,
        marker_key: &str,
        record: &SentRecord,
    ) -> AppResult<()> {
        if let Some(mut entry) = self.deadlines.get_mut(&id) {
            entry.notifications_sent.0.record(
                marker_key,
                record.sent_at,
                record.recipients.clone(),
            );
        }
        Ok(())
    }

    async fn find_users_with_activity(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<Vec<Uuid>> {
        let mut users: Vec<Uuid> = self
            .collaborators
            .iter()
            .filter(|e| {
                self.deadlines
                    .get(&e.value().deadline_id)
                    .map(|d| {
                        !d.status.is_completed()
                            || d.completed_at
                                .map(|at| at >= day_start && at < day_end)
                                .unwrap_or(false)
                    })
                    .unwrap_or(false)
            })
            .map(|e| e.value().user_id)
            .collect();
        users.sort();
        users.dedup();
        Ok(users)
    }
}

#[async_trait]
impl CollaboratorStore for MemoryStore {
    async fn find(
        &self,
        deadline_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<DeadlineCollaborator>> {
        Ok(self
            .collaborators
            .get(&(deadline_id, user_id))
            .map(|c| c.value().clone()))
    }

    async fn list_for_deadline(&self, deadline_id: Uuid) -> AppResult<Vec<DeadlineCollaborator>> {
        let mut rows: Vec<DeadlineCollaborator> = self
            .collaborators
            .iter()
            .filter(|e| e.value().deadline_id == deadline_id)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            b.is_owner()
                .cmp(&a.is_owner())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }

    async fn insert(
        &self,
        collaborator: &NewCollaborator,
        now: DateTime<Utc>,
    ) -> AppResult<DeadlineCollaborator> {
        if !self.deadlines.contains_key(&collaborator.deadline_id) {
            return Err(AppError::not_found("Deadline not found"));
        }
        let key = (collaborator.deadline_id, collaborator.user_id);
        match self.collaborators.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(AppError::conflict("Collaborator already exists"))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let row = DeadlineCollaborator {
                    deadline_id: collaborator.deadline_id,
                    user_id: collaborator.user_id,
                    role: collaborator.role,
                    can_edit: collaborator.can_edit,
                    can_delete: collaborator.can_delete,
                    added_by: collaborator.added_by,
                    created_at: now,
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn remove(&self, deadline_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .collaborators
            .remove_if(&(deadline_id, user_id), |_, row| !row.is_owner())
            .is_some())
    }

    async fn list_copies(&self, deadline_id: Uuid) -> AppResult<Vec<CopyRecord>> {
        let mut records: Vec<CopyRecord> = self
            .copies
            .iter()
            .filter(|e| e.value().source_deadline_id == deadline_id)
            .map(|e| e.value().clone())
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn find_copy_for_recipient(
        &self,
        deadline_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<CopyRecord>> {
        Ok(self
            .copies
            .iter()
            .find(|e| {
                e.value().source_deadline_id == deadline_id && e.value().recipient_id == recipient_id
            })
            .map(|e| e.value().clone()))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(
        &self,
        notification: &NewNotification,
        now: DateTime<Utc>,
    ) -> AppResult<Notification> {
        let stored = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            deadline_id: notification.deadline_id,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            payload: notification.payload.clone(),
            priority: notification.priority,
            is_read: false,
            read_at: None,
            expires_at: notification.expires_at,
            created_at: now,
        };
        self.notifications.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>> {
        let matching: Vec<Notification> = self
            .notifications_for(user_id)
            .into_iter()
            .filter(|n| !unread_only || !n.is_read)
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self
            .notifications
            .iter()
            .filter(|e| e.value().user_id == user_id && !e.value().is_read)
            .count() as u64)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut entry) if entry.user_id == user_id => {
                entry.is_read = true;
                entry.read_at = entry.read_at.or(Some(now));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let mut count = 0;
        for mut entry in self.notifications.iter_mut() {
            if entry.user_id == user_id && !entry.is_read {
                entry.is_read = true;
                entry.read_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .notifications
            .remove_if(&id, |_, n| n.user_id == user_id)
            .is_some())
    }

    async fn delete_expired(
        &self,
        now: DateTime<Utc>,
        read_before: DateTime<Utc>,
    ) -> AppResult<u64> {
        let before = self.notifications.len();
        self.notifications
            .retain(|_, n| !(n.is_expired(now) || (n.is_read && n.created_at < read_before)));
        Ok((before - self.notifications.len()) as u64)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.summary()))
            .collect())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.users.iter().any(|e| {
            e.value()
                .email
                .as_deref()
                .map(|stored| stored.eq_ignore_ascii_case(email))
                .unwrap_or(false)
        }))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.iter().any(|e| e.value().username == username))
    }

    async fn get_notification_preferences(
        &self,
        id: Uuid,
    ) -> AppResult<Option<NotificationPreferences>> {
        if self.fail_preference_lookups.load(Ordering::SeqCst) {
            return Err(AppError::database("Preference lookup failed"));
        }
        Ok(self
            .users
            .get(&id)
            .map(|u| u.notification_preferences.0.clone()))
    }

    async fn update_notification_preferences(
        &self,
        id: Uuid,
        preferences: &NotificationPreferences,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                user.notification_preferences = Json(preferences.clone());
                user.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FriendshipDirectory for MemoryStore {
    async fn get_friendship_status(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> AppResult<Option<FriendshipStatus>> {
        Ok(self.friendships.get(&pair_key(a, b)).map(|f| f.status))
    }
}
