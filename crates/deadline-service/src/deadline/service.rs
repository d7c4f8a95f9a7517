//! Deadline creation, retrieval, update and deletion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use deadline_core::error::AppError;
use deadline_core::result::AppResult;
use deadline_core::traits::Clock;
use deadline_database::traits::DeadlineStore;
use deadline_entity::deadline::{
    Deadline, DeadlinePriority, DeadlineStatus, NewDeadline, OVERDUE_MARKER, ReminderLead,
    UpdateDeadline,
};

use super::{MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use crate::collaboration::{Access, AccessService};
use crate::context::RequestContext;

/// Fields accepted when creating a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeadlineInput {
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub priority: Option<DeadlinePriority>,
    pub status: Option<DeadlineStatus>,
}

/// A deadline together with the caller's rights on it.
#[derive(Debug, Clone, Serialize)]
pub struct DeadlineView {
    #[serde(flatten)]
    pub deadline: Deadline,
    pub access: Access,
}

/// Deadline CRUD with access checks.
#[derive(Debug, Clone)]
pub struct DeadlineService {
    deadlines: Arc<dyn DeadlineStore>,
    access: Arc<AccessService>,
    clock: Arc<dyn Clock>,
}

impl DeadlineService {
    /// Create a new deadline service.
    pub fn new(
        deadlines: Arc<dyn DeadlineStore>,
        access: Arc<AccessService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            deadlines,
            access,
            clock,
        }
    }

    /// Create a deadline owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, input: CreateDeadlineInput) -> AppResult<Deadline> {
        let title = validate_title(&input.title)?;
        let description = validate_description(input.description)?;
        let status = input.status.unwrap_or_default();
        if status == DeadlineStatus::Overdue {
            return Err(AppError::validation(
                "Status 'overdue' is set automatically once the due date passes",
            ));
        }
        let now = self.clock.now();

        let new = NewDeadline {
            id: Uuid::new_v4(),
            owner_id: ctx.user_id,
            title,
            description,
            due_at: input.due_at,
            status,
            priority: input.priority.unwrap_or_default(),
            origin_deadline_id: None,
        };
        let mut deadline = self.deadlines.create(&new, now).await?;
        if status.is_completed() {
            deadline.completed_at = Some(now);
            deadline = self.deadlines.update(&deadline, &[], now).await?;
        }

        info!(
            request_id = %ctx.request_id,
            deadline_id = %deadline.id,
            owner_id = %ctx.user_id,
            due_at = %deadline.due_at,
            "Deadline created"
        );
        Ok(deadline)
    }

    /// A deadline the caller can see, with their rights on it.
    pub async fn get(&self, ctx: &RequestContext, deadline_id: Uuid) -> AppResult<DeadlineView> {
        let (deadline, access) = self.access.require_view(deadline_id, ctx.user_id).await?;
        Ok(DeadlineView { deadline, access })
    }

    /// Owned and collaborated deadlines, soonest first.
    pub async fn list_for_user(&self, ctx: &RequestContext) -> AppResult<Vec<Deadline>> {
        self.deadlines.list_accessible(ctx.user_id).await
    }

    /// Apply a partial update.
    ///
    /// Changing `due_at` re-arms the reminders. The overdue notice is re-armed
    /// only when the new due date lies in the future.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        deadline_id: Uuid,
        patch: UpdateDeadline,
    ) -> AppResult<Deadline> {
        if patch.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        let (mut deadline, _) = self.access.require_edit(deadline_id, ctx.user_id).await?;
        let now = self.clock.now();

        if let Some(title) = patch.title {
            deadline.title = validate_title(&title)?;
        }
        if let Some(description) = patch.description {
            deadline.description = validate_description(description)?;
        }
        if let Some(priority) = patch.priority {
            deadline.priority = priority;
        }

        let due_changed = patch.due_at.is_some_and(|due| due != deadline.due_at);
        if let Some(due_at) = patch.due_at {
            deadline.due_at = due_at;
        }

        match patch.status {
            Some(DeadlineStatus::Overdue)
                if deadline.status != DeadlineStatus::Overdue || deadline.due_at > now =>
            {
                return Err(AppError::validation(
                    "Status 'overdue' is set automatically once the due date passes",
                ));
            }
            Some(status) => apply_status(&mut deadline, status, now),
            None if due_changed
                && deadline.status == DeadlineStatus::Overdue
                && deadline.due_at > now =>
            {
                deadline.status = DeadlineStatus::Pending;
            }
            None => {}
        }

        let rearm = if due_changed {
            rearmed_markers(deadline.due_at, now)
        } else {
            Vec::new()
        };
        let updated = self.deadlines.update(&deadline, &rearm, now).await?;
        info!(
            request_id = %ctx.request_id,
            deadline_id = %updated.id,
            editor_id = %ctx.user_id,
            status = %updated.status.as_str(),
            markers_rearmed = rearm.len(),
            "Deadline updated"
        );
        Ok(updated)
    }

    /// Mark a deadline completed.
    pub async fn complete(&self, ctx: &RequestContext, deadline_id: Uuid) -> AppResult<Deadline> {
        self.update(
            ctx,
            deadline_id,
            UpdateDeadline {
                status: Some(DeadlineStatus::Completed),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a deadline. Requires delete rights.
    pub async fn delete(&self, ctx: &RequestContext, deadline_id: Uuid) -> AppResult<()> {
        let (deadline, _) = self.access.require_delete(deadline_id, ctx.user_id).await?;
        if !self.deadlines.delete(deadline.id).await? {
            return Err(AppError::not_found(format!("Deadline {deadline_id} not found")));
        }
        info!(
            request_id = %ctx.request_id,
            deadline_id = %deadline.id,
            deleted_by = %ctx.user_id,
            "Deadline deleted"
        );
        Ok(())
    }
}

fn apply_status(deadline: &mut Deadline, status: DeadlineStatus, now: DateTime<Utc>) {
    if status.is_completed() && !deadline.status.is_completed() {
        deadline.completed_at = Some(now);
    } else if !status.is_completed() {
        deadline.completed_at = None;
    }
    deadline.status = status;
}

/// Marker keys to drop once the due date moves to `due_at`.
fn rearmed_markers(due_at: DateTime<Utc>, now: DateTime<Utc>) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = ReminderLead::ALL.iter().map(|l| l.marker_key()).collect();
    if due_at > now {
        keys.push(OVERDUE_MARKER);
    }
    keys
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: Option<String>) -> AppResult<Option<String>> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_CHARS => Err(AppError::validation(
            format!("Description must be at most {MAX_DESCRIPTION_CHARS} characters"),
        )),
        Some(text) if text.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}
