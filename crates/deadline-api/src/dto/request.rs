//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use deadline_entity::deadline::{DeadlinePriority, DeadlineStatus, UpdateDeadline};
use deadline_entity::notification::NotificationPreferences;
use deadline_service::collaboration::{AddCollaboratorsOptions, CopyOptions};
use deadline_service::deadline::CreateDeadlineInput;

/// Create deadline request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDeadlineRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(max = 10000, message = "Description is too long"))]
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub priority: Option<DeadlinePriority>,
    pub status: Option<DeadlineStatus>,
}

impl From<CreateDeadlineRequest> for CreateDeadlineInput {
    fn from(req: CreateDeadlineRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            due_at: req.due_at,
            priority: req.priority,
            status: req.status,
        }
    }
}

/// Partial deadline update. `"description": null` clears the description;
/// an absent key leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDeadlineRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    pub due_at: Option<DateTime<Utc>>,
    pub status: Option<DeadlineStatus>,
    pub priority: Option<DeadlinePriority>,
}

impl From<UpdateDeadlineRequest> for UpdateDeadline {
    fn from(req: UpdateDeadlineRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            due_at: req.due_at,
            status: req.status,
            priority: req.priority,
        }
    }
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Add collaborators request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCollaboratorsRequest {
    /// Candidate user IDs.
    #[validate(length(min = 1, message = "At least one collaborator is required"))]
    pub collaborators: Vec<Uuid>,
    /// Give each candidate a private copy instead of shared access.
    #[serde(default)]
    pub create_copies: bool,
    #[serde(default)]
    pub copy_options: CopyOptions,
}

impl AddCollaboratorsRequest {
    pub fn options(&self) -> AddCollaboratorsOptions {
        AddCollaboratorsOptions {
            create_copies: self.create_copies,
            copy_options: self.copy_options.clone(),
        }
    }
}

/// Replace the caller's notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferences: NotificationPreferences,
}
