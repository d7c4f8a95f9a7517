//! Copy provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Records that `recipient_id` received a private copy of a deadline.
///
/// Provenance only. A copy record never grants access to the source.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CopyRecord {
    pub id: Uuid,
    pub source_deadline_id: Uuid,
    pub copy_deadline_id: Uuid,
    pub recipient_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
