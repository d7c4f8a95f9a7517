//! Collaborator handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use uuid::Uuid;
use validator::Validate;

use deadline_entity::collaborator::CollaboratorEntry;
use deadline_service::collaboration::AddCollaboratorsOutcome;

use crate::dto::request::AddCollaboratorsRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/deadlines/{id}/collaborators
pub async fn list_collaborators(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CollaboratorEntry>>>, ApiError> {
    let entries = state
        .collaboration_service
        .list_collaborators(&auth, id)
        .await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// POST /api/deadlines/{id}/collaborators
///
/// Always 200 once the request itself is allowed; per-candidate results
/// are in `added`, `skipped` and `denied`.
pub async fn add_collaborators(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<AddCollaboratorsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AddCollaboratorsOutcome>>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let outcome = state
        .collaboration_service
        .add_collaborators(&auth, id, &req.collaborators, &req.options())
        .await?;
    let message = format!(
        "{} added, {} skipped, {} denied",
        outcome.added.len(),
        outcome.skipped.len(),
        outcome.denied.len()
    );
    Ok(Json(ApiResponse::with_message(message, outcome)))
}

/// DELETE /api/deadlines/{id}/collaborators/{user_id}
pub async fn remove_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .collaboration_service
        .remove_collaborator(&auth, id, user_id)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Collaborator removed" }),
    ))
}
