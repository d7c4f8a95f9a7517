//! Deadline CRUD handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use deadline_entity::deadline::Deadline;
use deadline_service::deadline::DeadlineView;

use crate::dto::request::{CreateDeadlineRequest, UpdateDeadlineRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/deadlines
pub async fn list_deadlines(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Deadline>>>, ApiError> {
    let deadlines = state.deadline_service.list_for_user(&auth).await?;
    Ok(Json(ApiResponse::ok(deadlines)))
}

/// POST /api/deadlines
pub async fn create_deadline(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateDeadlineRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Deadline>>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let deadline = state.deadline_service.create(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Deadline created", deadline)),
    ))
}

/// GET /api/deadlines/{id}
pub async fn get_deadline(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeadlineView>>, ApiError> {
    let view = state.deadline_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/deadlines/{id}
pub async fn update_deadline(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateDeadlineRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Deadline>>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let deadline = state.deadline_service.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::with_message("Deadline updated", deadline)))
}

/// POST /api/deadlines/{id}/complete
pub async fn complete_deadline(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Deadline>>, ApiError> {
    let deadline = state.deadline_service.complete(&auth, id).await?;
    Ok(Json(ApiResponse::with_message("Deadline completed", deadline)))
}

/// DELETE /api/deadlines/{id}
pub async fn delete_deadline(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.deadline_service.delete(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Deadline deleted" }),
    ))
}
