//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use deadline_core::config::ServerConfig;
use deadline_database::DatabasePool;
use deadline_service::{CollaborationService, DeadlineService, NotificationService};

use crate::jwt::JwtDecoder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// HTTP server configuration (CORS, body limit)
    pub server: Arc<ServerConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when the stores are in-process
    pub db_pool: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub deadline_service: Arc<DeadlineService>,
    pub collaboration_service: Arc<CollaborationService>,
    pub notification_service: Arc<NotificationService>,
}
