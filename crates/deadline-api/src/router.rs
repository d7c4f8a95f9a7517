//! Route definitions for the deadline tracker HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(deadline_routes())
        .merge(collaborator_routes())
        .merge(notification_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.server.body_limit_bytes))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn deadline_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/deadlines",
            get(handlers::deadline::list_deadlines).post(handlers::deadline::create_deadline),
        )
        .route(
            "/deadlines/{id}",
            get(handlers::deadline::get_deadline)
                .put(handlers::deadline::update_deadline)
                .delete(handlers::deadline::delete_deadline),
        )
        .route(
            "/deadlines/{id}/complete",
            post(handlers::deadline::complete_deadline),
        )
}

fn collaborator_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/deadlines/{id}/collaborators",
            get(handlers::collaborator::list_collaborators)
                .post(handlers::collaborator::add_collaborators),
        )
        .route(
            "/deadlines/{id}/collaborators/{user_id}",
            delete(handlers::collaborator::remove_collaborator),
        )
}

/// Inbox and preference endpoints. Static segments win over `{id}`.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/preferences",
            get(handlers::notification::get_preferences)
                .put(handlers::notification::update_preferences),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
