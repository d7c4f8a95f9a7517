//! Application builder: wires router, middleware and state into an Axum app
//! and serves it.

use axum::Router;
use tokio::sync::watch;

use deadline_core::config::ServerConfig;
use deadline_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Binds the listener and serves until `shutdown` flips to `true`.
pub async fn serve(
    app: Router,
    config: &ServerConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "Deadline tracker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("HTTP server draining connections");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}
