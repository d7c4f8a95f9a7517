//! # deadline-api
//!
//! HTTP API layer for the deadline tracker built on Axum.
//!
//! Provides the REST endpoints for deadlines, collaborators and the
//! notification inbox, plus bearer token verification, CORS, compression
//! and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
