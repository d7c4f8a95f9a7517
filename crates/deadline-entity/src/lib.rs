//! # deadline-entity
//!
//! Domain entity models for the deadline tracker. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.

pub mod collaborator;
pub mod deadline;
pub mod friendship;
pub mod notification;
pub mod user;
