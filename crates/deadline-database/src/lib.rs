//! # deadline-database
//!
//! Store traits consumed by the services, their PostgreSQL implementations,
//! the connection pool and the migration runner. The `memory` feature adds
//! an in-process implementation of every store.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod traits;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use connection::DatabasePool;
pub use traits::{CollaboratorStore, DeadlineStore, FriendshipDirectory, NotificationStore, UserDirectory};
