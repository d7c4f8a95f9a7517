//! Route handlers organized by domain.

pub mod collaborator;
pub mod deadline;
pub mod health;
pub mod notification;
