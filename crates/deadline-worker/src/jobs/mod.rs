//! The scheduled passes, one module each.

pub mod cleanup;
pub mod overdue;
pub mod reminder;
pub mod summary;
