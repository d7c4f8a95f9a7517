//! # deadline-core
//!
//! Core crate for the deadline tracker. Contains the error system,
//! configuration schemas, pagination types and the
//! clock abstraction used by the scheduler.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
