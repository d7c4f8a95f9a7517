//! Friendship entities.

pub mod model;

pub use model::{Friendship, FriendshipStatus};
