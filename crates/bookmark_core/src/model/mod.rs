//! Domain model for users and their bookmarks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep write DTOs free of owner fields.
//!
//! # Invariants
//! - Every bookmark has exactly one owning user.
//! - Deletion is a hard delete; there are no tombstones.

pub mod bookmark;
pub mod user;
