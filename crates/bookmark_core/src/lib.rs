//! Core domain logic for the bookmark vault.
//! This crate owns every ownership rule; callers only supply a trusted user id.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::bookmark::{
    Bookmark, BookmarkId, BookmarkPatch, BookmarkValidationError, NewBookmark, UserId,
};
pub use model::user::{User, UserPatch};
pub use repo::bookmark_repo::{BookmarkRepository, SqliteBookmarkRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::bookmark_service::{
    BookmarkService, BookmarkServiceError, BookmarkServiceResult,
};
pub use service::user_service::{UserService, UserServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
