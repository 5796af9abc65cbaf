//! Bookmark domain model.
//!
//! # Responsibility
//! - Define the persisted bookmark record and its write DTOs.
//! - Validate the fields every write path depends on.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused.
//! - `user_id` is fixed at creation; no DTO carries an owner field.
//! - `title` and `link` are never empty. Whitespace is content, not format.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned bookmark identifier.
pub type BookmarkId = i64;

/// Trusted numeric identity of the calling user.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = i64;

/// Persisted bookmark record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    /// Owner. Only consulted for the owner-equality check.
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    /// Free-form URL/URI text. No format validation beyond non-empty.
    pub link: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped on every successful edit.
    pub updated_at: i64,
}

impl Bookmark {
    /// Returns whether `user_id` owns this record.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Input for creating one bookmark. The owner is supplied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewBookmark {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates required fields before persistence.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is empty.
    /// - `EmptyLink` when `link` is empty.
    pub fn validate(&self) -> Result<(), BookmarkValidationError> {
        if self.title.is_empty() {
            return Err(BookmarkValidationError::EmptyTitle);
        }
        if self.link.is_empty() {
            return Err(BookmarkValidationError::EmptyLink);
        }
        Ok(())
    }
}

/// Partial update for one bookmark.
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl BookmarkPatch {
    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.link.is_none()
    }

    /// Validates supplied fields. Absent fields are always valid.
    pub fn validate(&self) -> Result<(), BookmarkValidationError> {
        if matches!(self.title.as_deref(), Some(title) if title.is_empty()) {
            return Err(BookmarkValidationError::EmptyTitle);
        }
        if matches!(self.link.as_deref(), Some(link) if link.is_empty()) {
            return Err(BookmarkValidationError::EmptyLink);
        }
        Ok(())
    }
}

/// Field-level validation failures for bookmark writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkValidationError {
    EmptyTitle,
    EmptyLink,
}

impl Display for BookmarkValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "bookmark title cannot be empty"),
            Self::EmptyLink => write!(f, "bookmark link cannot be empty"),
        }
    }
}

impl Error for BookmarkValidationError {}
