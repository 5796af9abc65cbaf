//! Bookmark access service.
//!
//! # Responsibility
//! - Provide owner-checked CRUD entry points for bookmark callers.
//! - Collapse "missing" and "owned by someone else" into one error.
//!
//! # Invariants
//! - Every operation takes a trusted caller id and never re-authenticates.
//! - `get_bookmark` filters by id and owner in one lookup.
//! - `edit_bookmark_by_id` and `delete_bookmark_by_id` fetch by id alone and
//!   then compare owners. Both paths yield the same `AccessDenied`.
//! - Storage failures propagate unchanged inside `Repo`.

use crate::model::bookmark::{Bookmark, BookmarkId, BookmarkPatch, NewBookmark, UserId};
use crate::repo::bookmark_repo::BookmarkRepository;
use crate::repo::RepoError;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for bookmark use-cases.
#[derive(Debug)]
pub enum BookmarkServiceError {
    /// No record with that id is owned by the caller.
    AccessDenied,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl BookmarkServiceError {
    /// HTTP status a transport layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AccessDenied => 403,
            Self::Repo(RepoError::Validation(_)) => 400,
            Self::Repo(_) => 500,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied)
    }
}

impl Display for BookmarkServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "access to resource denied"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookmarkServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AccessDenied => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BookmarkServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type BookmarkServiceResult<T> = Result<T, BookmarkServiceError>;

/// Owner-scoped bookmark service over an injected repository.
pub struct BookmarkService<R: BookmarkRepository> {
    repo: R,
}

impl<R: BookmarkRepository> BookmarkService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every bookmark owned by `user_id`, in storage order.
    pub fn list_bookmarks(&self, user_id: UserId) -> BookmarkServiceResult<Vec<Bookmark>> {
        Ok(self.repo.list_bookmarks(user_id)?)
    }

    /// Gets one bookmark owned by `user_id`.
    ///
    /// # Errors
    /// - `AccessDenied` when no bookmark with that id belongs to the caller.
    pub fn get_bookmark(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
    ) -> BookmarkServiceResult<Bookmark> {
        self.repo
            .find_owned_bookmark(user_id, bookmark_id)?
            .ok_or_else(|| deny("get", bookmark_id))
    }

    /// Creates one bookmark owned by `user_id`.
    pub fn create_bookmark(
        &self,
        user_id: UserId,
        data: &NewBookmark,
    ) -> BookmarkServiceResult<Bookmark> {
        let bookmark = self.repo.create_bookmark(user_id, data)?;
        debug!(
            "event=bookmark_create module=service status=ok bookmark_id={}",
            bookmark.id
        );
        Ok(bookmark)
    }

    /// Applies a partial update to one bookmark owned by `user_id`.
    ///
    /// The update is keyed on the caller's own id; the owner is never
    /// written.
    ///
    /// # Errors
    /// - `AccessDenied` when the bookmark is missing or owned by another user.
    pub fn edit_bookmark_by_id(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
        patch: &BookmarkPatch,
    ) -> BookmarkServiceResult<Bookmark> {
        self.ensure_owner(user_id, bookmark_id, "edit")?;
        let updated = self
            .repo
            .update_bookmark(user_id, bookmark_id, patch)
            .map_err(|err| not_found_as_denied(err, "edit", bookmark_id))?;
        debug!(
            "event=bookmark_edit module=service status=ok bookmark_id={}",
            bookmark_id
        );
        Ok(updated)
    }

    /// Permanently deletes one bookmark owned by `user_id`.
    ///
    /// Returns the removed record.
    ///
    /// # Errors
    /// - `AccessDenied` when the bookmark is missing or owned by another user.
    pub fn delete_bookmark_by_id(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
    ) -> BookmarkServiceResult<Bookmark> {
        let bookmark = self.ensure_owner(user_id, bookmark_id, "delete")?;
        self.repo
            .delete_bookmark(user_id, bookmark_id)
            .map_err(|err| not_found_as_denied(err, "delete", bookmark_id))?;
        debug!(
            "event=bookmark_delete module=service status=ok bookmark_id={}",
            bookmark_id
        );
        Ok(bookmark)
    }

    fn ensure_owner(
        &self,
        user_id: UserId,
        bookmark_id: BookmarkId,
        op: &'static str,
    ) -> BookmarkServiceResult<Bookmark> {
        match self.repo.find_bookmark(bookmark_id)? {
            Some(bookmark) if bookmark.is_owned_by(user_id) => Ok(bookmark),
            _ => Err(deny(op, bookmark_id)),
        }
    }
}

fn deny(op: &'static str, bookmark_id: BookmarkId) -> BookmarkServiceError {
    warn!(
        "event=bookmark_access_denied module=service op={} bookmark_id={}",
        op, bookmark_id
    );
    BookmarkServiceError::AccessDenied
}

// The row can vanish between the ownership check and the write when another
// caller deletes it concurrently.
fn not_found_as_denied(
    err: RepoError,
    op: &'static str,
    bookmark_id: BookmarkId,
) -> BookmarkServiceError {
    match err {
        RepoError::NotFound { .. } => deny(op, bookmark_id),
        other => BookmarkServiceError::Repo(other),
    }
}

#[cfg(test)]
mod tests {
    use super::{BookmarkService, BookmarkServiceError};
    use crate::model::bookmark::{
        Bookmark, BookmarkId, BookmarkPatch, BookmarkValidationError, NewBookmark, UserId,
    };
    use crate::repo::bookmark_repo::BookmarkRepository;
    use crate::repo::{RepoError, RepoResult};
    use std::cell::RefCell;

    /// In-process repository used to pin the service protocol without SQL.
    #[derive(Default)]
    struct MemoryRepo {
        rows: RefCell<Vec<Bookmark>>,
        owned_lookups: RefCell<u32>,
        plain_lookups: RefCell<u32>,
    }

    impl BookmarkRepository for MemoryRepo {
        fn create_bookmark(&self, owner: UserId, data: &NewBookmark) -> RepoResult<Bookmark> {
            data.validate()?;
            let mut rows = self.rows.borrow_mut();
            let bookmark = Bookmark {
                id: rows.len() as BookmarkId + 1,
                user_id: owner,
                title: data.title.clone(),
                description: data.description.clone(),
                link: data.link.clone(),
                created_at: 1,
                updated_at: 1,
            };
            rows.push(bookmark.clone());
            Ok(bookmark)
        }

        fn find_bookmark(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
            *self.plain_lookups.borrow_mut() += 1;
            Ok(self.rows.borrow().iter().find(|b| b.id == id).cloned())
        }

        fn find_owned_bookmark(
            &self,
            owner: UserId,
            id: BookmarkId,
        ) -> RepoResult<Option<Bookmark>> {
            *self.owned_lookups.borrow_mut() += 1;
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|b| b.id == id && b.user_id == owner)
                .cloned())
        }

        fn list_bookmarks(&self, owner: UserId) -> RepoResult<Vec<Bookmark>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .filter(|b| b.user_id == owner)
                .cloned()
                .collect())
        }

        fn update_bookmark(
            &self,
            owner: UserId,
            id: BookmarkId,
            patch: &BookmarkPatch,
        ) -> RepoResult<Bookmark> {
            let mut rows = self.rows.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|b| b.id == id && b.user_id == owner)
                .ok_or(RepoError::NotFound {
                    entity: "bookmark",
                    id,
                })?;
            if let Some(title) = &patch.title {
                row.title = title.clone();
            }
            if let Some(description) = &patch.description {
                row.description = Some(description.clone());
            }
            if let Some(link) = &patch.link {
                row.link = link.clone();
            }
            row.updated_at += 1;
            Ok(row.clone())
        }

        fn delete_bookmark(&self, owner: UserId, id: BookmarkId) -> RepoResult<()> {
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|b| !(b.id == id && b.user_id == owner));
            if rows.len() == before {
                return Err(RepoError::NotFound {
                    entity: "bookmark",
                    id,
                });
            }
            Ok(())
        }
    }

    #[test]
    fn get_uses_owner_scoped_lookup_and_edit_uses_plain_lookup() {
        let service = BookmarkService::new(MemoryRepo::default());
        let created = service
            .create_bookmark(1, &NewBookmark::new("t", "l"))
            .unwrap();

        service.get_bookmark(1, created.id).unwrap();
        assert_eq!(*service.repo.owned_lookups.borrow(), 1);
        assert_eq!(*service.repo.plain_lookups.borrow(), 0);

        service
            .edit_bookmark_by_id(1, created.id, &BookmarkPatch::default())
            .unwrap();
        assert_eq!(*service.repo.plain_lookups.borrow(), 1);
    }

    #[test]
    fn get_denies_foreign_and_missing_ids_with_one_owned_lookup_each() {
        let service = BookmarkService::new(MemoryRepo::default());
        let created = service
            .create_bookmark(1, &NewBookmark::new("t", "l"))
            .unwrap();

        let foreign = service.get_bookmark(2, created.id).unwrap_err();
        let missing = service.get_bookmark(1, created.id + 100).unwrap_err();
        assert!(foreign.is_access_denied());
        assert!(missing.is_access_denied());
        assert_eq!(foreign.to_string(), missing.to_string());
        assert_eq!(*service.repo.owned_lookups.borrow(), 2);
        assert_eq!(*service.repo.plain_lookups.borrow(), 0);
    }

    #[test]
    fn foreign_owner_is_denied_without_touching_the_row() {
        let service = BookmarkService::new(MemoryRepo::default());
        let created = service
            .create_bookmark(1, &NewBookmark::new("t", "l"))
            .unwrap();

        let patch = BookmarkPatch {
            title: Some("stolen".to_string()),
            ..BookmarkPatch::default()
        };
        let err = service.edit_bookmark_by_id(2, created.id, &patch).unwrap_err();
        assert!(err.is_access_denied());
        assert_eq!(err.http_status(), 403);
        assert_eq!(err.to_string(), "access to resource denied");

        assert_eq!(service.get_bookmark(1, created.id).unwrap().title, "t");
    }

    #[test]
    fn validation_errors_surface_as_repo_errors() {
        let service = BookmarkService::new(MemoryRepo::default());
        let err = service
            .create_bookmark(1, &NewBookmark::new("", "l"))
            .unwrap_err();
        assert!(matches!(
            err,
            BookmarkServiceError::Repo(RepoError::Validation(BookmarkValidationError::EmptyTitle))
        ));
        assert_eq!(err.http_status(), 400);
    }
}
