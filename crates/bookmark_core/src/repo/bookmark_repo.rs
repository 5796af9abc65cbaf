//! Bookmark repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed lookup, owner-filtered listing, create, update and delete
//!   over the `bookmarks` table.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths validate DTOs before SQL mutations.
//! - Update and delete are keyed on `(id, user_id)`; `user_id` is never
//!   written after insert.
//! - Read paths reject invalid persisted state instead of masking it.

use super::{ensure_tables, RepoError, RepoResult};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::bookmark::{Bookmark, BookmarkId, BookmarkPatch, NewBookmark, UserId};
use rusqlite::{params, Connection, Params, Row};

const BOOKMARK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    link,
    created_at,
    updated_at
FROM bookmarks";

/// Persistence seam for the bookmark access service.
pub trait BookmarkRepository {
    /// Inserts one bookmark owned by `owner` and returns the stored row.
    fn create_bookmark(&self, owner: UserId, data: &NewBookmark) -> RepoResult<Bookmark>;
    /// Finds one bookmark by primary key regardless of owner.
    fn find_bookmark(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>>;
    /// Finds one bookmark matching both primary key and owner.
    fn find_owned_bookmark(&self, owner: UserId, id: BookmarkId)
        -> RepoResult<Option<Bookmark>>;
    /// Lists all bookmarks of `owner` in ascending id order.
    fn list_bookmarks(&self, owner: UserId) -> RepoResult<Vec<Bookmark>>;
    /// Applies `patch` to the row matching `(id, owner)` and returns it.
    fn update_bookmark(
        &self,
        owner: UserId,
        id: BookmarkId,
        patch: &BookmarkPatch,
    ) -> RepoResult<Bookmark>;
    /// Permanently removes the row matching `(id, owner)`.
    fn delete_bookmark(&self, owner: UserId, id: BookmarkId) -> RepoResult<()>;
}

/// SQLite-backed bookmark repository.
pub struct SqliteBookmarkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookmarkRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the schema has not been migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "bookmarks"])?;
        Ok(Self { conn })
    }

    fn query_one(&self, sql: &str, params: impl Params) -> RepoResult<Option<Bookmark>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_bookmark_row(row)?)),
            None => Ok(None),
        }
    }
}

impl BookmarkRepository for SqliteBookmarkRepository<'_> {
    fn create_bookmark(&self, owner: UserId, data: &NewBookmark) -> RepoResult<Bookmark> {
        data.validate()?;

        self.conn.execute(
            &format!(
                "INSERT INTO bookmarks (
                    user_id,
                    title,
                    description,
                    link,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
            ),
            params![
                owner,
                data.title.as_str(),
                data.description.as_deref(),
                data.link.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.find_bookmark(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("bookmark {id} missing after insert"))
        })
    }

    fn find_bookmark(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
        self.query_one(&format!("{BOOKMARK_SELECT_SQL} WHERE id = ?1;"), [id])
    }

    fn find_owned_bookmark(
        &self,
        owner: UserId,
        id: BookmarkId,
    ) -> RepoResult<Option<Bookmark>> {
        self.query_one(
            &format!("{BOOKMARK_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"),
            params![id, owner],
        )
    }

    fn list_bookmarks(&self, owner: UserId) -> RepoResult<Vec<Bookmark>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOKMARK_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([owner])?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next()? {
            bookmarks.push(parse_bookmark_row(row)?);
        }

        Ok(bookmarks)
    }

    fn update_bookmark(
        &self,
        owner: UserId,
        id: BookmarkId,
        patch: &BookmarkPatch,
    ) -> RepoResult<Bookmark> {
        patch.validate()?;

        // updated_at never moves backwards, even if the wall clock does.
        let changed = self.conn.execute(
            &format!(
                "UPDATE bookmarks
                 SET
                    title = COALESCE(?3, title),
                    description = COALESCE(?4, description),
                    link = COALESCE(?5, link),
                    updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                 WHERE id = ?1
                   AND user_id = ?2;"
            ),
            params![
                id,
                owner,
                patch.title.as_deref(),
                patch.description.as_deref(),
                patch.link.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "bookmark",
                id,
            });
        }

        self.find_owned_bookmark(owner, id)?.ok_or(RepoError::NotFound {
            entity: "bookmark",
            id,
        })
    }

    fn delete_bookmark(&self, owner: UserId, id: BookmarkId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2;",
            params![id, owner],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "bookmark",
                id,
            });
        }

        Ok(())
    }
}

fn parse_bookmark_row(row: &Row<'_>) -> RepoResult<Bookmark> {
    let bookmark = Bookmark {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        link: row.get("link")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };

    if bookmark.title.is_empty() || bookmark.link.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty title or link in bookmarks row {}",
            bookmark.id
        )));
    }

    Ok(bookmark)
}
