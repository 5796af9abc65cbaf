//! User profile repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Emails are normalized by the caller before they reach SQL.
//! - Profile updates touch only the row of the given user id.

use super::{ensure_tables, RepoError, RepoResult};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::bookmark::UserId;
use crate::model::user::{User, UserPatch};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    email,
    first_name,
    last_name,
    created_at,
    updated_at
FROM users";

/// Repository interface for user profiles.
pub trait UserRepository {
    /// Inserts a user with an already-normalized email.
    fn create_user(&self, email: &str) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Applies `patch` to the given user and returns the stored row.
    fn update_user(&self, id: UserId, patch: &UserPatch) -> RepoResult<User>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, email: &str) -> RepoResult<User> {
        self.conn.execute(
            &format!(
                "INSERT INTO users (email, created_at, updated_at)
                 VALUES (?1, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
            ),
            [email],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("user {id} missing after insert")))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn update_user(&self, id: UserId, patch: &UserPatch) -> RepoResult<User> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE users
                 SET
                    email = COALESCE(?2, email),
                    first_name = COALESCE(?3, first_name),
                    last_name = COALESCE(?4, last_name),
                    updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                 WHERE id = ?1;"
            ),
            params![
                id,
                patch.email.as_deref(),
                patch.first_name.as_deref(),
                patch.last_name.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }

        self.get_user(id)?
            .ok_or(RepoError::NotFound { entity: "user", id })
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let email: String = row.get("email")?;
    if email.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "blank email in users.email".to_string(),
        ));
    }

    Ok(User {
        id: row.get("id")?,
        email,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
