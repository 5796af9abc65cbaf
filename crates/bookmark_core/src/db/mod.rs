//! SQLite storage for users and bookmarks.
//!
//! Connections come from [`open_db`] or [`open_db_in_memory`] with the
//! schema already at [`migrations::latest_version`]. Callers own the
//! connection and lend it to repositories.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{clean_db, open_db, open_db_in_memory};

/// Current time as epoch milliseconds, evaluated by SQLite.
pub(crate) const NOW_EPOCH_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, migrating or wiping a bookmark database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build than this one.
    SchemaTooNew { found: u32, supported: u32 },
    /// Migration script `version` failed; nothing from the batch was kept.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "bookmark schema v{found} is newer than this build supports (v{supported})"
            ),
            Self::Migration { version, source } => {
                write!(f, "bookmark schema migration v{version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
