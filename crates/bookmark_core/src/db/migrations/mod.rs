//! Bookmark schema scripts, applied in order and tracked by
//! `PRAGMA user_version`.
//!
//! Script `n` in [`SCHEMA_SCRIPTS`] moves the schema to version `n + 1`.
//! Scripts are append-only: edit by adding a new one.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_SCRIPTS: &[&str] = &[include_str!("0001_init.sql")];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_SCRIPTS.len() as u32
}

/// Brings the schema on `conn` up to [`latest_version`] in one transaction.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` when a script fails; the schema is left as it was.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    upgrade(conn, SCHEMA_SCRIPTS)
}

fn upgrade(conn: &mut Connection, scripts: &[&str]) -> DbResult<()> {
    let supported = scripts.len() as u32;
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }
    if found == supported {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, script) in (1..).zip(scripts).skip(found as usize) {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration { version, source })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={} to={}",
        found, supported
    );
    Ok(())
}
