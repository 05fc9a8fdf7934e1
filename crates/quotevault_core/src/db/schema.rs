//! Quote table schema.
//!
//! # Invariants
//! - `id` is an auto-assigned integer primary key and is never reused.
//! - `body` is `NOT NULL`.
//! - Applying the schema on an existing table is a no-op.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `quote` table if it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(DbError::Creation)
}

/// Returns whether a table named `table_name` exists.
pub fn table_exists(conn: &Connection, table_name: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
