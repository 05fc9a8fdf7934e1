//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection settings required by core behavior.
//! - Ensure the schema before returning a bootstrapped connection.
//!
//! # Invariants
//! - `open_db` / `open_db_in_memory` return connections with the schema applied.
//! - `connect` never creates files; it expects `open_db` to have run first.
//! - Every connection waits on a busy database instead of failing at once.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file and ensures the quote schema.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let result = Connection::open(path)
        .map_err(DbError::Open)
        .and_then(bootstrap_connection);
    log_open_result("file", started_at, result)
}

/// Opens an in-memory SQLite database and ensures the quote schema.
///
/// Rows live only as long as the returned connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(DbError::Open)
        .and_then(bootstrap_connection);
    log_open_result("memory", started_at, result)
}

/// Opens a fresh read/write connection to an existing database file.
///
/// Used for per-call store operations; does not re-run schema setup.
pub fn connect(path: impl AsRef<Path>) -> DbResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(DbError::Open)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(DbError::Open)?;
    debug!("event=db_connect module=db status=ok");
    Ok(conn)
}

fn bootstrap_connection(conn: Connection) -> DbResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(DbError::Open)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

fn log_open_result(
    mode: &str,
    started_at: Instant,
    result: DbResult<Connection>,
) -> DbResult<Connection> {
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}
