//! SQLite storage bootstrap for the quote vault.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Ensure the `quote` table exists before any read or write.
//!
//! # Invariants
//! - Schema creation is idempotent (`CREATE TABLE IF NOT EXISTS`).
//! - Core code must not touch quote rows before `open_db` succeeds once.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{connect, open_db, open_db_in_memory};

/// File name used when no explicit database path is configured.
pub const DEFAULT_DB_FILE: &str = "vault.db";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Backing file could not be opened or configured.
    Open(rusqlite::Error),
    /// Schema could not be created.
    Creation(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "unable to open database: {err}"),
            Self::Creation(err) => write!(f, "unable to initialize database: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) | Self::Creation(err) => Some(err),
        }
    }
}

impl DbError {
    /// Stable error code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open(_) => "db_open_failed",
            Self::Creation(_) => "db_schema_failed",
        }
    }
}
