//! Quote repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and list APIs over the `quote` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the body before SQL mutations.
//! - `update_quote` reports `NotFound` when no row matched.
//! - `delete_quote` on a missing id is a successful no-op.
//! - `list_quotes` applies no ordering; callers must not rely on it.
//! - Writes run in `BEGIN IMMEDIATE` so concurrent writers queue on the busy
//!   timeout instead of failing on lock upgrade.

use crate::db::DbError;
use crate::model::quote::{NewQuote, Quote, QuoteId, QuoteValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const QUOTE_SELECT_SQL: &str = "SELECT id, body, author, date FROM quote";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quote persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuoteValidationError),
    /// Connection could not be opened or the schema could not be created.
    Db(DbError),
    /// Insert/update/delete rejected by SQLite.
    Write(rusqlite::Error),
    /// Query or row iteration failed.
    Read(rusqlite::Error),
    NotFound(QuoteId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Write(err) => write!(f, "quote write failed: {err}"),
            Self::Read(err) => write!(f, "quote read failed: {err}"),
            Self::NotFound(id) => write!(f, "quote not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Write(err) | Self::Read(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl RepoError {
    /// Stable error code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "quote_invalid",
            Self::Db(err) => err.code(),
            Self::Write(_) => "quote_write_failed",
            Self::Read(_) => "quote_read_failed",
            Self::NotFound(_) => "quote_not_found",
        }
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Repository interface for quote CRUD operations.
pub trait QuoteRepository {
    /// Inserts a quote and returns its store-assigned id.
    fn add_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId>;
    /// Replaces body, author and date of the row with `quote.id`.
    fn update_quote(&self, quote: &Quote) -> RepoResult<()>;
    fn delete_quote(&self, id: QuoteId) -> RepoResult<()>;
    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote>;
    /// Returns every stored quote in storage-defined order.
    fn list_quotes(&self) -> RepoResult<Vec<Quote>>;
    fn count_quotes(&self) -> RepoResult<u64>;
}

impl<R: QuoteRepository + ?Sized> QuoteRepository for &R {
    fn add_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId> {
        (**self).add_quote(quote)
    }

    fn update_quote(&self, quote: &Quote) -> RepoResult<()> {
        (**self).update_quote(quote)
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        (**self).delete_quote(id)
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote> {
        (**self).get_quote(id)
    }

    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        (**self).list_quotes()
    }

    fn count_quotes(&self) -> RepoResult<u64> {
        (**self).count_quotes()
    }
}

impl<R: QuoteRepository + ?Sized> QuoteRepository for Arc<R> {
    fn add_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId> {
        (**self).add_quote(quote)
    }

    fn update_quote(&self, quote: &Quote) -> RepoResult<()> {
        (**self).update_quote(quote)
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        (**self).delete_quote(id)
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote> {
        (**self).get_quote(id)
    }

    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        (**self).list_quotes()
    }

    fn count_quotes(&self) -> RepoResult<u64> {
        (**self).count_quotes()
    }
}

/// SQLite-backed quote repository over a borrowed connection.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write<T>(
        &self,
        action: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::Write)?;
        let value = action(&tx).map_err(RepoError::Write)?;
        tx.commit().map_err(RepoError::Write)?;
        Ok(value)
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn add_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId> {
        quote.validate()?;

        self.write(|tx| {
            tx.execute(
                "INSERT INTO quote (body, author, date) VALUES (?1, ?2, ?3);",
                params![
                    quote.body.as_str(),
                    quote.author.as_deref(),
                    quote.date.as_deref()
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_quote(&self, quote: &Quote) -> RepoResult<()> {
        quote.validate()?;

        let changed = self.write(|tx| {
            tx.execute(
                "UPDATE quote
                 SET
                    body = ?1,
                    author = ?2,
                    date = ?3
                 WHERE id = ?4;",
                params![
                    quote.body.as_str(),
                    quote.author.as_deref(),
                    quote.date.as_deref(),
                    quote.id
                ],
            )
        })?;

        if changed == 0 {
            return Err(RepoError::NotFound(quote.id));
        }

        Ok(())
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        self.write(|tx| tx.execute("DELETE FROM quote WHERE id = ?1;", [id]))?;
        Ok(())
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote> {
        self.conn
            .query_row(
                &format!("{QUOTE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_quote_row,
            )
            .optional()
            .map_err(RepoError::Read)?
            .ok_or(RepoError::NotFound(id))
    }

    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUOTE_SELECT_SQL};"))
            .map_err(RepoError::Read)?;
        let rows = stmt
            .query_map([], parse_quote_row)
            .map_err(RepoError::Read)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(RepoError::Read)
    }

    fn count_quotes(&self) -> RepoResult<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM quote;", [], |row| row.get::<_, u64>(0))
            .map_err(RepoError::Read)
    }
}

fn parse_quote_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: row.get("id")?,
        body: row.get("body")?,
        author: row.get("author")?,
        date: row.get("date")?,
    })
}
