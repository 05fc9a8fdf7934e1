//! File-backed persistent quote store.
//!
//! # Responsibility
//! - Own the on-disk database location and its one-time schema bootstrap.
//! - Serve CRUD calls with a fresh connection per call.
//!
//! # Invariants
//! - No quote data is cached in memory; every call round-trips to disk.
//! - Failures are logged once here and returned unchanged; nothing retries.
//! - `QuoteStore` holds no connection, so it is `Send + Sync` and can be
//!   shared across threads without locking.

use crate::db::{connect, open_db, DbResult};
use crate::model::quote::{NewQuote, Quote, QuoteId};
use crate::repo::quote_repo::{QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Persistent store rooted at one SQLite file.
#[derive(Debug)]
pub struct QuoteStore {
    path: PathBuf,
}

impl QuoteStore {
    /// Opens (or creates) the backing file and ensures the quote table.
    ///
    /// Safe to call repeatedly on the same file; existing rows are kept.
    ///
    /// # Errors
    /// - `DbError::Open` when the file cannot be opened.
    /// - `DbError::Creation` when the schema cannot be created.
    pub fn initialize(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        // Bootstrap connection only; per-call connections are opened later.
        drop(open_db(&path)?);
        info!("event=store_init module=store status=ok");
        Ok(Self { path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run<T>(
        &self,
        op: &'static str,
        action: impl FnOnce(&SqliteQuoteRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = connect(&self.path)
            .map_err(RepoError::from)
            .and_then(|conn| action(&SqliteQuoteRepository::new(&conn)));

        match &result {
            Ok(_) => debug!(
                "event=store_op module=store op={} status=ok duration_ms={}",
                op,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_op module=store op={} status=error duration_ms={} error_code={} error={}",
                op,
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }
}

impl QuoteRepository for QuoteStore {
    fn add_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId> {
        let id = self.run("add", |repo| repo.add_quote(quote))?;
        info!("event=quote_add module=store status=ok quote_id={id}");
        Ok(id)
    }

    fn update_quote(&self, quote: &Quote) -> RepoResult<()> {
        self.run("update", |repo| repo.update_quote(quote))?;
        info!(
            "event=quote_update module=store status=ok quote_id={}",
            quote.id
        );
        Ok(())
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        self.run("delete", |repo| repo.delete_quote(id))?;
        info!("event=quote_delete module=store status=ok quote_id={id}");
        Ok(())
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Quote> {
        self.run("get", |repo| repo.get_quote(id))
    }

    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        self.run("list", |repo| repo.list_quotes())
    }

    fn count_quotes(&self) -> RepoResult<u64> {
        self.run("count", |repo| repo.count_quotes())
    }
}
