//! Core of the quote vault: persistent quote store and rotation engine.
//! Front-ends build a `QuoteStore`, wrap it in a `QuoteRotation`, and share
//! both by reference.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, VaultConfig};
pub use db::{DbError, DbResult, DEFAULT_DB_FILE};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::quote::{is_well_formed_date, NewQuote, Quote, QuoteId, QuoteValidationError};
pub use repo::quote_repo::{QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository};
pub use service::quote_store::QuoteStore;
pub use service::rotation::{QuoteRotation, RotationError, RotationPolicy, RotationResult};

/// Minimal health-check API for the CLI probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
