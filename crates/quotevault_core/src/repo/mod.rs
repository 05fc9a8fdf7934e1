//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the quote data access contract.
//! - Isolate SQLite query details from store/rotation orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewQuote::validate()` / `Quote::validate()`
//!   before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   read/write transport errors.

pub mod quote_repo;
