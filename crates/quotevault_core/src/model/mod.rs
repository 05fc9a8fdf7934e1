//! Domain model for stored quotes.
//!
//! # Responsibility
//! - Define the canonical quote record shared by store and rotation.
//!
//! # Invariants
//! - Every persisted quote is identified by a store-assigned `QuoteId`.
//! - A quote body is never empty once accepted by the store.

pub mod quote;
