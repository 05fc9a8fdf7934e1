//! Core use-case services.
//!
//! # Responsibility
//! - Expose the persistent quote store and the rotation engine.
//! - Keep front-ends decoupled from SQL details.

pub mod quote_store;
pub mod rotation;
