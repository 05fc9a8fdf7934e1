//! Quote domain model.
//!
//! # Responsibility
//! - Define the persisted `Quote` record and the `NewQuote` insert shape.
//! - Provide write-side validation used by the repository layer.
//!
//! # Invariants
//! - `id` is assigned by storage and stays stable across updates.
//! - `body` must contain at least one non-whitespace character.
//! - `date` is freeform; `is_well_formed_date` is advisory only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier (`quote.id`).
pub type QuoteId = i64;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01]))?)?$").expect("valid date regex")
});

/// Validation errors raised before a quote is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyBody,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "quote body must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// A quote row as persisted in the `quote` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub body: String,
    /// Empty and absent authors are both allowed.
    pub author: Option<String>,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` by convention.
    pub date: Option<String>,
}

impl Quote {
    /// Checks write-side invariants.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        validate_body(&self.body)
    }

    /// Returns the author or an empty string, for display.
    pub fn author_or_empty(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewQuote {
    pub body: String,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl NewQuote {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            author: None,
            date: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Checks write-side invariants.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        validate_body(&self.body)
    }

    /// Attaches a store-assigned id.
    pub fn into_quote(self, id: QuoteId) -> Quote {
        Quote {
            id,
            body: self.body,
            author: self.author,
            date: self.date,
        }
    }
}

/// Returns whether `value` looks like `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
///
/// The store never calls this; front-ends may use it before submitting.
pub fn is_well_formed_date(value: &str) -> bool {
    DATE_RE.is_match(value.trim())
}

fn validate_body(body: &str) -> Result<(), QuoteValidationError> {
    if body.trim().is_empty() {
        return Err(QuoteValidationError::EmptyBody);
    }
    Ok(())
}
