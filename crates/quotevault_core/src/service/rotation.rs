//! Randomized, non-repeating quote rotation.
//!
//! # Responsibility
//! - Hold an in-memory snapshot of all quotes and a serving cursor.
//! - Serve each snapshot quote exactly once per cycle in shuffled order.
//!
//! # Invariants
//! - Cursor read, serve and advance happen under one lock.
//! - Loads and shuffles run while holding the lock, so the first load happens
//!   once and concurrent first callers all observe the same shuffled snapshot.
//! - Store mutations after a load stay invisible until `initialize` runs again.
//! - The engine is shared by reference (`&` or `Arc`) and is not `Clone`.

use crate::model::quote::Quote;
use crate::repo::quote_repo::{QuoteRepository, RepoError};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type RotationResult<T> = Result<T, RotationError>;

/// What happens when the cursor wraps past the last quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Serve the next cycle in a freshly shuffled order.
    #[default]
    ReshuffleOnWrap,
    /// Keep the load-time order for the lifetime of the snapshot.
    KeepOrder,
}

#[derive(Debug)]
pub enum RotationError {
    /// Loading the snapshot from the store failed.
    Store(RepoError),
    /// The loaded snapshot holds no quotes.
    EmptyStore,
}

impl Display for RotationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::EmptyStore => write!(f, "no quotes available for rotation"),
        }
    }
}

impl Error for RotationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::EmptyStore => None,
        }
    }
}

impl From<RepoError> for RotationError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

struct Deck {
    snapshot: Vec<Quote>,
    cursor: usize,
}

struct RotationState {
    rng: StdRng,
    deck: Option<Deck>,
}

/// Rotation engine over any quote repository.
pub struct QuoteRotation<R: QuoteRepository> {
    repo: R,
    policy: RotationPolicy,
    state: Mutex<RotationState>,
}

impl<R: QuoteRepository> QuoteRotation<R> {
    /// Creates an unloaded engine seeded from OS entropy.
    pub fn new(repo: R) -> Self {
        Self::with_rng(repo, StdRng::from_entropy())
    }

    /// Creates an unloaded engine with a deterministic shuffle sequence.
    pub fn with_seed(repo: R, seed: u64) -> Self {
        Self::with_rng(repo, StdRng::seed_from_u64(seed))
    }

    fn with_rng(repo: R, rng: StdRng) -> Self {
        Self {
            repo,
            policy: RotationPolicy::default(),
            state: Mutex::new(RotationState { rng, deck: None }),
        }
    }

    pub fn with_policy(mut self, policy: RotationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Loads a fresh snapshot from the repository, shuffles it and resets the
    /// cursor.
    ///
    /// An empty store is not an error here; `next` reports it.
    ///
    /// # Errors
    /// - `RotationError::Store` when the repository read fails.
    pub fn initialize(&self) -> RotationResult<()> {
        // Load under the lock so a concurrent lazy load in `next` cannot
        // interleave with this one.
        let mut state = self.lock_state();
        let snapshot = self.load_snapshot()?;
        let deck = shuffled_deck(snapshot, &mut state.rng);
        info!(
            "event=rotation_init module=rotation status=ok quotes={}",
            deck.snapshot.len()
        );
        state.deck = Some(deck);
        Ok(())
    }

    /// Returns the next quote of the current cycle and advances the cursor.
    ///
    /// When called before `initialize`, performs the initial load exactly
    /// once while holding the lock.
    ///
    /// # Errors
    /// - `RotationError::EmptyStore` when the snapshot has no quotes.
    /// - `RotationError::Store` when the initial load fails.
    pub fn next(&self) -> RotationResult<Quote> {
        let mut guard = self.lock_state();
        let RotationState { rng, deck } = &mut *guard;

        if deck.is_none() {
            let snapshot = self.load_snapshot()?;
            info!(
                "event=rotation_init module=rotation status=ok mode=lazy quotes={}",
                snapshot.len()
            );
            *deck = Some(shuffled_deck(snapshot, rng));
        }

        let deck = match deck {
            Some(deck) if !deck.snapshot.is_empty() => deck,
            _ => return Err(RotationError::EmptyStore),
        };

        let quote = deck.snapshot[deck.cursor].clone();
        deck.cursor = (deck.cursor + 1) % deck.snapshot.len();

        if deck.cursor == 0 {
            if self.policy == RotationPolicy::ReshuffleOnWrap {
                deck.snapshot.shuffle(rng);
            }
            debug!(
                "event=rotation_wrap module=rotation policy={:?} quotes={}",
                self.policy,
                deck.snapshot.len()
            );
        }

        Ok(quote)
    }

    /// Number of quotes in the loaded snapshot, `None` before the first load.
    pub fn len(&self) -> Option<usize> {
        self.lock_state()
            .deck
            .as_ref()
            .map(|deck| deck.snapshot.len())
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_state().deck.is_some()
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn load_snapshot(&self) -> RotationResult<Vec<Quote>> {
        self.repo.list_quotes().map_err(|err| {
            error!(
                "event=rotation_init module=rotation status=error error_code={} error={}",
                err.code(),
                err
            );
            RotationError::Store(err)
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, RotationState> {
        // Deck and cursor are only written after every fallible step, so a
        // poisoned lock still guards consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn shuffled_deck(mut snapshot: Vec<Quote>, rng: &mut StdRng) -> Deck {
    // Fisher-Yates; uniform over all orderings.
    snapshot.shuffle(rng);
    Deck {
        snapshot,
        cursor: 0,
    }
}
