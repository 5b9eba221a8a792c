//! Storage Module
//!
//! The durable item store:
//! - `ItemStore`: the injected store interface the scheduling core consumes
//! - `SqliteStore`: SQLite-backed implementation with versioned migrations
//! - `StoreError`: crate-wide error type

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{load_seed_json, SqliteStore};

use crate::srs::ReviewOutcome;
use crate::vocab::{DeckStats, VocabularyItem};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Store / engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("initialization error: {0}")]
    Init(String),
    /// Item id not present in the store; a programming error, not
    /// user-recoverable
    #[error("item not found: {0}")]
    NotFound(i64),
    /// No eligible items to select from ("nothing to study")
    #[error("no eligible items to study")]
    EmptyPool,
    /// A background task (prefetch or store write) failed to complete
    #[error("background task failed: {0}")]
    Background(String),
    /// Session operation called in the wrong state; a programming error
    #[error("invalid session state: {0}")]
    InvalidState(&'static str),
}

/// Store result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// ITEM STORE INTERFACE
// ============================================================================

/// The durable item store consumed by the scheduling core.
///
/// Handles are injected explicitly into the ranker, assembler, and session
/// controller; there is no process-wide singleton. Implementations must be
/// usable behind `&self` from multiple threads (the session prefetches on a
/// background task while the user answers).
pub trait ItemStore: Send + Sync {
    /// All items
    fn get_all(&self) -> Result<Vec<VocabularyItem>>;

    /// One item by id, if present
    fn get_by_id(&self, id: i64) -> Result<Option<VocabularyItem>>;

    /// Items with `0 < next_review_date <= now_ms`
    fn get_overdue(&self, now_ms: i64) -> Result<Vec<VocabularyItem>>;

    /// Items with `times_reviewed == 0`; no ordering is defined
    fn get_unseen(&self) -> Result<Vec<VocabularyItem>>;

    /// Uniform sample of up to `n` items, optionally excluding one id
    fn get_random(&self, n: usize, exclude: Option<i64>) -> Result<Vec<VocabularyItem>>;

    /// All bookmarked items
    fn get_bookmarked(&self) -> Result<Vec<VocabularyItem>>;

    /// Uniform sample of up to `n` bookmarked items, optionally excluding
    /// one id
    fn get_random_bookmarked(&self, n: usize, exclude: Option<i64>) -> Result<Vec<VocabularyItem>>;

    /// Apply a review outcome as a single atomic update keyed by item id.
    ///
    /// This is the only mutation path for learning fields. Bumps
    /// `times_reviewed` (and `times_correct` when the answer was correct) in
    /// the same statement. Returns the revised item. Fails with
    /// [`StoreError::NotFound`] if the id is absent.
    fn apply_review_outcome(&self, id: i64, outcome: &ReviewOutcome) -> Result<VocabularyItem>;

    /// Toggle the bookmark flag
    fn set_bookmark(&self, id: i64, bookmarked: bool) -> Result<()>;

    /// Zero every item's learning state (ease back to 2.5), preserving
    /// identity, content, and bookmark flags
    fn reset_all_learning_state(&self) -> Result<()>;

    /// Aggregate deck statistics
    fn get_stats(&self) -> Result<DeckStats>;

    /// Items whose most recent answer was recorded at or after the given
    /// timestamp; feeds the external daily-goal tracker
    fn count_reviewed_since(&self, since_ms: i64) -> Result<i64>;
}
