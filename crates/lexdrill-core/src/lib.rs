//! # Lexdrill Core
//!
//! Spaced-repetition scheduling engine for a vocabulary drilling tool:
//!
//! - **SM-2 evaluation**: correctness + response latency -> 0-5 quality score
//!   -> revised ease/interval/next-due-date
//! - **Urgency ranking**: overdue items ranked by how many interval-lengths
//!   past due they are, then unseen items, then a random fallback
//! - **Question assembly**: 4-option multiple-choice questions from an item's
//!   synonym slots plus three distractor items
//! - **Quiz sessions**: lives, background prefetch of the next question, and
//!   end-of-session reporting
//! - **SQLite item store** behind an injected `ItemStore` trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lexdrill_core::{Advance, QuizMode, QuizSession, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::new(None)?);
//!
//! let mut session = QuizSession::start(store, QuizMode::Normal).await?;
//! let question = session.current_question();
//! // ... present question.options, collect a choice ...
//! let feedback = session.submit_answer(&question.options[0].clone()).await?;
//! match session.advance().await? {
//!     Advance::Next(next) => { /* present the next question */ }
//!     Advance::GameOver(results) => { /* show the session summary */ }
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod quiz;
pub mod srs;
pub mod storage;
pub mod vocab;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Vocabulary types
pub use vocab::{
    DeckStats, SynonymEntry, SynonymSlot, VocabularyItem, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR,
    MS_PER_DAY,
};

// SRS algorithm
pub use srs::{
    evaluate, next_ease, overdue_ratio, quality_score, select_next, select_next_bookmarked,
    ReviewOutcome, FAST_ANSWER_MS, SLOW_ANSWER_MS,
};

// Quiz layer
pub use quiz::{
    build_question, draw_distractors, Advance, AnswerRecord, Feedback, Question, QuizMode,
    QuizSession, DISTRACTOR_COUNT, STARTING_LIVES,
};

// Storage layer
pub use storage::{load_seed_json, ItemStore, Result, SqliteStore, StoreError};

// Configuration
pub use config::StudyConfig;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Advance, AnswerRecord, Feedback, ItemStore, Question, QuizMode, QuizSession, Result,
        ReviewOutcome, SqliteStore, StoreError, StudyConfig, SynonymSlot, VocabularyItem,
    };
}
