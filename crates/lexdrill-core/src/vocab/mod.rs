//! Vocabulary module - Core item types and deck-level statistics

mod item;

pub use item::{
    SynonymEntry, SynonymSlot, VocabularyItem, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR, MS_PER_DAY,
};

use serde::{Deserialize, Serialize};

// ============================================================================
// DECK STATISTICS
// ============================================================================

/// Aggregate statistics over the item store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    /// Total number of items
    pub total_items: i64,
    /// Items currently due for review
    pub due_for_review: i64,
    /// Items never answered
    pub unseen: i64,
    /// Bookmarked items
    pub bookmarked: i64,
    /// Average ease factor across all items
    pub average_ease: f64,
    /// Cumulative answers recorded
    pub reviews_total: i64,
    /// Cumulative correct answers recorded
    pub correct_total: i64,
}
