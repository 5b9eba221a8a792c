//! Vocabulary Item - The unit of learning
//!
//! Each item carries:
//! - Identity and content (word, definition, three synonym slots)
//! - SM-2 scheduling state (ease, interval, repetition streak)
//! - Lifetime counters and the bookmark flag

use serde::{Deserialize, Serialize};

/// Milliseconds per day, the unit of the `interval` field when projected
/// onto the timeline.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Floor for the ease factor. SM-2 never lets an item get "harder" than this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor assigned to freshly created (or reset) items.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

// ============================================================================
// SYNONYM SLOTS
// ============================================================================

/// One of the three interchangeable answer slots attached to an item.
///
/// Any slot may serve as the correct answer of a generated question; its
/// definition and example sentence back the feedback display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynonymEntry {
    /// The synonym text shown as an answer option
    pub text: String,
    /// Definition of this synonym
    pub definition: String,
    /// Example sentence using this synonym
    pub example: String,
}

impl SynonymEntry {
    /// Create a synonym entry from its three parts
    pub fn new(
        text: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            definition: definition.into(),
            example: example.into(),
        }
    }
}

/// Index of a synonym slot (1-based, matching how questions refer to them)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynonymSlot {
    /// Slot 1
    First,
    /// Slot 2
    Second,
    /// Slot 3
    Third,
}

impl SynonymSlot {
    /// All three slots, in order
    pub const ALL: [SynonymSlot; 3] = [SynonymSlot::First, SynonymSlot::Second, SynonymSlot::Third];

    /// Zero-based array index
    pub fn index(self) -> usize {
        match self {
            SynonymSlot::First => 0,
            SynonymSlot::Second => 1,
            SynonymSlot::Third => 2,
        }
    }

    /// One-based slot number as presented to callers
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl std::fmt::Display for SynonymSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ============================================================================
// VOCABULARY ITEM
// ============================================================================

/// A vocabulary item with its full learning state
///
/// Items are created once from seed data and never destroyed; the learning
/// fields are mutated only through the store's single review-outcome write
/// path, and `is_bookmarked` only through explicit bookmark toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    /// Stable integer identifier
    pub id: i64,
    /// Unique display text
    pub word: String,
    /// Primary definition
    pub definition: String,
    /// The three answer slots
    pub synonyms: [SynonymEntry; 3],
    /// User bookmark flag, independent of learning state
    #[serde(default)]
    pub is_bookmarked: bool,

    // ========== Learning / scheduling state ==========
    /// Total answers recorded for this item
    #[serde(default)]
    pub times_reviewed: i64,
    /// Correct answers recorded; invariant `times_correct <= times_reviewed`
    #[serde(default)]
    pub times_correct: i64,
    /// SM-2 ease factor, never below [`MIN_EASE_FACTOR`]
    #[serde(default = "default_ease")]
    pub ease_factor: f64,
    /// Days until the next scheduled review
    #[serde(default)]
    pub interval: i64,
    /// Consecutive-correct streak, reset to 0 on a wrong answer
    #[serde(default)]
    pub repetition_count: i64,
    /// Epoch ms of the last answer, 0 if never reviewed
    #[serde(default)]
    pub last_reviewed: i64,
    /// Epoch ms when the item becomes due; 0 means never scheduled
    /// (eligible as *unseen*, not overdue)
    #[serde(default)]
    pub next_review_date: i64,
    /// Last computed quality score (0-5), kept for diagnostics
    #[serde(default)]
    pub quality: i64,
}

fn default_ease() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Default for VocabularyItem {
    fn default() -> Self {
        Self {
            id: 0,
            word: String::new(),
            definition: String::new(),
            synonyms: Default::default(),
            is_bookmarked: false,
            times_reviewed: 0,
            times_correct: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            repetition_count: 0,
            last_reviewed: 0,
            next_review_date: 0,
            quality: 0,
        }
    }
}

impl VocabularyItem {
    /// Create a fresh item from identity and content
    pub fn new(id: i64, word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
            definition: definition.into(),
            ..Default::default()
        }
    }

    /// The synonym entry at the given slot
    pub fn synonym(&self, slot: SynonymSlot) -> &SynonymEntry {
        &self.synonyms[slot.index()]
    }

    /// True if the item has never been answered
    pub fn is_unseen(&self) -> bool {
        self.times_reviewed == 0
    }

    /// True if the item was scheduled and its due date has passed
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        self.next_review_date > 0 && self.next_review_date <= now_ms
    }

    /// True if the item is scheduled strictly in the future
    pub fn is_scheduled_beyond(&self, now_ms: i64) -> bool {
        self.next_review_date > now_ms
    }

    /// Lifetime answer accuracy in [0, 1]; 0 for unseen items
    pub fn accuracy(&self) -> f64 {
        if self.times_reviewed == 0 {
            0.0
        } else {
            self.times_correct as f64 / self.times_reviewed as f64
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
