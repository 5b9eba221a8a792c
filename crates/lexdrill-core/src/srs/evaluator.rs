//! Review Outcome Evaluator
//!
//! Turns (correctness, response latency, prior repetition streak) into a 0-5
//! quality score and a revised ease/interval/next-due-date, SM-2 style.
//!
//! This is the only logic allowed to produce new learning state; the store
//! applies the result as one atomic update keyed by item id.

use serde::{Deserialize, Serialize};

use crate::vocab::{VocabularyItem, MIN_EASE_FACTOR, MS_PER_DAY};

/// Correct answers under this latency score quality 5
pub const FAST_ANSWER_MS: i64 = 3_000;

/// Correct answers at or under this latency (and at or above
/// [`FAST_ANSWER_MS`]) score quality 4; slower ones score 3
pub const SLOW_ANSWER_MS: i64 = 5_000;

// ============================================================================
// REVIEW OUTCOME
// ============================================================================

/// The full revised learning state produced by one evaluation
///
/// Carries everything the store needs for its single-UPDATE write path.
/// Counters (`times_reviewed`, `times_correct`) are bumped by the store from
/// `was_correct` inside the same statement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// Quality score 0-5
    pub quality: u8,
    /// Whether the answer was correct
    pub was_correct: bool,
    /// Revised ease factor (clamped at the 1.3 floor)
    pub ease_factor: f64,
    /// Revised interval in days
    pub interval: i64,
    /// Revised consecutive-correct streak
    pub repetition_count: i64,
    /// Epoch ms of this answer (becomes `last_reviewed`)
    pub reviewed_at: i64,
    /// Epoch ms when the item is next due
    pub next_review_date: i64,
}

/// Score an answer 0-5 from correctness, latency, and the streak the item
/// had *before* this answer.
pub fn quality_score(was_correct: bool, response_latency_ms: i64, prior_repetitions: i64) -> u8 {
    if was_correct {
        if response_latency_ms < FAST_ANSWER_MS {
            5
        } else if response_latency_ms <= SLOW_ANSWER_MS {
            4
        } else {
            3
        }
    } else if prior_repetitions == 1 {
        // The item had exactly one successful repetition before this failure
        2
    } else {
        1
    }
}

/// SM-2 ease adjustment, applied identically on correct and incorrect
/// answers, clamped at [`MIN_EASE_FACTOR`].
pub fn next_ease(old_ease: f64, quality: u8) -> f64 {
    let q = quality as f64;
    let adjustment = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    (old_ease + adjustment).max(MIN_EASE_FACTOR)
}

/// Evaluate one answer against an item's current state.
///
/// Pure: reads the item, never mutates it. `now_ms` is the answer timestamp.
pub fn evaluate(
    item: &VocabularyItem,
    was_correct: bool,
    now_ms: i64,
    response_latency_ms: i64,
) -> ReviewOutcome {
    let quality = quality_score(was_correct, response_latency_ms, item.repetition_count);
    let ease_factor = next_ease(item.ease_factor, quality);

    let (interval, repetition_count) = if !was_correct {
        (1, 0)
    } else {
        match item.repetition_count {
            0 => (1, 1),
            1 => (3, 2),
            n => (
                (item.interval as f64 * ease_factor).round() as i64,
                n + 1,
            ),
        }
    };

    ReviewOutcome {
        quality,
        was_correct,
        ease_factor,
        interval,
        repetition_count,
        reviewed_at: now_ms,
        next_review_date: now_ms + interval * MS_PER_DAY,
    }
}

// ============================================================================
// TESTS
// ============================================================================
