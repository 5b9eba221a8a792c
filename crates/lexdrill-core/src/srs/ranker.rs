//! Due-Item Ranker
//!
//! Orders items by urgency and produces the single next item to present.
//! Three strictly prioritized tiers: overdue (ranked by overdue ratio),
//! unseen, then a random fallback over anything not scheduled into the
//! future. A tier miss is normal control flow, never an error.

use rand::seq::IndexedRandom;

use crate::storage::{ItemStore, Result, StoreError};
use crate::vocab::{VocabularyItem, MS_PER_DAY};

/// How many interval-lengths past due an item is.
///
/// An interval of 0 (possible for items scheduled before their first
/// successful review was recorded) is treated as 1 day to keep the
/// denominator non-zero.
pub fn overdue_ratio(item: &VocabularyItem, now_ms: i64) -> f64 {
    let interval_ms = item.interval.max(1) * MS_PER_DAY;
    (now_ms - item.next_review_date) as f64 / interval_ms as f64
}

/// Select the next item to present from the full pool.
///
/// Fails only with [`StoreError::EmptyPool`] when the store holds no items
/// at all (after exclusion fallbacks).
pub fn select_next<S: ItemStore + ?Sized>(
    store: &S,
    now_ms: i64,
    exclude: Option<i64>,
) -> Result<VocabularyItem> {
    let not_excluded = |item: &VocabularyItem| Some(item.id) != exclude;

    // Tier 1: overdue, most interval-lengths past due first. Harder items
    // (lower ease) surface first among ties, then the least recently seen.
    let mut overdue: Vec<VocabularyItem> = store
        .get_overdue(now_ms)?
        .into_iter()
        .filter(not_excluded)
        .collect();
    if !overdue.is_empty() {
        overdue.sort_by(|a, b| {
            overdue_ratio(b, now_ms)
                .total_cmp(&overdue_ratio(a, now_ms))
                .then(a.ease_factor.total_cmp(&b.ease_factor))
                .then(a.last_reviewed.cmp(&b.last_reviewed))
        });
        let top = overdue.swap_remove(0);
        tracing::debug!(item = top.id, "selected from overdue tier");
        return Ok(top);
    }

    // Tier 2: unseen. The store's ordering is arbitrary; the first row is
    // as good as any.
    if let Some(item) = store
        .get_unseen()?
        .into_iter()
        .find(not_excluded)
    {
        tracing::debug!(item = item.id, "selected from unseen tier");
        return Ok(item);
    }

    // Tier 3: anything not scheduled strictly in the future, at random.
    let eligible: Vec<VocabularyItem> = store
        .get_all()?
        .into_iter()
        .filter(|item| not_excluded(item) && !item.is_scheduled_beyond(now_ms))
        .collect();
    if let Some(item) = eligible.choose(&mut rand::rng()) {
        tracing::debug!(item = item.id, "selected from fallback tier");
        return Ok(item.clone());
    }

    // Everything is scheduled in the future: give up ranking and take any
    // item, relaxing the exclusion before failing.
    if let Some(item) = store.get_random(1, exclude)?.into_iter().next() {
        tracing::debug!(item = item.id, "selected at random, all items scheduled ahead");
        return Ok(item);
    }
    store
        .get_random(1, None)?
        .into_iter()
        .next()
        .ok_or(StoreError::EmptyPool)
}

/// Bookmark-mode selection: uniformly random over bookmarked items minus
/// the exclusion, relaxing the exclusion before failing. No urgency tiers.
pub fn select_next_bookmarked<S: ItemStore + ?Sized>(
    store: &S,
    exclude: Option<i64>,
) -> Result<VocabularyItem> {
    if let Some(item) = store.get_random_bookmarked(1, exclude)?.into_iter().next() {
        return Ok(item);
    }
    store
        .get_random_bookmarked(1, None)?
        .into_iter()
        .next()
        .ok_or(StoreError::EmptyPool)
}

// ============================================================================
// TESTS
// ============================================================================
