//! End-to-end quiz flow over a real SQLite store: ranking tiers, question
//! assembly, session lives, and persistence of review outcomes.

use std::sync::Arc;

use lexdrill_core::{
    select_next, select_next_bookmarked, Advance, ItemStore, QuizMode, QuizSession, ReviewOutcome,
    SqliteStore, StoreError, SynonymEntry, VocabularyItem, MS_PER_DAY,
};
use tempfile::tempdir;

fn seed_item(id: i64) -> VocabularyItem {
    let mut item = VocabularyItem::new(id, format!("word{id}"), format!("definition {id}"));
    item.synonyms = [
        SynonymEntry::new(format!("syn{id}a"), format!("def {id}a"), format!("ex {id}a")),
        SynonymEntry::new(format!("syn{id}b"), format!("def {id}b"), format!("ex {id}b")),
        SynonymEntry::new(format!("syn{id}c"), format!("def {id}c"), format!("ex {id}c")),
    ];
    item
}

fn store_with_items(n: i64) -> (SqliteStore, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = SqliteStore::new(Some(dir.path().join("quiz.db"))).unwrap();
    let items: Vec<VocabularyItem> = (1..=n).map(seed_item).collect();
    store.import_items(&items).unwrap();
    (store, dir)
}

/// Schedule an item as reviewed once, due at `next_review_date`
fn schedule(store: &SqliteStore, id: i64, interval: i64, next_review_date: i64, ease: f64) {
    let outcome = ReviewOutcome {
        quality: 5,
        was_correct: true,
        ease_factor: ease,
        interval,
        repetition_count: 1,
        reviewed_at: next_review_date - interval * MS_PER_DAY,
        next_review_date,
    };
    store.apply_review_outcome(id, &outcome).unwrap();
}

// ============================================================================
// RANKER
// ============================================================================

#[test]
fn overdue_ratio_orders_the_overdue_tier() {
    let (store, _dir) = store_with_items(2);
    let now = 30 * MS_PER_DAY;

    // A: interval 1, two days late (ratio 2.0); B: interval 2, two days
    // late (ratio 1.0)
    schedule(&store, 1, 1, now - 2 * MS_PER_DAY, 2.5);
    schedule(&store, 2, 2, now - 2 * MS_PER_DAY, 2.5);

    let next = select_next(&store, now, None).unwrap();
    assert_eq!(next.id, 1);
}

#[test]
fn overdue_ties_break_on_lower_ease_then_older_review() {
    let (store, _dir) = store_with_items(3);
    let now = 30 * MS_PER_DAY;

    // Same ratio everywhere; item 2 is hardest (lowest ease)
    schedule(&store, 1, 1, now - MS_PER_DAY, 2.5);
    schedule(&store, 2, 1, now - MS_PER_DAY, 1.8);
    schedule(&store, 3, 1, now - MS_PER_DAY, 2.5);
    assert_eq!(select_next(&store, now, None).unwrap().id, 2);

    // With item 2 excluded, the remaining equal-ease tie goes to the one
    // reviewed longest ago
    let older = ReviewOutcome {
        quality: 5,
        was_correct: true,
        ease_factor: 2.5,
        interval: 1,
        repetition_count: 2,
        reviewed_at: now - 10 * MS_PER_DAY,
        next_review_date: now - MS_PER_DAY,
    };
    store.apply_review_outcome(3, &older).unwrap();
    let next = select_next(&store, now, Some(2)).unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn overdue_tier_beats_unseen_tier() {
    let (store, _dir) = store_with_items(10);
    let now = 30 * MS_PER_DAY;

    // Nine unseen items, one barely overdue: the overdue one must win
    schedule(&store, 7, 5, now - 1, 2.5);
    for _ in 0..10 {
        assert_eq!(select_next(&store, now, None).unwrap().id, 7);
    }
}

#[test]
fn unseen_tier_used_when_nothing_is_overdue() {
    let (store, _dir) = store_with_items(3);
    let now = 30 * MS_PER_DAY;

    // Item 1 scheduled into the future; 2 and 3 unseen
    schedule(&store, 1, 3, now + 3 * MS_PER_DAY, 2.5);
    let next = select_next(&store, now, None).unwrap();
    assert!(next.id == 2 || next.id == 3);
    assert!(next.is_unseen());
}

#[test]
fn exclusion_is_honored() {
    let (store, _dir) = store_with_items(2);
    let now = 30 * MS_PER_DAY;
    for _ in 0..10 {
        assert_eq!(select_next(&store, now, Some(1)).unwrap().id, 2);
    }
}

#[test]
fn ranker_never_fails_on_a_nonempty_pool() {
    let (store, _dir) = store_with_items(2);
    let now = 30 * MS_PER_DAY;

    // Everything scheduled strictly in the future: the escape valve still
    // returns an item
    schedule(&store, 1, 3, now + 3 * MS_PER_DAY, 2.5);
    schedule(&store, 2, 3, now + 5 * MS_PER_DAY, 2.5);
    assert!(select_next(&store, now, None).is_ok());
    assert_eq!(select_next(&store, now, Some(1)).unwrap().id, 2);
}

#[test]
fn empty_pool_is_an_error() {
    let dir = tempdir().unwrap();
    let store = SqliteStore::new(Some(dir.path().join("empty.db"))).unwrap();
    match select_next(&store, 0, None) {
        Err(StoreError::EmptyPool) => {}
        other => panic!("expected EmptyPool, got {other:?}"),
    }
}

#[test]
fn bookmark_mode_draws_only_bookmarked_items() {
    let (store, _dir) = store_with_items(6);
    store.set_bookmark(2, true).unwrap();
    store.set_bookmark(5, true).unwrap();

    for _ in 0..20 {
        let item = select_next_bookmarked(&store, None).unwrap();
        assert!(item.id == 2 || item.id == 5);
    }
    // Exclusion leaves the other bookmark
    for _ in 0..10 {
        assert_eq!(select_next_bookmarked(&store, Some(2)).unwrap().id, 5);
    }
    // A single bookmark survives its own exclusion via the relaxation
    store.set_bookmark(5, false).unwrap();
    assert_eq!(select_next_bookmarked(&store, Some(2)).unwrap().id, 2);
}

#[test]
fn bookmark_mode_with_no_bookmarks_is_empty_pool() {
    let (store, _dir) = store_with_items(4);
    match select_next_bookmarked(&store, None) {
        Err(StoreError::EmptyPool) => {}
        other => panic!("expected EmptyPool, got {other:?}"),
    }
}

// ============================================================================
// SESSION
// ============================================================================

fn wrong_option(question: &lexdrill_core::Question) -> String {
    question
        .options
        .iter()
        .find(|o| !question.is_correct(o))
        .expect("distractor options exist")
        .clone()
}

#[tokio::test]
async fn session_on_empty_store_reports_empty_pool() {
    let dir = tempdir().unwrap();
    let store = Arc::new(SqliteStore::new(Some(dir.path().join("empty.db"))).unwrap());
    match QuizSession::start(store, QuizMode::Normal).await {
        Err(StoreError::EmptyPool) => {}
        Ok(_) => panic!("expected EmptyPool, session started"),
        Err(other) => panic!("expected EmptyPool, got {other:?}"),
    }
}

#[tokio::test]
async fn bookmark_session_without_bookmarks_reports_empty_pool() {
    let (store, _dir) = store_with_items(5);
    match QuizSession::start(Arc::new(store), QuizMode::BookmarkOnly).await {
        Err(StoreError::EmptyPool) => {}
        Ok(_) => panic!("expected EmptyPool, session started"),
        Err(other) => panic!("expected EmptyPool, got {other:?}"),
    }
}

#[tokio::test]
async fn three_wrong_answers_end_the_session() {
    let (store, _dir) = store_with_items(8);
    let store = Arc::new(store);
    let mut session = QuizSession::start(store.clone(), QuizMode::Normal)
        .await
        .unwrap();
    assert_eq!(session.current_lives(), 3);

    for expected_lives in [2, 1, 0] {
        let choice = wrong_option(session.current_question());
        let feedback = session.submit_answer(&choice).await.unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.lives_remaining, expected_lives);

        if expected_lives > 0 {
            match session.advance().await.unwrap() {
                Advance::Next(_) => {}
                Advance::GameOver(_) => panic!("session ended early"),
            }
        }
    }

    assert!(session.is_over());
    match session.advance().await.unwrap() {
        Advance::GameOver(results) => {
            assert_eq!(results.len(), 3);
            assert!(results.iter().all(|r| !r.was_correct));
        }
        Advance::Next(_) => panic!("expected GameOver"),
    }

    // No further evaluator calls once terminal
    let choice = wrong_option(session.current_question());
    match session.submit_answer(&choice).await {
        Err(StoreError::InvalidState(_)) => {}
        other => panic!("expected InvalidState, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_answer_resets_the_items_learning_state() {
    let (store, _dir) = store_with_items(4);
    let store = Arc::new(store);

    // Give item a streak first so the reset is observable
    let now = chrono::Utc::now().timestamp_millis();
    schedule(&store, 1, 3, now - MS_PER_DAY, 2.5);

    let mut session = QuizSession::start(store.clone(), QuizMode::Normal)
        .await
        .unwrap();
    let target_id = session.current_question().item_id;
    // Item 1 is the only overdue item, so the ranker picked it
    assert_eq!(target_id, 1);

    let choice = wrong_option(session.current_question());
    session.submit_answer(&choice).await.unwrap();

    let item = store.get_by_id(target_id).unwrap().unwrap();
    assert_eq!(item.repetition_count, 0);
    assert_eq!(item.interval, 1);
    assert_eq!(item.times_reviewed, 2);
    assert_eq!(item.times_correct, 1);
}

#[tokio::test]
async fn correct_answers_keep_lives_and_advance_excludes_current() {
    let (store, _dir) = store_with_items(6);
    let store = Arc::new(store);
    let mut session = QuizSession::start(store.clone(), QuizMode::Normal)
        .await
        .unwrap();

    for _ in 0..4 {
        let current_id = session.current_question().item_id;
        let correct = session.current_question().correct_text.clone();
        let feedback = session.submit_answer(&correct).await.unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.correct_text, correct);
        assert_eq!(feedback.lives_remaining, 3);

        match session.advance().await.unwrap() {
            Advance::Next(next) => assert_ne!(next.item_id, current_id),
            Advance::GameOver(_) => panic!("lives were never lost"),
        }
    }
    assert_eq!(session.results().len(), 4);
    assert_eq!(session.current_lives(), 3);
}

#[tokio::test]
async fn correct_answer_is_persisted_for_the_target_only() {
    let (store, _dir) = store_with_items(5);
    let store = Arc::new(store);
    let mut session = QuizSession::start(store.clone(), QuizMode::Normal)
        .await
        .unwrap();

    let target_id = session.current_question().item_id;
    let correct = session.current_question().correct_text.clone();
    session.submit_answer(&correct).await.unwrap();

    let target = store.get_by_id(target_id).unwrap().unwrap();
    assert_eq!(target.times_reviewed, 1);
    assert_eq!(target.times_correct, 1);
    assert_eq!(target.repetition_count, 1);
    assert_eq!(target.interval, 1);
    assert!(target.next_review_date > 0);

    // Distractors were untouched
    for item in store.get_all().unwrap() {
        if item.id != target_id {
            assert_eq!(item.times_reviewed, 0);
        }
    }
}

#[tokio::test]
async fn bookmark_session_runs_on_a_tiny_pool() {
    let (store, _dir) = store_with_items(2);
    store.set_bookmark(1, true).unwrap();
    store.set_bookmark(2, true).unwrap();
    let store = Arc::new(store);

    // Fewer than 4 bookmarked items: distractor drawing relaxes instead of
    // failing, and the session still runs
    let mut session = QuizSession::start(store, QuizMode::BookmarkOnly)
        .await
        .unwrap();
    let correct = session.current_question().correct_text.clone();
    let feedback = session.submit_answer(&correct).await.unwrap();
    assert!(feedback.is_correct);
    match session.advance().await.unwrap() {
        Advance::Next(_) => {}
        Advance::GameOver(_) => panic!("no lives lost"),
    }
}
