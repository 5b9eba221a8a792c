//! Quiz Session Controller
//!
//! Drives one quiz run: `Loading -> AwaitingAnswer -> Feedback ->
//! (AwaitingAnswer | GameOver)`. Exactly one question is in flight for user
//! interaction; the next question is prefetched on a background task while
//! the user answers. The store handle is injected and shared only with the
//! prefetch task, which reads without mutating.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::task::{self, JoinHandle};

use crate::quiz::question::{build_question, draw_distractors, Question};
use crate::quiz::QuizMode;
use crate::srs::{evaluate, select_next, select_next_bookmarked};
use crate::storage::{ItemStore, Result, StoreError};

/// Lives per session; there is no way to regain one
pub const STARTING_LIVES: u32 = 3;

// ============================================================================
// SESSION TYPES
// ============================================================================

/// One answered question, kept for end-of-session reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// The drilled word
    pub word: String,
    /// Its primary definition
    pub definition: String,
    /// The option the user chose
    pub chosen: String,
    /// The correct option
    pub correct: String,
    /// Whether the choice was correct
    pub was_correct: bool,
}

/// What the user is told right after answering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Whether the choice was correct
    pub is_correct: bool,
    /// The correct option text
    pub correct_text: String,
    /// Definition of the correct synonym
    pub definition: String,
    /// Example sentence of the correct synonym
    pub example: String,
    /// Lives left after this answer
    pub lives_remaining: u32,
}

/// Result of advancing past the feedback screen
#[derive(Debug, Clone)]
pub enum Advance {
    /// The next question is ready
    Next(Question),
    /// Lives ran out; the accumulated results of the session
    GameOver(Vec<AnswerRecord>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    AwaitingAnswer,
    Feedback,
    GameOver,
}

// ============================================================================
// SESSION
// ============================================================================

/// One quiz run over an injected item store
pub struct QuizSession<S: ItemStore + ?Sized + 'static> {
    store: Arc<S>,
    mode: QuizMode,
    state: SessionState,
    lives: u32,
    current: Question,
    shown_at: Instant,
    results: Vec<AnswerRecord>,
    prefetch: Option<JoinHandle<Result<Question>>>,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Rank the next target and assemble its question. Runs on blocking tasks;
/// read-only against the store.
fn next_question<S: ItemStore + ?Sized>(
    store: &S,
    mode: QuizMode,
    exclude: Option<i64>,
) -> Result<Question> {
    let target = match mode {
        QuizMode::Normal => select_next(store, now_ms(), exclude)?,
        QuizMode::BookmarkOnly => select_next_bookmarked(store, exclude)?,
    };
    let distractors = draw_distractors(store, mode, &target)?;
    Ok(build_question(&target, &distractors))
}

impl<S: ItemStore + ?Sized + 'static> QuizSession<S> {
    /// Start a session: rank an initial target, assemble its question, and
    /// kick off the prefetch of the next one.
    ///
    /// Surfaces [`StoreError::EmptyPool`] instead of fabricating an item
    /// when the mode's pool has nothing to study.
    pub async fn start(store: Arc<S>, mode: QuizMode) -> Result<Self> {
        let loader = store.clone();
        let current = task::spawn_blocking(move || next_question(&*loader, mode, None))
            .await
            .map_err(|e| StoreError::Background(e.to_string()))??;

        tracing::info!(mode = ?mode, first_item = current.item_id, "quiz session started");

        let mut session = Self {
            store,
            mode,
            state: SessionState::AwaitingAnswer,
            lives: STARTING_LIVES,
            current,
            shown_at: Instant::now(),
            results: Vec::new(),
            prefetch: None,
        };
        session.spawn_prefetch();
        Ok(session)
    }

    /// The question currently awaiting an answer (or showing feedback)
    pub fn current_question(&self) -> &Question {
        &self.current
    }

    /// Lives left
    pub fn current_lives(&self) -> u32 {
        self.lives
    }

    /// The session's quiz mode
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    /// True once lives ran out
    pub fn is_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    /// Results accumulated so far
    pub fn results(&self) -> &[AnswerRecord] {
        &self.results
    }

    /// Record the user's first option selection for the current question.
    ///
    /// Evaluates the outcome against the target item's fresh store state and
    /// persists it *before* any session state changes; a failed write leaves
    /// the session answerable again so the outcome is never dropped. A wrong
    /// answer costs a life, and lives hitting zero ends the session on the
    /// spot.
    pub async fn submit_answer(&mut self, choice: &str) -> Result<Feedback> {
        if self.state != SessionState::AwaitingAnswer {
            return Err(StoreError::InvalidState("no answer pending"));
        }

        let is_correct = self.current.is_correct(choice);
        let latency_ms = self.shown_at.elapsed().as_millis() as i64;
        let id = self.current.item_id;

        let store = self.store.clone();
        task::spawn_blocking(move || {
            let item = store.get_by_id(id)?.ok_or(StoreError::NotFound(id))?;
            let outcome = evaluate(&item, is_correct, now_ms(), latency_ms);
            store.apply_review_outcome(id, &outcome)
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))??;

        self.results.push(AnswerRecord {
            word: self.current.word.clone(),
            definition: self.current.definition.clone(),
            chosen: choice.to_string(),
            correct: self.current.correct_text.clone(),
            was_correct: is_correct,
        });

        if !is_correct {
            self.lives -= 1;
        }

        if self.lives == 0 {
            // Terminal the instant lives reach zero; any in-flight prefetch
            // is detached and its result discarded
            self.state = SessionState::GameOver;
            self.prefetch = None;
            tracing::info!(answers = self.results.len(), "quiz session over");
        } else {
            self.state = SessionState::Feedback;
        }

        Ok(Feedback {
            is_correct,
            correct_text: self.current.correct_text.clone(),
            definition: self.current.answer_definition.clone(),
            example: self.current.answer_example.clone(),
            lives_remaining: self.lives,
        })
    }

    /// Move past the feedback screen: consume the prefetched question if it
    /// is ready, else compute one now. In the terminal state this hands back
    /// the accumulated results.
    pub async fn advance(&mut self) -> Result<Advance> {
        match self.state {
            SessionState::GameOver => return Ok(Advance::GameOver(self.results.clone())),
            SessionState::Feedback => {}
            SessionState::AwaitingAnswer => {
                return Err(StoreError::InvalidState("current question not answered"));
            }
        }

        let next = match self.prefetch.take() {
            Some(handle) if handle.is_finished() => match handle.await {
                Ok(Ok(question)) => question,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "prefetch failed, computing next question now");
                    self.compute_next().await?
                }
                Err(e) => {
                    tracing::warn!(error = %e, "prefetch task lost, computing next question now");
                    self.compute_next().await?
                }
            },
            // Blocking tasks cannot be aborted; detach the straggler and
            // compute a fresh question
            _ => self.compute_next().await?,
        };

        self.current = next;
        self.shown_at = Instant::now();
        self.state = SessionState::AwaitingAnswer;
        self.spawn_prefetch();
        Ok(Advance::Next(self.current.clone()))
    }

    async fn compute_next(&self) -> Result<Question> {
        let store = self.store.clone();
        let mode = self.mode;
        let exclude = Some(self.current.item_id);
        task::spawn_blocking(move || next_question(&*store, mode, exclude))
            .await
            .map_err(|e| StoreError::Background(e.to_string()))?
    }

    fn spawn_prefetch(&mut self) {
        let store = self.store.clone();
        let mode = self.mode;
        let exclude = Some(self.current.item_id);
        self.prefetch = Some(task::spawn_blocking(move || {
            next_question(&*store, mode, exclude)
        }));
    }
}
