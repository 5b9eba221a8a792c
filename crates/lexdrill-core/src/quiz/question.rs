//! Question Assembler
//!
//! Builds one multiple-choice question from a target item and three
//! distractor items: a uniformly chosen synonym slot supplies the correct
//! option, each distractor contributes one uniformly chosen synonym, and the
//! four options are shuffled for presentation.

use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::quiz::QuizMode;
use crate::storage::{ItemStore, Result};
use crate::vocab::{SynonymSlot, VocabularyItem};

/// Number of wrong options per question
pub const DISTRACTOR_COUNT: usize = 3;

/// A fully assembled multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Id of the target item
    pub item_id: i64,
    /// The word being drilled
    pub word: String,
    /// The word's primary definition, shown as the prompt
    pub definition: String,
    /// The four answer options, shuffled
    pub options: [String; 4],
    /// Which of the target's synonym slots is the correct answer
    pub correct_slot: SynonymSlot,
    /// The correct option text (the target's synonym at `correct_slot`)
    pub correct_text: String,
    /// Definition of the correct synonym, for feedback display
    pub answer_definition: String,
    /// Example sentence of the correct synonym, for feedback display
    pub answer_example: String,
}

impl Question {
    /// Whether the given option text is the correct answer
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_text
    }
}

/// Assemble a question from a target and exactly three distractor items.
///
/// Distractors must already exclude the target by id (see
/// [`draw_distractors`]); each contributes the synonym text of an
/// independently chosen slot.
pub fn build_question(target: &VocabularyItem, distractors: &[VocabularyItem; 3]) -> Question {
    let mut rng = rand::rng();

    let correct_slot = *SynonymSlot::ALL
        .choose(&mut rng)
        .unwrap_or(&SynonymSlot::First);
    let correct = target.synonym(correct_slot);

    let mut options: Vec<String> = Vec::with_capacity(4);
    options.push(correct.text.clone());
    for distractor in distractors {
        let slot = *SynonymSlot::ALL
            .choose(&mut rng)
            .unwrap_or(&SynonymSlot::First);
        options.push(distractor.synonym(slot).text.clone());
    }
    options.shuffle(&mut rng);

    // Vec was built with exactly 4 entries
    let options: [String; 4] = options.try_into().unwrap_or_default();

    Question {
        item_id: target.id,
        word: target.word.clone(),
        definition: target.definition.clone(),
        options,
        correct_slot,
        correct_text: correct.text.clone(),
        answer_definition: correct.definition.clone(),
        answer_example: correct.example.clone(),
    }
}

/// Draw three distractor items from the target's domain (full pool in normal
/// mode, bookmarked subset in bookmark mode), excluding the target by id.
///
/// A bookmarked pool with fewer than four items relaxes rather than fails:
/// drawn items repeat, and as a last resort the exclusion itself is dropped.
pub fn draw_distractors<S: ItemStore + ?Sized>(
    store: &S,
    mode: QuizMode,
    target: &VocabularyItem,
) -> Result<[VocabularyItem; 3]> {
    let mut pool = match mode {
        QuizMode::Normal => store.get_random(DISTRACTOR_COUNT, Some(target.id))?,
        QuizMode::BookmarkOnly => store.get_random_bookmarked(DISTRACTOR_COUNT, Some(target.id))?,
    };

    if pool.is_empty() {
        tracing::warn!(
            target_id = target.id,
            "distractor pool empty, relaxing target exclusion"
        );
        pool.push(target.clone());
    }

    // Cycle the pool when it is too small; repeats beat failing.
    let mut cycle = pool.iter().cloned().cycle();
    // The cycle iterator over a non-empty pool always yields
    let next3 = [
        cycle.next().unwrap_or_else(|| target.clone()),
        cycle.next().unwrap_or_else(|| target.clone()),
        cycle.next().unwrap_or_else(|| target.clone()),
    ];
    Ok(next3)
}

// ============================================================================
// TESTS
// ============================================================================
