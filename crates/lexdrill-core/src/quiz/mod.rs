//! Quiz module - question assembly and session control

mod question;
mod session;

pub use question::{build_question, draw_distractors, Question, DISTRACTOR_COUNT};
pub use session::{Advance, AnswerRecord, Feedback, QuizSession, STARTING_LIVES};

use serde::{Deserialize, Serialize};

/// Which pool a session draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizMode {
    /// The full item pool, urgency-ranked
    #[default]
    Normal,
    /// Bookmarked items only, chosen uniformly at random
    BookmarkOnly,
}

impl std::fmt::Display for QuizMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizMode::Normal => write!(f, "normal"),
            QuizMode::BookmarkOnly => write!(f, "bookmarkOnly"),
        }
    }
}
