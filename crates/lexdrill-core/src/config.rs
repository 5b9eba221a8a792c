//! Study configuration
//!
//! The "settings source" surface: a plain deserializable struct the host
//! application fills from wherever it keeps preferences. Every field is
//! defaulted so partial settings deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Default daily review goal
pub const DEFAULT_DAILY_GOAL: u32 = 20;

/// User-tunable study settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyConfig {
    /// Reviews per day the user is aiming for
    pub daily_goal: u32,
    /// Options per question (fixed at 4 by the assembler today; kept here
    /// for the settings screen's display)
    pub option_count: u32,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL,
            option_count: 4,
        }
    }
}

impl StudyConfig {
    /// Fraction of the daily goal reached, clamped to [0, 1].
    ///
    /// A goal of 0 can arrive from user input; it reads as "goal met"
    /// rather than dividing by zero.
    pub fn daily_progress(&self, reviews_today: i64) -> f64 {
        if self.daily_goal == 0 {
            return 1.0;
        }
        (reviews_today.max(0) as f64 / self.daily_goal as f64).min(1.0)
    }
}
