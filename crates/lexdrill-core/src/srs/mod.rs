//! SRS module - scheduling algorithm
//!
//! - `evaluator`: SM-2-style review outcome evaluation (quality, ease,
//!   interval, next due date)
//! - `ranker`: urgency ordering and next-item selection

mod evaluator;
mod ranker;

pub use evaluator::{
    evaluate, next_ease, quality_score, ReviewOutcome, FAST_ANSWER_MS, SLOW_ANSWER_MS,
};
pub use ranker::{overdue_ratio, select_next, select_next_bookmarked};
