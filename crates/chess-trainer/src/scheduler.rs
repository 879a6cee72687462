//! SuperMemo-2 scheduling, binary pass/fail variant.
//!
//! Outcomes map onto the 0-5 SM-2 quality scale as 4 (correct) and 0
//! (incorrect); everything else is the standard update.

use chess_lines::model::SchedulingState;
use chrono::{DateTime, Duration, Utc};

pub const MIN_EASINESS: f64 = 1.3;

const QUALITY_CORRECT: f64 = 4.0;
const QUALITY_INCORRECT: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
}

/// Compute the next scheduling state from a review outcome. Pure and total.
pub fn schedule(
    outcome: ReviewOutcome,
    state: &SchedulingState,
    now: DateTime<Utc>,
) -> SchedulingState {
    let quality = match outcome {
        ReviewOutcome::Correct => QUALITY_CORRECT,
        ReviewOutcome::Incorrect => QUALITY_INCORRECT,
    };
    let spread = 5.0 - quality;
    let easiness_factor =
        (state.easiness_factor + (0.1 - spread * (0.08 + spread * 0.02))).max(MIN_EASINESS);

    let (consecutive_correct, interval_days) = match outcome {
        ReviewOutcome::Incorrect => (0, 1),
        ReviewOutcome::Correct => {
            let streak = state.consecutive_correct + 1;
            let days = match streak {
                1 => 1,
                2 => 6,
                _ => ((state.interval_days as f64) * easiness_factor).round() as u32,
            };
            (streak, days.max(1))
        }
    };

    SchedulingState {
        easiness_factor,
        interval_days,
        consecutive_correct,
        next_review_at: now + Duration::days(i64::from(interval_days)),
        last_reviewed_at: Some(now),
    }
}
