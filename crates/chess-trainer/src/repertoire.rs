//! Aggregate review bookkeeping across a set of lines.

use chess_lines::model::StudyLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionSummary;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repertoire {
    pub id: String,
    pub name: String,
    pub lines: Vec<StudyLine>,
    pub total_reviews: u64,
    pub correct_reviews: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl Repertoire {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn due_lines(&self, now: DateTime<Utc>) -> Vec<&StudyLine> {
        self.lines
            .iter()
            .filter(|line| line.scheduling.is_due(now))
            .collect()
    }

    /// Replace a line by id, or add it if new.
    pub fn upsert_line(&mut self, line: StudyLine) {
        match self.lines.iter_mut().find(|l| l.id == line.id) {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    pub fn record_session(&mut self, summary: &SessionSummary) {
        self.record_outcome(
            summary.correct_moves,
            summary.incorrect_attempts,
            summary.streak_broken,
        );
    }

    /// Fold one session's attempt counts into the aggregates.
    pub fn record_outcome(&mut self, correct: u32, incorrect: u32, streak_broken: bool) {
        self.total_reviews += u64::from(correct) + u64::from(incorrect);
        self.correct_reviews += u64::from(correct);
        if streak_broken {
            self.current_streak = 0;
        } else if correct > 0 {
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
        }
    }
}
