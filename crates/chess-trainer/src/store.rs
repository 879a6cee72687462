//! Storage collaborator contract.
//!
//! The core never owns persistence: hosts inject a [`LineStore`] into
//! whatever composes the parser, scheduler and session engine. Sessions hand
//! back one atomic `StudyLine` value for the caller to persist.

use std::collections::HashMap;

use chess_lines::model::{Side, StudyLine};
use chrono::{DateTime, Utc};

use crate::config::DrillConfig;
use crate::error::TrainerError;
use crate::repertoire::Repertoire;
use crate::session::DrillSession;

pub trait LineStore {
    fn get_by_id(&self, id: &str) -> Option<StudyLine>;
    fn save(&mut self, repertoire: &Repertoire);
    fn list_due(&self, repertoire_id: &str, now: DateTime<Utc>) -> Vec<StudyLine>;
    fn record_session_outcome(
        &mut self,
        repertoire_id: &str,
        correct: u32,
        incorrect: u32,
        streak_broken: bool,
    );
}

/// Load a line from the store and open a drill session over it.
pub fn load_session(
    store: &impl LineStore,
    line_id: &str,
    user_side: Option<Side>,
    config: DrillConfig,
) -> Result<DrillSession, TrainerError> {
    let line = store
        .get_by_id(line_id)
        .ok_or_else(|| TrainerError::LineNotFound(line_id.to_string()))?;
    DrillSession::start(line, user_side, config)
}

/// In-process store: the reference implementation and test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    repertoires: HashMap<String, Repertoire>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repertoire(&self, id: &str) -> Option<&Repertoire> {
        self.repertoires.get(id)
    }
}

impl LineStore for MemoryStore {
    fn get_by_id(&self, id: &str) -> Option<StudyLine> {
        self.repertoires
            .values()
            .flat_map(|rep| rep.lines.iter())
            .find(|line| line.id == id)
            .cloned()
    }

    fn save(&mut self, repertoire: &Repertoire) {
        self.repertoires
            .insert(repertoire.id.clone(), repertoire.clone());
    }

    fn list_due(&self, repertoire_id: &str, now: DateTime<Utc>) -> Vec<StudyLine> {
        self.repertoires
            .get(repertoire_id)
            .map(|rep| rep.due_lines(now).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record_session_outcome(
        &mut self,
        repertoire_id: &str,
        correct: u32,
        incorrect: u32,
        streak_broken: bool,
    ) {
        if let Some(rep) = self.repertoires.get_mut(repertoire_id) {
            rep.record_outcome(correct, incorrect, streak_broken);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_lines::extract::parse_lines;
    use chrono::Duration;

    fn seeded_store(now: DateTime<Utc>) -> (MemoryStore, String) {
        let mut rep = Repertoire::new("rep", "test");
        for line in parse_lines(
            "[Event \"A\"]\n\n1. e4 e5 *\n\n[Event \"B\"]\n\n1. d4 d5 *\n",
            now,
        ) {
            rep.upsert_line(line);
        }
        let first_id = rep.lines[0].id.clone();
        let mut store = MemoryStore::new();
        store.save(&rep);
        (store, first_id)
    }

    #[test]
    fn get_by_id_finds_saved_lines() {
        let now = Utc::now();
        let (store, id) = seeded_store(now);
        assert!(store.get_by_id(&id).is_some());
        assert!(store.get_by_id("line-missing").is_none());
    }

    #[test]
    fn list_due_respects_schedule() {
        let now = Utc::now();
        let (mut store, id) = seeded_store(now);
        assert_eq!(store.list_due("rep", now).len(), 2);

        let mut rep = store.repertoire("rep").unwrap().clone();
        rep.lines
            .iter_mut()
            .find(|l| l.id == id)
            .unwrap()
            .scheduling
            .next_review_at = now + Duration::days(5);
        store.save(&rep);
        assert_eq!(store.list_due("rep", now).len(), 1);
    }

    #[test]
    fn session_outcomes_accumulate() {
        let now = Utc::now();
        let (mut store, _) = seeded_store(now);
        store.record_session_outcome("rep", 5, 0, false);
        store.record_session_outcome("rep", 2, 3, true);

        let rep = store.repertoire("rep").unwrap();
        assert_eq!(rep.total_reviews, 10);
        assert_eq!(rep.correct_reviews, 7);
        assert_eq!(rep.current_streak, 0);
        assert_eq!(rep.longest_streak, 1);
    }

    #[test]
    fn load_session_reports_missing_lines() {
        let now = Utc::now();
        let (store, id) = seeded_store(now);
        assert!(load_session(&store, &id, None, DrillConfig::default()).is_ok());
        let err = load_session(&store, "line-gone", None, DrillConfig::default()).unwrap_err();
        assert!(matches!(err, TrainerError::LineNotFound(_)));
    }
}
