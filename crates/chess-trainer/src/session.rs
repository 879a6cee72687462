//! Drill session state machine.
//!
//! One [`DrillSession`] value owns a working copy of the line being drilled;
//! the host loop feeds it events (`submit` for user moves, `tick` for elapsed
//! pacing delays) and renders whatever comes back. Replay-to-mistake and
//! opponent auto-play each perform exactly one stored move per `tick`, so the
//! host stays in control of pacing and can compress delays to zero in tests.

use std::collections::BTreeSet;

use chess_lines::model::{AnnotatedMove, Arrow, HighlightedSquare, Side, StudyLine};
use chess_lines::oracle;
use chrono::{DateTime, Utc};
use shakmaty::{Chess, Position};
use tracing::{debug, warn};

use crate::config::DrillConfig;
use crate::error::TrainerError;
use crate::scheduler::{self, ReviewOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Auto-replaying moves up to the resume point of a prior mistake.
    Replaying,
    /// Waiting for the user to attempt the expected move.
    AwaitingUser,
    /// Showing the verdict for the last attempt; cleared by the next tick.
    Feedback(Verdict),
    /// Auto-playing the opponent's reply moves.
    AutoPlaying,
    Complete,
}

/// One auto-played step, returned for rendering.
#[derive(Debug, Clone)]
pub struct SessionStep {
    pub index: usize,
    pub mv: AnnotatedMove,
    pub fen_after: String,
}

/// Hint for the current expected move, escalating with repeated errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Hint {
    OriginSquare(HighlightedSquare),
    FullMove {
        origin: HighlightedSquare,
        arrow: Arrow,
    },
}

/// Last annotation surfaced for each side; cleared when a new move pair
/// begins so the display never shows stale commentary.
#[derive(Debug, Clone, Default)]
pub struct LiveAnnotations {
    pub white: Option<AnnotatedMove>,
    pub black: Option<AnnotatedMove>,
}

/// What a finished or abandoned session reports to the caller for
/// repertoire bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub line_id: String,
    pub correct_moves: u32,
    pub incorrect_attempts: u32,
    pub completed: bool,
    pub streak_broken: bool,
}

#[derive(Debug)]
pub struct DrillSession {
    line: StudyLine,
    user_side: Side,
    config: DrillConfig,
    position: Chess,
    cursor: usize,
    phase: Phase,
    resume_point: usize,
    correct_moves: u32,
    incorrect_attempts: u32,
    session_mistakes: BTreeSet<usize>,
    errors_on_current: u32,
    annotations: LiveAnnotations,
}

impl DrillSession {
    /// Start a session over a working copy of `line`. If the line carries
    /// mistakes from an earlier session, the engine first replays every move
    /// before the earliest one; otherwise drilling starts at move zero.
    pub fn start(
        line: StudyLine,
        user_side: Option<Side>,
        config: DrillConfig,
    ) -> Result<Self, TrainerError> {
        let position = oracle::position_from_fen(&line.start_fen)
            .map_err(|e| TrainerError::CorruptLine(e.to_string()))?;
        let user_side = user_side.unwrap_or_else(|| Side::from(position.turn()));

        let resume_point = line
            .mistake_moves
            .iter()
            .copied()
            .next()
            .filter(|&i| i < line.moves.len())
            .unwrap_or(0);

        let mut session = Self {
            line,
            user_side,
            config,
            position,
            cursor: 0,
            phase: Phase::Replaying,
            resume_point,
            correct_moves: 0,
            incorrect_attempts: 0,
            session_mistakes: BTreeSet::new(),
            errors_on_current: 0,
            annotations: LiveAnnotations::default(),
        };
        session.phase = if resume_point > 0 {
            debug!(resume_point, "resuming at earliest recorded mistake");
            Phase::Replaying
        } else {
            session.phase_at_cursor()
        };
        Ok(session)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn user_side(&self) -> Side {
        self.user_side
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn line(&self) -> &StudyLine {
        &self.line
    }

    /// Index of the next move to be played or answered.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn position_fen(&self) -> String {
        oracle::fen_of(&self.position)
    }

    /// Annotations currently live for display.
    pub fn annotations(&self) -> &LiveAnnotations {
        &self.annotations
    }

    /// Advance one pacing step: replay or auto-play a single stored move, or
    /// clear feedback. Returns the played move for rendering, if any.
    pub fn tick(&mut self) -> Option<SessionStep> {
        match self.phase {
            Phase::Replaying => {
                let step = self.play_stored_move();
                if step.is_none() {
                    self.phase = Phase::AwaitingUser;
                } else if self.cursor >= self.resume_point {
                    self.phase = self.phase_at_cursor();
                }
                step
            }
            Phase::AutoPlaying => {
                let step = self.play_stored_move();
                self.phase = if step.is_none() {
                    Phase::AwaitingUser
                } else {
                    self.phase_at_cursor()
                };
                step
            }
            Phase::Feedback(Verdict::Correct) => {
                self.phase = self.phase_at_cursor();
                None
            }
            Phase::Feedback(Verdict::Incorrect) => {
                self.phase = Phase::AwaitingUser;
                None
            }
            Phase::AwaitingUser | Phase::Complete => None,
        }
    }

    /// Attempt the expected move. Returns None unless the session is waiting
    /// for input. Unparseable or illegal input is just a wrong answer.
    pub fn submit(&mut self, input: &str) -> Option<Verdict> {
        if self.phase != Phase::AwaitingUser {
            return None;
        }
        let expected = self.line.moves.get(self.cursor)?.clone();

        // Speculative application: the candidate is only committed when its
        // canonical notation matches the expected move.
        let accepted = match oracle::apply_input(&self.position, input) {
            Ok((_, next, canonical)) => {
                if canonical == expected.san {
                    self.position = next;
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        };

        if accepted {
            self.note_annotation(&expected);
            self.cursor += 1;
            self.correct_moves += 1;
            self.errors_on_current = 0;
            self.phase = Phase::Feedback(Verdict::Correct);
            Some(Verdict::Correct)
        } else {
            self.errors_on_current += 1;
            self.incorrect_attempts += 1;
            self.session_mistakes.insert(self.cursor);
            self.phase = Phase::Feedback(Verdict::Incorrect);
            Some(Verdict::Incorrect)
        }
    }

    /// Progressive hint for the current expected move: one error highlights
    /// the origin square, two or more also draw the full move as an arrow.
    pub fn hint(&self) -> Option<Hint> {
        if self.errors_on_current == 0 {
            return None;
        }
        let expected = self.line.moves.get(self.cursor)?;
        let (mv, _, _) = oracle::apply_san(&self.position, &expected.san).ok()?;

        let origin = mv.from()?.to_string();
        let origin_square = HighlightedSquare {
            square: origin.clone(),
            color: self.config.hint_square_color,
        };

        if self.errors_on_current == 1 {
            Some(Hint::OriginSquare(origin_square))
        } else {
            Some(Hint::FullMove {
                origin: origin_square,
                arrow: Arrow {
                    from: origin,
                    to: mv.to().to_string(),
                    color: self.config.hint_arrow_color,
                },
            })
        }
    }

    /// Finish a completed session: the scheduler records Correct only for a
    /// session with zero incorrect attempts, and the line's mistake set is
    /// replaced by this session's (empty after a clean run).
    ///
    /// Errors if the line has moves left — a partial session must go through
    /// [`DrillSession::abandon`] so the schedule is not touched.
    pub fn finish(self, now: DateTime<Utc>) -> Result<(StudyLine, SessionSummary), TrainerError> {
        if self.phase != Phase::Complete {
            return Err(TrainerError::SessionNotComplete(self.cursor));
        }

        let outcome = if self.incorrect_attempts == 0 {
            ReviewOutcome::Correct
        } else {
            ReviewOutcome::Incorrect
        };

        let mut line = self.line;
        line.scheduling = scheduler::schedule(outcome, &line.scheduling, now);
        line.mistake_moves = self.session_mistakes;

        let summary = SessionSummary {
            line_id: line.id.clone(),
            correct_moves: self.correct_moves,
            incorrect_attempts: self.incorrect_attempts,
            completed: true,
            streak_broken: self.incorrect_attempts > 0,
        };
        Ok((line, summary))
    }

    /// Exit before the line is done. Mistakes made this session are merged
    /// into the line for future resume-to-mistake, but the scheduler is NOT
    /// consulted; only aggregate counters flow to the caller.
    pub fn abandon(self) -> (StudyLine, SessionSummary) {
        let mut line = self.line;
        line.mistake_moves
            .extend(self.session_mistakes.iter().copied());

        let summary = SessionSummary {
            line_id: line.id.clone(),
            correct_moves: self.correct_moves,
            incorrect_attempts: self.incorrect_attempts,
            completed: false,
            streak_broken: self.incorrect_attempts > 0,
        };
        (line, summary)
    }

    /// Phase implied by whose move sits at the cursor.
    fn phase_at_cursor(&self) -> Phase {
        match self.line.moves.get(self.cursor) {
            None => Phase::Complete,
            Some(m) if m.side == self.user_side => Phase::AwaitingUser,
            Some(_) => Phase::AutoPlaying,
        }
    }

    /// Apply the stored move at the cursor. On failure the board stays at
    /// the last good position and only this step is aborted — a stored move
    /// the oracle rejects is a data-integrity fault in the line.
    fn play_stored_move(&mut self) -> Option<SessionStep> {
        let annotated = self.line.moves.get(self.cursor)?.clone();
        match oracle::apply_san(&self.position, &annotated.san) {
            Ok((_, next, _)) => {
                self.position = next;
                self.note_annotation(&annotated);
                let index = self.cursor;
                self.cursor += 1;
                self.errors_on_current = 0;
                Some(SessionStep {
                    index,
                    fen_after: oracle::fen_of(&self.position),
                    mv: annotated,
                })
            }
            Err(e) => {
                warn!(index = self.cursor, error = %e, "stored move does not apply; leaving board as-is");
                None
            }
        }
    }

    fn note_annotation(&mut self, mv: &AnnotatedMove) {
        // A White move opens a new move pair.
        if mv.side == Side::White {
            self.annotations = LiveAnnotations::default();
        }
        let slot = match mv.side {
            Side::White => &mut self.annotations.white,
            Side::Black => &mut self.annotations.black,
        };
        *slot = mv.has_annotations().then(|| mv.clone());
    }
}
