//! Data model for parsed study lines.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color token for board markup directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkupColor {
    Yellow,
    Red,
    Green,
    Blue,
}

impl MarkupColor {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'Y' => Some(Self::Yellow),
            'R' => Some(Self::Red),
            'G' => Some(Self::Green),
            'B' => Some(Self::Blue),
            _ => None,
        }
    }
}

/// A colored square from a `[%csl ...]` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedSquare {
    pub square: String, // "a1".."h8"
    pub color: MarkupColor,
}

/// A colored arrow from a `[%cal ...]` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrow {
    pub from: String,
    pub to: String,
    pub color: MarkupColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<shakmaty::Color> for Side {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Side::White,
            shakmaty::Color::Black => Side::Black,
        }
    }
}

/// One half-move plus the annotations the source text placed after it.
/// Immutable once produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedMove {
    pub san: String,
    pub side: Side,
    pub comment: Option<String>,
    pub highlighted_squares: Vec<HighlightedSquare>,
    pub arrows: Vec<Arrow>,
}

impl AnnotatedMove {
    pub fn has_annotations(&self) -> bool {
        self.comment.is_some() || !self.highlighted_squares.is_empty() || !self.arrows.is_empty()
    }
}

/// SM-2 scheduling fields for one line.
///
/// Invariants: `easiness_factor >= 1.3` always, and `interval_days >= 1`
/// whenever `consecutive_correct >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub easiness_factor: f64,
    pub interval_days: u32,
    pub consecutive_correct: u32,
    pub next_review_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl SchedulingState {
    /// State for a freshly imported line: due immediately.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            easiness_factor: 2.5,
            interval_days: 0,
            consecutive_correct: 0,
            next_review_at: now,
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

/// One drillable line: a complete move sequence from a starting position.
///
/// Only `scheduling` and `mistake_moves` change after parsing — the former
/// by the scheduler, the latter by the drill session engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyLine {
    pub id: String,
    pub start_fen: String,
    pub moves: Vec<AnnotatedMove>,
    pub name: Option<String>,
    pub scheduling: SchedulingState,
    pub mistake_moves: BTreeSet<usize>,
}

impl StudyLine {
    /// Name for display, falling back to a positional chapter label.
    pub fn display_name(&self, ordinal: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Chapter {}", ordinal))
    }
}
