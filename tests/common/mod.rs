//! Shared fixtures for the integration tests.
//!
//! Each test binary compiles its own copy of this module and uses a
//! different subset of the fixtures.
#![allow(dead_code)]

use chess_lines::model::StudyLine;
use chrono::{DateTime, Utc};

/// A small study file: one annotated chapter with a nested variation, one
/// chapter titled through the player-name fields, and one broken game that
/// the parser must skip.
pub const STUDY_PGN: &str = r#"[Event "Chapter One"]
[White "?"]
[Black "?"]

{The Italian game.} 1. e4 e5 2. Nf3 {[%csl Gf3] Develops} Nc6 (2... d6 {Philidor} 3. d4) 3. Bc4 {[%cal Gf1c4]} Bc5 *

[Event "?"]
[White "1.d4 sidelines"]
[Black "...d5 systems"]

1. d4 d5 2. Bf4 {London} *

[Event "Broken"]

1. e4 e4 *
"#;

/// Knights out and back, then out again: move text repeats inside one line.
pub const REPEATED_MOVES_PGN: &str =
    "[Event \"Shuffle\"]\n\n1. Nf3 Nf6 2. Ng1 Ng8 3. Nf3 {Back again [%cal Gg1f3]} *\n";

pub fn parse_study(now: DateTime<Utc>) -> Vec<StudyLine> {
    chess_lines::extract::parse_lines(STUDY_PGN, now)
}
