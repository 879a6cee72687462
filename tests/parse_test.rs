//! Integration tests for the parsing pipeline: splitting, oracle decoding,
//! comment alignment, markup extraction and naming working together.

mod common;

use chess_lines::extract::parse_lines;
use chess_lines::model::{MarkupColor, Side};
use chess_lines::oracle;
use chrono::Utc;
use shakmaty::Position;
use common::{parse_study, REPEATED_MOVES_PGN, STUDY_PGN};

#[test]
fn study_file_produces_two_lines_and_skips_the_broken_game() {
    let lines = parse_study(Utc::now());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name.as_deref(), Some("Chapter One"));
    assert_eq!(
        lines[1].name.as_deref(),
        Some("1.d4 sidelines - ...d5 systems")
    );
}

#[test]
fn moves_carry_their_annotations() {
    let lines = parse_study(Utc::now());
    let chapter = &lines[0];
    assert_eq!(chapter.moves.len(), 6);

    // Variation content never leaks into the mainline.
    let sans: Vec<&str> = chapter.moves.iter().map(|m| m.san.as_str()).collect();
    assert_eq!(sans, ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"]);

    let nf3 = &chapter.moves[2];
    assert_eq!(nf3.side, Side::White);
    assert_eq!(nf3.comment.as_deref(), Some("Develops"));
    assert_eq!(nf3.highlighted_squares.len(), 1);
    assert_eq!(nf3.highlighted_squares[0].square, "f3");
    assert_eq!(nf3.highlighted_squares[0].color, MarkupColor::Green);

    let bc4 = &chapter.moves[4];
    assert!(bc4.comment.is_none());
    assert_eq!(bc4.arrows.len(), 1);
    assert_eq!(bc4.arrows[0].from, "f1");
    assert_eq!(bc4.arrows[0].to, "c4");

    // The pre-game comment names nothing and annotates no move.
    assert!(chapter.moves[0].comment.is_none());
}

#[test]
fn repeated_move_text_resolves_to_the_right_occurrence() {
    let lines = parse_lines(REPEATED_MOVES_PGN, Utc::now());
    let line = &lines[0];
    assert_eq!(line.moves.len(), 5);

    // The comment belongs to the second Nf3, not the first.
    assert!(line.moves[0].comment.is_none());
    assert!(line.moves[0].arrows.is_empty());
    assert_eq!(line.moves[4].san, "Nf3");
    assert_eq!(line.moves[4].comment.as_deref(), Some("Back again"));
    assert_eq!(line.moves[4].arrows[0].from, "g1");
    assert_eq!(line.moves[4].arrows[0].to, "f3");
}

#[test]
fn replaying_a_parsed_line_reproduces_the_final_position() {
    let lines = parse_study(Utc::now());
    for line in &lines {
        let mut pos = oracle::position_from_fen(&line.start_fen).unwrap();
        for mv in &line.moves {
            let (_, next, _) = oracle::apply_san(&pos, &mv.san).unwrap();
            pos = next;
        }
        // Every stored SAN applied cleanly from the start position.
        assert_eq!(pos.fullmoves().get() as usize, line.moves.len() / 2 + 1);
    }
}

#[test]
fn single_game_half_move_count_is_exact() {
    let lines = parse_lines("1. e4 e5 2. Nf3 Nc6 3. Bb5 *", Utc::now());
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].moves.len(), 5);
    assert_eq!(lines[0].start_fen, oracle::STANDARD_START_FEN);
}

#[test]
fn lines_round_trip_through_json() {
    let lines = parse_study(Utc::now());
    let json = serde_json::to_string(&lines[0]).unwrap();
    let back: chess_lines::StudyLine = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, lines[0].id);
    assert_eq!(back.moves.len(), lines[0].moves.len());
    assert_eq!(back.scheduling, lines[0].scheduling);
}

#[test]
fn no_lines_from_junk_input_is_not_an_error() {
    assert!(parse_lines("not chess at all", Utc::now()).is_empty());
    assert_eq!(parse_lines(STUDY_PGN, Utc::now()).len(), 2);
}
