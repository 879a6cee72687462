//! Splits multi-game PGN text into drillable study lines.
//!
//! This is the parsing composition root: game splitting, header capture,
//! oracle decoding, comment alignment, markup extraction and naming all meet
//! here. One bad game never kills the batch.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::align;
use crate::error::LineError;
use crate::markup;
use crate::model::{AnnotatedMove, SchedulingState, StudyLine};
use crate::name;
use crate::oracle;

/// Split a multi-game file on `[Event ...]` header lines.
/// A header only starts a new game once the current buffer has content.
pub fn split_games(script: &str) -> Vec<String> {
    let event_re = Regex::new(r#"^\[Event\s+""#).unwrap();

    let mut games = Vec::new();
    let mut current = String::new();

    for line in script.lines() {
        if event_re.is_match(line.trim_start()) && !current.trim().is_empty() {
            games.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        games.push(current);
    }

    games
}

/// Parse every game in `script` into a StudyLine. Games the oracle rejects
/// and games with no moves are skipped; the rest of the batch continues.
pub fn parse_lines(script: &str, now: DateTime<Utc>) -> Vec<StudyLine> {
    let games = split_games(script);
    let total = games.len();

    let mut lines = Vec::new();
    for (ordinal, game) in games.iter().enumerate() {
        match parse_game(game, now) {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => debug!(game = ordinal + 1, "game produced no moves; skipped"),
            Err(e) => warn!(game = ordinal + 1, error = %e, "skipping unparseable game"),
        }
    }

    debug!(games = total, lines = lines.len(), "parsed study lines");
    lines
}

fn parse_game(game: &str, now: DateTime<Utc>) -> Result<Option<StudyLine>, LineError> {
    let headers = parse_headers(game);

    // Non-standard starting positions are not drillable lines.
    if headers.get("SetUp").map(String::as_str) == Some("1") {
        if let Some(fen) = headers.get("FEN") {
            if fen != oracle::STANDARD_START_FEN {
                return Err(LineError::MalformedScript(
                    "non-standard starting position".to_string(),
                ));
            }
        }
    }

    let movetext = strip_headers(game);
    let no_variations = align::strip_variations(&movetext);
    // The oracle is not required to tolerate comment syntax.
    let oracle_input = strip_comments(&no_variations);

    let decoded = oracle::decode_script(&oracle_input)?;
    if decoded.moves.is_empty() {
        return Ok(None);
    }

    let sans: Vec<String> = decoded.moves.iter().map(|m| m.san.clone()).collect();
    // Alignment matches the tokens as the source wrote them, not the
    // canonical SANs — the two differ on suffixes and disambiguation.
    let tokens: Vec<String> = decoded.moves.iter().map(|m| m.token.clone()).collect();
    let comments = align::align(&no_variations, &tokens);

    let moves: Vec<AnnotatedMove> = decoded
        .moves
        .iter()
        .zip(comments)
        .map(|(decoded_move, raw_comments)| {
            let mut annotated = AnnotatedMove {
                san: decoded_move.san.clone(),
                side: decoded_move.side,
                comment: None,
                highlighted_squares: Vec::new(),
                arrows: Vec::new(),
            };
            if !raw_comments.is_empty() {
                let parsed = markup::parse(&raw_comments.join(" "));
                if !parsed.clean_text.is_empty() {
                    annotated.comment = Some(parsed.clean_text);
                }
                annotated.highlighted_squares = parsed.highlighted_squares;
                annotated.arrows = parsed.arrows;
            }
            annotated
        })
        .collect();

    let id = line_id(&decoded.start_fen, &sans);
    Ok(Some(StudyLine {
        id,
        start_fen: decoded.start_fen,
        moves,
        name: name::derive_name(&headers, &movetext),
        scheduling: SchedulingState::fresh(now),
        mistake_moves: BTreeSet::new(),
    }))
}

fn parse_headers(game: &str) -> HashMap<String, String> {
    let header_re = Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap();
    header_re
        .captures_iter(game)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

/// Drop header lines, keeping comment lines that merely start with '['.
fn strip_headers(game: &str) -> String {
    let header_line_re = Regex::new(r#"^\[\w+\s+".*"\]\s*$"#).unwrap();
    game.lines()
        .filter(|line| !header_line_re.is_match(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_comments(text: &str) -> String {
    let comment_re = Regex::new(r"\{[^}]*\}").unwrap();
    comment_re.replace_all(text, " ").into_owned()
}

/// FNV-1a over the start position and move sequence: stable across runs so
/// re-importing the same file maps onto the same line ids.
fn line_id(start_fen: &str, sans: &[String]) -> String {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let bytes = start_fen
        .bytes()
        .chain(sans.iter().flat_map(|s| s.bytes().chain(std::iter::once(b' '))));
    for byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("line-{hash:016x}")
}
