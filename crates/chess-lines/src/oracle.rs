//! Thin adapter over shakmaty — the only place that applies moves or decodes
//! notation. Everything above it treats chess rules as a black box.

use regex::Regex;
use shakmaty::{
    fen::Fen,
    san::{San, SanPlus},
    uci::UciMove,
    CastlingMode, Chess, EnPassantMode, Move, Position,
};

use crate::error::LineError;
use crate::model::Side;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One decoded half-move from a movetext script.
#[derive(Debug, Clone)]
pub struct DecodedMove {
    pub san: String,   // canonical SAN, re-derived from the applied move
    pub token: String, // the token as written in the source text
    pub side: Side,
    pub fen_after: String,
}

/// Full decode of a movetext script.
#[derive(Debug, Clone)]
pub struct DecodedScript {
    pub start_fen: String,
    pub moves: Vec<DecodedMove>,
    pub final_fen: String,
}

pub fn position_from_fen(fen: &str) -> Result<Chess, LineError> {
    let parsed: Fen = fen
        .parse()
        .map_err(|e| LineError::InvalidFen(format!("{fen}: {e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| LineError::InvalidFen(format!("{fen}: {e}")))
}

pub fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Apply one SAN move, returning the move, the resulting position and the
/// move's canonical notation.
pub fn apply_san(pos: &Chess, san: &str) -> Result<(Move, Chess, String), LineError> {
    let parsed: San = san
        .parse()
        .map_err(|_| LineError::IllegalMove(san.to_string()))?;
    let mv = parsed
        .to_move(pos)
        .map_err(|_| LineError::IllegalMove(san.to_string()))?;
    let canonical = SanPlus::from_move(pos.clone(), mv.clone()).to_string();
    let mut next = pos.clone();
    next.play_unchecked(mv.clone());
    Ok((mv, next, canonical))
}

/// Apply user input given as either SAN or UCI.
pub fn apply_input(pos: &Chess, input: &str) -> Result<(Move, Chess, String), LineError> {
    if let Ok(out) = apply_san(pos, input) {
        return Ok(out);
    }
    let uci: UciMove = input
        .parse()
        .map_err(|_| LineError::IllegalMove(input.to_string()))?;
    let mv = uci
        .to_move(pos)
        .map_err(|_| LineError::IllegalMove(input.to_string()))?;
    let canonical = SanPlus::from_move(pos.clone(), mv.clone()).to_string();
    let mut next = pos.clone();
    next.play_unchecked(mv.clone());
    Ok((mv, next, canonical))
}

/// Decode a header-free, comment-free, variation-free movetext into an
/// ordered move list with the position after each move.
pub fn decode_script(movetext: &str) -> Result<DecodedScript, LineError> {
    let move_re =
        Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").unwrap();

    let mut pos = Chess::default();
    let start_fen = fen_of(&pos);
    let mut moves = Vec::new();

    for token in move_re.find_iter(movetext) {
        let side = Side::from(pos.turn());
        let (_, next, canonical) = apply_san(&pos, token.as_str()).map_err(|_| {
            LineError::MalformedScript(format!(
                "illegal move {} at ply {}",
                token.as_str(),
                moves.len() + 1
            ))
        })?;
        pos = next;
        moves.push(DecodedMove {
            san: canonical,
            token: token.as_str().to_string(),
            side,
            fen_after: fen_of(&pos),
        });
    }

    Ok(DecodedScript {
        start_fen,
        final_fen: fen_of(&pos),
        moves,
    })
}
