//! Comment markup parser for `[%csl ...]` and `[%cal ...]` directives.

use regex::Regex;

use crate::model::{Arrow, HighlightedSquare, MarkupColor};

/// Markup extracted from one raw comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    pub clean_text: String,
    pub highlighted_squares: Vec<HighlightedSquare>,
    pub arrows: Vec<Arrow>,
}

/// Extract colored squares, arrows and clean prose from a raw comment.
/// Best-effort: malformed tokens are dropped, never rejected. Every
/// `[%word ...]` directive is stripped from the clean text, not only the
/// two recognized kinds.
pub fn parse(raw: &str) -> Markup {
    let csl_re = Regex::new(r"\[%csl\s+([^\]]*)\]").unwrap();
    let cal_re = Regex::new(r"\[%cal\s+([^\]]*)\]").unwrap();
    let directive_re = Regex::new(r"\[%\w+[^\]]*\]").unwrap();

    let mut highlighted_squares = Vec::new();
    for cap in csl_re.captures_iter(raw) {
        for token in cap[1].split(',') {
            if let Some(sq) = parse_square_token(token.trim()) {
                highlighted_squares.push(sq);
            }
        }
    }

    let mut arrows = Vec::new();
    for cap in cal_re.captures_iter(raw) {
        for token in cap[1].split(',') {
            if let Some(arrow) = parse_arrow_token(token.trim()) {
                arrows.push(arrow);
            }
        }
    }

    // Stripping a directive leaves its surrounding whitespace behind;
    // collapse the runs so the prose reads cleanly.
    let ws_re = Regex::new(r"\s+").unwrap();
    let stripped = directive_re.replace_all(raw, "");
    let clean_text = ws_re.replace_all(&stripped, " ").trim().to_string();

    Markup {
        clean_text,
        highlighted_squares,
        arrows,
    }
}

/// `<color><square>`, e.g. "Ra1". Under 3 chars: dropped.
fn parse_square_token(token: &str) -> Option<HighlightedSquare> {
    if !token.is_ascii() || token.len() < 3 {
        return None;
    }
    let color = MarkupColor::from_char(token.chars().next()?)?;
    let square = normalize_square(&token[1..3])?;
    Some(HighlightedSquare { square, color })
}

/// `<color><from><to>`, e.g. "Yb4a2". Under 5 chars: dropped.
fn parse_arrow_token(token: &str) -> Option<Arrow> {
    if !token.is_ascii() || token.len() < 5 {
        return None;
    }
    let color = MarkupColor::from_char(token.chars().next()?)?;
    let from = normalize_square(&token[1..3])?;
    let to = normalize_square(&token[3..5])?;
    Some(Arrow { from, to, color })
}

/// Lowercase the file letter and validate `[a-h][1-8]`.
fn normalize_square(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let file = chars.next()?.to_ascii_lowercase();
    let rank = chars.next()?;
    if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some(format!("{file}{rank}"))
}
