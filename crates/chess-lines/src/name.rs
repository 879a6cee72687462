//! Display-name derivation for a parsed line.
//!
//! Authoring tools disagree about where a chapter title lives: some put a
//! move sequence in the White/Black player fields, some use Event or the
//! opening headers, some only leave a leading comment. The chain below tries
//! those in order of reliability.

use std::collections::HashMap;

use regex::Regex;

const MAX_COMMENT_NAME_LEN: usize = 100;

/// Header keys scanned when no chapter-style White/Black pair exists.
const HEADER_PREFERENCE: [&str; 8] = [
    "Event",
    "Opening",
    "Variation",
    "ECO",
    "Site",
    "Annotator",
    "White",
    "Black",
];

/// Derive a display name for a line, or None if nothing usable exists
/// (the caller falls back to a positional "Chapter N" label).
pub fn derive_name(headers: &HashMap<String, String>, game_text: &str) -> Option<String> {
    if let Some(name) = chapter_style_name(headers) {
        return Some(name);
    }
    for key in HEADER_PREFERENCE {
        if let Some(value) = present(headers, key) {
            return Some(value);
        }
    }
    first_comment_name(game_text)
}

/// A non-empty, non-placeholder header value.
fn present(headers: &HashMap<String, String>, key: &str) -> Option<String> {
    headers
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != "?")
        .map(str::to_string)
}

/// Some study files encode chapter titles through the player-name fields,
/// e.g. White "1.d4 Repertoire" / Black "Nimzo lines". Detected by a
/// move-number pattern in either field.
fn chapter_style_name(headers: &HashMap<String, String>) -> Option<String> {
    let white = present(headers, "White")?;
    let black = present(headers, "Black")?;
    let move_number_re = Regex::new(r"\d+\.|\.\.\.").unwrap();
    if move_number_re.is_match(&white) || move_number_re.is_match(&black) {
        Some(format!("{white} - {black}"))
    } else {
        None
    }
}

/// First line of the first `{...}` comment, directives stripped.
fn first_comment_name(game_text: &str) -> Option<String> {
    let comment_re = Regex::new(r"\{([^}]*)\}").unwrap();
    let directive_re = Regex::new(r"\[%\w+[^\]]*\]").unwrap();

    let body = comment_re.captures(game_text)?.get(1)?.as_str();
    let first_line = body.lines().next().unwrap_or("");
    let cleaned = directive_re.replace_all(first_line, "").trim().to_string();

    if !cleaned.is_empty() && cleaned.len() < MAX_COMMENT_NAME_LEN {
        Some(cleaned)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn chapter_style_player_fields_win() {
        let h = headers(&[
            ("White", "1.e4 Repertoire"),
            ("Black", "Sicilian"),
            ("Event", "My Study"),
        ]);
        assert_eq!(
            derive_name(&h, ""),
            Some("1.e4 Repertoire - Sicilian".to_string())
        );
    }

    #[test]
    fn ellipsis_counts_as_move_pattern() {
        let h = headers(&[("White", "Main line"), ("Black", "...Nf6 setups")]);
        assert_eq!(derive_name(&h, ""), Some("Main line - ...Nf6 setups".into()));
    }

    #[test]
    fn plain_player_names_fall_through_to_event() {
        let h = headers(&[
            ("White", "Carlsen"),
            ("Black", "Caruana"),
            ("Event", "London 2018"),
        ]);
        assert_eq!(derive_name(&h, ""), Some("London 2018".to_string()));
    }

    #[test]
    fn placeholder_headers_are_skipped() {
        let h = headers(&[("Event", "?"), ("White", "?"), ("ECO", "B90")]);
        assert_eq!(derive_name(&h, ""), Some("B90".to_string()));
    }

    #[test]
    fn falls_back_to_first_comment() {
        let h = headers(&[("Event", "?")]);
        let text = "{The Najdorf [%csl Gd6] setup\nmore text} 1. e4";
        assert_eq!(derive_name(&h, text), Some("The Najdorf  setup".to_string()));
    }

    #[test]
    fn long_comment_gives_no_name() {
        let h = HashMap::new();
        let text = format!("{{{}}} 1. e4", "x".repeat(150));
        assert_eq!(derive_name(&h, &text), None);
    }

    #[test]
    fn nothing_usable_gives_none() {
        assert_eq!(derive_name(&HashMap::new(), "1. e4 e5"), None);
    }
}
