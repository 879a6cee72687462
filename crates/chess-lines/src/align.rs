//! Aligns `{...}` comments to the move they follow.
//!
//! Move text can repeat within one line (piece retreats, transpositions), so
//! a global "find the comment after this move's text" search is ambiguous.
//! Instead the cleaned text is walked exactly once, consuming move tokens in
//! lockstep with the decoded move list: the next word that matches the next
//! expected move is that move, because every earlier occurrence has already
//! been consumed.

use regex::Regex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Comment(String),
    Word(String),
}

/// Remove all `(...)` variation blocks in one linear pass, honoring nesting.
/// Comment bodies inside a removed variation are skipped wholly so stray
/// parentheses in them cannot unbalance the depth counter.
pub fn strip_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth: usize = 0;
    let mut iter = text.chars();

    while let Some(c) = iter.next() {
        if depth == 0 {
            match c {
                '(' => depth = 1,
                '{' => {
                    out.push('{');
                    for cc in iter.by_ref() {
                        out.push(cc);
                        if cc == '}' {
                            break;
                        }
                    }
                }
                _ => out.push(c),
            }
        } else {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                '{' => {
                    for cc in iter.by_ref() {
                        if cc == '}' {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    out
}

/// Map each move index to the raw comments that follow it in the movetext.
///
/// `movetext` must already be variation-free (see [`strip_variations`]);
/// `move_tokens` is the oracle's matched source token for each move, in
/// order. If the walk ever meets a move token it did not expect, alignment
/// has lost its place: that index and everything after it get no comments,
/// and the miss is logged — the line stays usable.
pub fn align(movetext: &str, move_tokens: &[String]) -> Vec<Vec<String>> {
    let move_like_re =
        Regex::new(r"^(?:[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?|O-O-O|O-O)$").unwrap();

    let mut result: Vec<Vec<String>> = vec![Vec::new(); move_tokens.len()];
    let mut matched: usize = 0;

    for token in tokenize(movetext) {
        match token {
            Token::Word(word) => {
                let core = word_core(&word);
                if matched < move_tokens.len() && core_matches(core, &move_tokens[matched]) {
                    matched += 1;
                } else if move_like_re.is_match(core) {
                    // A move token where none was expected. Any comment from
                    // here on would attach to the wrong move, so stop.
                    warn!(
                        word = %word,
                        matched, "unexpected move token; dropping annotations from here on"
                    );
                    return result;
                }
            }
            Token::Comment(comment) => {
                // Comments before the first move are the pre-game comment;
                // the namer reads those separately.
                if matched > 0 && !comment.is_empty() {
                    result[matched - 1].push(comment);
                }
            }
        }
    }

    if matched < move_tokens.len() {
        warn!(
            expected = move_tokens.len(),
            matched, "movetext ended before every move was matched; dropping trailing annotations"
        );
    }

    result
}

/// Split variation-free movetext into comment and word tokens.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut iter = text.chars().peekable();

    while let Some(&c) = iter.peek() {
        if c == '{' {
            iter.next();
            let mut body = String::new();
            for cc in iter.by_ref() {
                if cc == '}' {
                    break;
                }
                body.push(cc);
            }
            tokens.push(Token::Comment(body.trim().to_string()));
        } else if c.is_whitespace() {
            iter.next();
        } else {
            let mut word = String::new();
            while let Some(&cc) = iter.peek() {
                if cc.is_whitespace() || cc == '{' {
                    break;
                }
                word.push(cc);
                iter.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    tokens
}

/// Strip a glued move number ("12...Nf6"), `!?` glyphs and check/mate
/// suffixes down to the bare move token.
fn word_core(word: &str) -> &str {
    word.trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches('.')
        .trim_end_matches(|c| c == '!' || c == '?')
        .trim_end_matches(|c| c == '+' || c == '#')
}

/// Check/mate suffixes are ignored on the expected side too, since source
/// text does not always carry them.
fn core_matches(core: &str, expected: &str) -> bool {
    !core.is_empty() && core == expected.trim_end_matches(|c| c == '+' || c == '#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_nested_variations() {
        let text = "1. e4 {main} (1. d4 d5 (1... Nf6 {note (with parens)}) 2. c4) 1... e5";
        assert_eq!(strip_variations(text), "1. e4 {main}  1... e5");
    }

    #[test]
    fn comment_follows_its_move() {
        let moves = tokens(&["e4", "e5", "Nf3"]);
        let aligned = align("1. e4 {best by test} e5 2. Nf3 {develops}", &moves);
        assert_eq!(aligned[0], vec!["best by test"]);
        assert!(aligned[1].is_empty());
        assert_eq!(aligned[2], vec!["develops"]);
    }

    #[test]
    fn repeated_move_text_goes_to_later_occurrence() {
        let moves = tokens(&["Nf3", "Nf6", "Ng1", "Ng8", "Nf3"]);
        let aligned = align("1. Nf3 Nf6 2. Ng1 Ng8 3. Nf3 {back again}", &moves);
        assert!(aligned[0].is_empty());
        assert_eq!(aligned[4], vec!["back again"]);
    }

    #[test]
    fn multiple_comments_collect_on_one_move() {
        let moves = tokens(&["e4"]);
        let aligned = align("1. e4 {one} {two}", &moves);
        assert_eq!(aligned[0], vec!["one", "two"]);
    }

    #[test]
    fn pre_game_comment_is_not_attributed() {
        let moves = tokens(&["e4"]);
        let aligned = align("{Chapter intro} 1. e4", &moves);
        assert!(aligned[0].is_empty());
    }

    #[test]
    fn glued_move_numbers_and_glyphs_still_match() {
        let moves = tokens(&["e4", "c5", "Nf3"]);
        let aligned = align("1.e4 c5!? {sharp} 2.Nf3 {standard}", &moves);
        assert_eq!(aligned[1], vec!["sharp"]);
        assert_eq!(aligned[2], vec!["standard"]);
    }

    #[test]
    fn check_suffix_mismatch_is_tolerated() {
        let moves = tokens(&["e4", "e5", "Qh5", "Nc6", "Qxf7+"]);
        let aligned = align("1. e4 e5 2. Qh5 Nc6 3. Qxf7 {oops, no suffix}", &moves);
        assert_eq!(aligned[4], vec!["oops, no suffix"]);
    }

    #[test]
    fn missing_move_degrades_rest_of_line() {
        let moves = tokens(&["e4", "e5", "Nf3"]);
        let aligned = align("1. e4 {kept}", &moves);
        assert_eq!(aligned[0], vec!["kept"]);
        assert!(aligned[1].is_empty());
        assert!(aligned[2].is_empty());
    }

    #[test]
    fn comments_after_a_lost_place_are_dropped() {
        // "d5" is a move token the walk did not expect: nothing after it can
        // be attributed safely, including the comment on the real Nf3.
        let moves = tokens(&["e4", "e5", "Nf3"]);
        let aligned = align("1. e4 {own note} d5 {stray} 2. Nf3 {late}", &moves);
        assert_eq!(aligned[0], vec!["own note"]);
        assert!(aligned[1].is_empty());
        assert!(aligned[2].is_empty());
    }

    #[test]
    fn source_spelling_is_matched_verbatim() {
        // The caller hands over tokens as the source wrote them, so a
        // redundantly disambiguated knight move still lines up.
        let moves = tokens(&["e4", "e5", "Ngf3", "Nc6"]);
        let aligned = align("1. e4 e5 2. Ngf3 {develops} Nc6 {solid}", &moves);
        assert_eq!(aligned[2], vec!["develops"]);
        assert_eq!(aligned[3], vec!["solid"]);
    }
}
