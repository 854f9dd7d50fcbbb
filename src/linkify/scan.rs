// src/linkify/scan.rs
// =============================================================================
// Finds where a single keyword may be linked.
//
// A candidate occurrence qualifies when:
// 1. it matches the keyword literally, ignoring case
// 2. it stands as a whole word (see `is_whole_word`)
// 3. it is not already the label of a link: not right after `[`, and not
//    followed on the same line by `](` before another `[` opens
// 4. it does not touch a protected range (links, images, code, HTML, URLs)
//
// Checks 3 and 4 only depend on the body, so they are prepared once in a
// `BodyIndex` and answered with binary searches.
// =============================================================================

use regex::{Regex, RegexBuilder};
use std::ops::Range;

use super::protect::{is_protected, protected_ranges};

/// Facts about a body that every keyword scan shares.
#[derive(Debug)]
pub struct BodyIndex {
    protected: Vec<Range<usize>>,
    // Every `[`, `]` and newline, in order. The flag is true for a `]` that
    // is directly followed by `(` with a `)` later on its line.
    label_stops: Vec<(usize, bool)>,
}

impl BodyIndex {
    pub fn new(text: &str) -> Self {
        Self {
            protected: protected_ranges(text),
            label_stops: label_stops(text),
        }
    }

    // "AI tools](https://x.test)" means a match ending before "tools" sits
    // inside a label that another `[` opened earlier on the line. A `[` or a
    // newline coming first means it does not.
    fn inside_link_label(&self, pos: usize) -> bool {
        let idx = self.label_stops.partition_point(|&(at, _)| at < pos);
        self.label_stops
            .get(idx)
            .is_some_and(|&(_, closes_label)| closes_label)
    }
}

// One backwards pass over the bytes; every character we look for is ASCII,
// so byte positions are also char boundaries
fn label_stops(text: &str) -> Vec<(usize, bool)> {
    let bytes = text.as_bytes();
    let mut stops = Vec::new();
    let mut paren_ahead = false;

    for (i, &b) in bytes.iter().enumerate().rev() {
        match b {
            b'[' => stops.push((i, false)),
            b']' => {
                let closes_label = bytes.get(i + 1) == Some(&b'(') && paren_ahead;
                stops.push((i, closes_label));
            }
            b'\n' => {
                stops.push((i, false));
                paren_ahead = false;
            }
            b')' => paren_ahead = true,
            _ => {}
        }
    }

    stops.reverse();
    stops
}

/// Literal, case-insensitive matcher for one keyword.
#[derive(Debug)]
pub struct KeywordMatcher {
    regex: Regex,
    first: char,
    last: char,
}

impl KeywordMatcher {
    // Builds a matcher, or None for a keyword that is blank after trimming
    //
    // regex::escape() makes every metacharacter literal, so "C++" or ".*"
    // search for exactly those characters.
    pub fn new(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        let first = keyword.chars().next()?;
        let last = keyword.chars().next_back()?;

        let regex = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .ok()?;

        Some(Self { regex, first, last })
    }

    // Returns the byte spans in `text` where this keyword can be linked
    //
    // Parameters:
    //   text: the original document body
    //   index: BodyIndex::new(text)
    pub fn find_spans(&self, text: &str, index: &BodyIndex) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.regex.find_at(text, pos) {
            let span = m.range();

            if self.qualifies(text, &span, index) {
                pos = span.end;
                spans.push(span);
            } else {
                // A rejected candidate may overlap a good one, so only step
                // one character forward
                pos = span.start + next_char_len(text, span.start);
            }

            if pos >= text.len() {
                break;
            }
        }

        spans
    }

    fn qualifies(&self, text: &str, span: &Range<usize>, index: &BodyIndex) -> bool {
        is_whole_word(text, span, self.first, self.last)
            && !text[..span.start].ends_with('[')
            && !index.inside_link_label(span.end)
            && !is_protected(&index.protected, span)
    }
}

// Checks both edges of a match
//
// The neighbour on each side must not be a word character (letter, digit,
// underscore). When the keyword edge is itself a symbol, the neighbour must
// also not repeat that symbol, so "C++" stands alone in "C++ and" but not
// in "C+++".
fn is_whole_word(text: &str, span: &Range<usize>, first: char, last: char) -> bool {
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();

    edge_ok(before, first) && edge_ok(after, last)
}

fn edge_ok(neighbour: Option<char>, edge: char) -> bool {
    match neighbour {
        None => true,
        Some(c) if is_word_char(c) => false,
        Some(c) => is_word_char(edge) || c != edge,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn next_char_len(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why regex::escape()?
//    - Keywords come from a settings form, so they can hold anything
//    - escape() turns "C++" into "C\+\+", which matches the two plus signs
//      literally instead of meaning "one or more"
//
// 2. Why not \b for word boundaries?
//    - The regex crate has no look-behind or look-ahead, and \b treats "+"
//      as a non-word character, so "C++" followed by a space would never end
//      on a boundary
//    - Checking the neighbouring chars by hand gives us the rule we want
//
// 3. What does find_at() do?
//    - It searches starting at a byte offset but still sees the text before
//      it, which keeps positions relative to the whole body
//
// 4. Why chars().next_back()?
//    - Byte offsets can land in the middle of "é" or "🚀"; slicing to the
//      offset and asking for the last char always gives a whole character
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(keyword: &str, text: &str) -> Vec<Range<usize>> {
        KeywordMatcher::new(keyword)
            .expect("keyword is not blank")
            .find_spans(text, &BodyIndex::new(text))
    }

    #[test]
    fn test_blank_keyword_has_no_matcher() {
        assert!(KeywordMatcher::new("").is_none());
        assert!(KeywordMatcher::new("   ").is_none());
    }

    #[test]
    fn test_whole_word_only() {
        assert_eq!(spans("AI", "MAINFRAME uses AI daily"), vec![15..17]);
        assert!(spans("AI", "AIR and PAID").is_empty());
        assert!(spans("AI", "snake_AI_case").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(spans("ai", "AI, Ai and ai"), vec![0..2, 4..6, 11..13]);
    }

    #[test]
    fn test_unicode_neighbours_count_as_letters() {
        assert!(spans("IA", "IAé").is_empty());
        assert_eq!(spans("inversión", "la inversión, hoy"), vec![3..13]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        assert_eq!(spans("C++", "I love C++ and C+++"), vec![7..10]);
        assert!(spans(".*", "anything at all").is_empty());
        assert_eq!(spans("(a|b)", "x (a|b) y"), vec![2..7]);
    }

    #[test]
    fn test_symbol_keyword_next_to_punctuation() {
        assert_eq!(spans("C++", "(C++), C++."), vec![1..4, 7..10]);
    }

    #[test]
    fn test_rejects_after_open_bracket() {
        assert!(spans("AI", "[AI").is_empty());
    }

    #[test]
    fn test_rejects_inside_label() {
        assert!(spans("AI", "[Learn AI today](https://x.test)").is_empty());
    }

    #[test]
    fn test_later_link_on_line_does_not_block() {
        assert_eq!(spans("AI", "AI and [other](https://x.test)"), vec![0..2]);
    }

    #[test]
    fn test_bracket_on_next_line_does_not_block() {
        assert_eq!(spans("AI", "AI\n](https://x.test)"), vec![0..2]);
    }

    #[test]
    fn test_protected_ranges_are_skipped() {
        assert_eq!(spans("AI", "`AI` and AI"), vec![9..11]);
    }

    #[test]
    fn test_label_stops() {
        let stops = label_stops("a](b) [c]\n]x)");
        assert_eq!(
            stops,
            vec![(1, true), (6, false), (8, false), (9, false), (10, false)]
        );
    }

    #[test]
    fn test_unclosed_paren_is_not_a_label() {
        assert_eq!(spans("AI", "AI](no closing"), vec![0..2]);
    }

    #[test]
    fn test_rejected_candidate_does_not_hide_next_one() {
        // "aa" at 0 is glued to the third 'a'; the real word starts later
        assert_eq!(spans("aa", "aaa aa"), vec![4..6]);
    }
}
