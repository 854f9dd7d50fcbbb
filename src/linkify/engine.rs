// src/linkify/engine.rs
// =============================================================================
// The linkify engine: wraps configured keywords in Markdown links.
//
// How it works:
// 1. Find the protected ranges of the body once (existing links, code, ...)
// 2. For each rule, in order, collect the spans where its keyword qualifies
//    against the ORIGINAL body
// 3. Drop spans that overlap a span an earlier rule already claimed
// 4. Rewrite the body in one pass, front to back
//
// Because every span is computed before anything is rewritten, text added by
// one replacement (a destination URL, say) is never scanned for the next
// keyword.
// =============================================================================

use std::collections::BTreeMap;
use std::ops::Range;
use tracing::{debug, trace};

use super::keywords::{rules_for, LinkRule};
use super::scan::{BodyIndex, KeywordMatcher};

/// How many occurrences of each keyword get linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Occurrences {
    /// Every qualifying occurrence
    #[default]
    All,
    /// Only the first qualifying occurrence
    First,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkifyOptions {
    pub occurrences: Occurrences,
}

impl LinkifyOptions {
    pub fn first_only() -> Self {
        Self {
            occurrences: Occurrences::First,
        }
    }

    fn limit(self) -> Option<usize> {
        match self.occurrences {
            Occurrences::All => None,
            Occurrences::First => Some(1),
        }
    }
}

/// A planned replacement: `start..end` of the original body becomes a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// Position of the claiming rule in the rule list
    pub rule: usize,
    /// Text exactly as it appears in the body
    pub text: String,
    pub destination: String,
}

impl Match {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

// Links every keyword to one shared destination
//
// Parameters:
//   body: the article body
//   keywords: keywords in priority order
//   destination: where every keyword links to
//
// Returns: the transformed body. An empty keyword list or a blank
// destination returns the body untouched.
//
// Example:
//   linkify("MAINFRAME uses AI daily", &["AI"], "https://x.test")
//   -> "MAINFRAME uses [AI](https://x.test) daily"
pub fn linkify<S: AsRef<str>>(body: &str, keywords: &[S], destination: &str) -> String {
    if keywords.is_empty() || destination.trim().is_empty() {
        return body.to_string();
    }
    let rules = rules_for(keywords, destination);
    linkify_rules(body, &rules, LinkifyOptions::default())
}

/// Links each rule's keyword to that rule's own destination.
pub fn linkify_rules(body: &str, rules: &[LinkRule], options: LinkifyOptions) -> String {
    let matches = plan(body, rules, options);
    apply(body, &matches)
}

// Works out every replacement without touching the body
//
// Returns: matches sorted by position, never overlapping. When two rules
// want the same text, the rule listed first keeps it.
pub fn plan(body: &str, rules: &[LinkRule], options: LinkifyOptions) -> Vec<Match> {
    if body.is_empty() || !rules.iter().any(LinkRule::is_active) {
        return Vec::new();
    }

    let body_index = BodyIndex::new(body);
    // Keyed by start offset, so the claims stay in body order
    let mut claimed: BTreeMap<usize, Match> = BTreeMap::new();

    for (index, rule) in rules.iter().enumerate() {
        if !rule.is_active() {
            trace!(rule = index, "skipping blank rule");
            continue;
        }
        let Some(matcher) = KeywordMatcher::new(&rule.keyword) else {
            continue;
        };

        // The occurrence limit counts only spans this rule actually keeps
        let mut kept = 0;
        for span in matcher.find_spans(body, &body_index) {
            if overlaps_claimed(&claimed, &span) {
                trace!(keyword = %rule.keyword, ?span, "span already claimed");
                continue;
            }
            claimed.insert(
                span.start,
                Match {
                    start: span.start,
                    end: span.end,
                    rule: index,
                    text: body[span].to_string(),
                    destination: rule.destination.trim().to_string(),
                },
            );
            kept += 1;
            if options.limit().is_some_and(|n| kept >= n) {
                break;
            }
        }

        debug!(keyword = %rule.keyword, matches = kept, "keyword scanned");
    }

    claimed.into_values().collect()
}

// Claims never overlap each other, so the only one that can reach into
// `span` is the last one starting before it ends
fn overlaps_claimed(claimed: &BTreeMap<usize, Match>, span: &Range<usize>) -> bool {
    claimed
        .range(..span.end)
        .next_back()
        .is_some_and(|(_, m)| m.end > span.start)
}

// Rewrites the body using planned matches
//
// `matches` must be sorted and non-overlapping, as plan() returns them.
// Everything outside the matches is copied byte for byte.
pub fn apply(body: &str, matches: &[Match]) -> String {
    if matches.is_empty() {
        return body.to_string();
    }

    let extra: usize = matches
        .iter()
        .map(|m| m.destination.len() + 4)
        .sum();
    let mut out = String::with_capacity(body.len() + extra);
    let mut cursor = 0;

    for m in matches {
        out.push_str(&body[cursor..m.start]);
        out.push('[');
        push_label(&mut out, &m.text);
        out.push_str("](");
        out.push_str(&m.destination);
        out.push(')');
        cursor = m.end;
    }
    out.push_str(&body[cursor..]);

    out
}

// Brackets inside a label would end it early
fn push_label(out: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(c, '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why plan first and apply later?
//    - Rewriting the string after every keyword would shift all later byte
//      offsets, and the next keyword would scan our own inserted links
//    - plan() only reads the body; apply() builds the new String once
//
// 2. Why a BTreeMap for claimed spans?
//    - It keeps keys sorted, so range(..end).next_back() finds the nearest
//      earlier claim in O(log n) instead of checking every claim
//    - into_values() then hands the matches back already in body order
//
// 3. What is String::with_capacity?
//    - It reserves the final size up front so push_str() never reallocates
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    const D: &str = "https://x.test";

    // Linear work finishes these bodies far inside the limit even in a debug
    // build; rescanning earlier matches or the rest of the line per match
    // takes minutes
    fn assert_links_quickly(body: &str, expected_links: usize) {
        let started = Instant::now();
        let out = linkify(body, &["AI"], D);
        let elapsed = started.elapsed();

        assert_eq!(out.matches("[AI](https://x.test)").count(), expected_links);
        assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
    }

    #[test]
    fn test_empty_keywords_is_noop() {
        let body = "AI everywhere";
        let none: [&str; 0] = [];
        assert_eq!(linkify(body, &none, D), body);
    }

    #[test]
    fn test_blank_destination_is_noop() {
        let body = "AI everywhere";
        assert_eq!(linkify(body, &["AI"], ""), body);
        assert_eq!(linkify(body, &["AI"], "   "), body);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(linkify("", &["AI"], D), "");
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(
            linkify("MAINFRAME uses AI daily", &["AI"], D),
            "MAINFRAME uses [AI](https://x.test) daily"
        );
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(
            linkify("Artificial Intelligence and ai are related", &["ai"], D),
            "Artificial Intelligence and [ai](https://x.test) are related"
        );
        assert_eq!(
            linkify("Bitcoin or BITCOIN", &["bitcoin"], D),
            "[Bitcoin](https://x.test) or [BITCOIN](https://x.test)"
        );
    }

    #[test]
    fn test_existing_link_untouched() {
        assert_eq!(
            linkify("[AI](https://existing.test) is powerful and AI grows", &["AI"], D),
            "[AI](https://existing.test) is powerful and [AI](https://x.test) grows"
        );
    }

    #[test]
    fn test_metacharacter_keyword() {
        assert_eq!(
            linkify("I love C++ and C+++", &["C++"], D),
            "I love [C++](https://x.test) and C+++"
        );
    }

    #[test]
    fn test_second_pass_adds_nothing() {
        let body = "AI and ML, then more AI.";
        let keywords = ["AI", "ML"];
        let once = linkify(body, &keywords, D);
        assert_eq!(linkify(&once, &keywords, D), once);
    }

    #[test]
    fn test_no_cascading_into_destinations() {
        // "test" appears in the destination inserted for "AI"
        let out = linkify("AI and test", &["AI", "test"], D);
        assert_eq!(out, "[AI](https://x.test) and [test](https://x.test)");
    }

    #[test]
    fn test_earlier_keyword_wins_overlap() {
        let rules = vec![
            LinkRule::new("machine learning", "https://ml.test"),
            LinkRule::new("learning", "https://learn.test"),
        ];
        let out = linkify_rules(
            "machine learning beats learning",
            &rules,
            LinkifyOptions::default(),
        );
        assert_eq!(
            out,
            "[machine learning](https://ml.test) beats [learning](https://learn.test)"
        );
    }

    #[test]
    fn test_duplicate_keywords_link_once() {
        assert_eq!(linkify("AI", &["AI", "ai"], D), "[AI](https://x.test)");
    }

    #[test]
    fn test_first_only() {
        let rules = rules_for(["AI"], D);
        let out = linkify_rules("AI, AI and AI", &rules, LinkifyOptions::first_only());
        assert_eq!(out, "[AI](https://x.test), AI and AI");
    }

    #[test]
    fn test_first_only_counts_unclaimed_spans() {
        let rules = vec![LinkRule::new("AI", "https://a.test"), LinkRule::new("ai", D)];
        let out = linkify_rules("AI then ai", &rules, LinkifyOptions::first_only());
        assert_eq!(out, "[AI](https://a.test) then [ai](https://x.test)");
    }

    #[test]
    fn test_code_and_images_untouched() {
        let body = "Use `AI` or ![AI](ai.png), not AI";
        assert_eq!(
            linkify(body, &["AI"], D),
            "Use `AI` or ![AI](ai.png), not [AI](https://x.test)"
        );
    }

    #[test]
    fn test_bare_url_untouched() {
        let body = "see https://ai.example.com for ai";
        assert_eq!(
            linkify(body, &["ai"], D),
            "see https://ai.example.com for [ai](https://x.test)"
        );
    }

    #[test]
    fn test_blank_rule_skipped_others_applied() {
        let rules = vec![LinkRule::new("AI", ""), LinkRule::new("ML", D)];
        let out = linkify_rules("AI and ML", &rules, LinkifyOptions::default());
        assert_eq!(out, "AI and [ML](https://x.test)");
    }

    #[test]
    fn test_plan_reports_spans() {
        let rules = rules_for(["ai"], D);
        let matches = plan("Hello AI", &rules, LinkifyOptions::default());
        assert_eq!(
            matches,
            vec![Match {
                start: 6,
                end: 8,
                rule: 0,
                text: "AI".to_string(),
                destination: D.to_string(),
            }]
        );
    }

    #[test]
    fn test_label_brackets_escaped() {
        let matches = vec![Match {
            start: 0,
            end: 3,
            rule: 0,
            text: "a]b".to_string(),
            destination: D.to_string(),
        }];
        assert_eq!(apply("a]b!", &matches), "[a\\]b](https://x.test)!");
    }

    #[test]
    fn test_untouched_text_is_byte_identical() {
        let body = "# Título\n\n*énfasis* — AI\r\n\ttab";
        let out = linkify(body, &["AI"], D);
        assert_eq!(out, "# Título\n\n*énfasis* — [AI](https://x.test)\r\n\ttab");
    }

    #[test]
    fn test_inline_html_anchor_untouched() {
        let body = r#"Read <a href="https://e.test">AI</a> now, AI later"#;
        assert_eq!(
            linkify(body, &["AI"], D),
            r#"Read <a href="https://e.test">AI</a> now, [AI](https://x.test) later"#
        );
    }

    #[test]
    fn test_inline_html_code_untouched() {
        let body = "Type <code>AI</code> or <CODE>ai</CODE>";
        assert_eq!(linkify(body, &["AI"], D), body);
    }

    #[test]
    fn test_many_matches_on_separate_lines() {
        assert_links_quickly(&"AI\n".repeat(40_000), 40_000);
    }

    #[test]
    fn test_many_matches_on_one_long_line() {
        let body = format!("{}[end](https://end.test)", "AI ".repeat(40_000));
        assert_links_quickly(&body, 40_000);
    }

    #[test]
    fn test_many_bare_urls() {
        assert_links_quickly(&"see https://a.test for AI\n".repeat(20_000), 20_000);
    }
}

