// src/linkify/protect.rs
// =============================================================================
// This module finds the parts of a Markdown document that keywords must
// never be linked inside.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Can report the byte range each event came from (offset iterator)
//
// Protected ranges are:
// - links of every kind (inline, reference, autolinks), label and URL
// - images
// - inline code and code blocks
// - raw HTML, plus everything between inline <a>, <code>, <script> and
//   <style> tags and their closing tags
// - bare http:// and https:// URLs sitting in plain text
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use std::ops::Range;

// Inline HTML elements whose content is off limits
const PROTECTED_ELEMENTS: [&str; 4] = ["a", "code", "script", "style"];

// Collects the protected byte ranges of a Markdown document
//
// Parameters:
//   markdown: the article body (borrowed as &str)
//
// Returns: sorted, non-overlapping ranges
//
// Example:
//   "See [AI](https://a.test) and `AI`"
//   -> [4..24, 29..33]
pub fn protected_ranges(markdown: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    // Inline HTML elements opened in the current block: (tag name, start)
    let mut open_elements: Vec<(String, usize)> = Vec::new();

    // into_offset_iter() pairs every event with the slice of input it covers.
    // For Start events the range spans the whole element, children included.
    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::Link(..))
            | Event::Start(Tag::Image(..))
            | Event::Start(Tag::CodeBlock(_)) => ranges.push(range),

            Event::Code(_) => ranges.push(range),

            Event::Html(html) => {
                // HTML block lines end with a newline and are covered whole;
                // inline tags are single tokens whose content comes as Text
                if !html.ends_with('\n') {
                    match html_tag(&html) {
                        Some(HtmlTag::Open(name)) if is_protected_element(name) => {
                            open_elements.push((name.to_ascii_lowercase(), range.start));
                        }
                        Some(HtmlTag::Close(name)) => {
                            if let Some(pos) = open_elements
                                .iter()
                                .rposition(|(open, _)| open.eq_ignore_ascii_case(name))
                            {
                                ranges.push(open_elements[pos].1..range.end);
                                open_elements.truncate(pos);
                            }
                        }
                        _ => {}
                    }
                }
                ranges.push(range);
            }

            // Inline HTML does not pair across blocks
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) => open_elements.clear(),

            _ => {}
        }
    }

    // Bare URLs are plain text to the parser, which may split them across
    // several Text events, so search the raw input instead
    ranges.extend(bare_urls(markdown));

    merge(ranges)
}

// True when `span` touches any protected range
//
// `ranges` must come from protected_ranges() (sorted and merged)
pub fn is_protected(ranges: &[Range<usize>], span: &Range<usize>) -> bool {
    // First range that ends after our start is the only candidate
    let idx = ranges.partition_point(|r| r.end <= span.start);
    ranges
        .get(idx)
        .is_some_and(|r| r.start < span.end)
}

enum HtmlTag<'a> {
    Open(&'a str),
    Close(&'a str),
}

// Reads the tag name of a single inline HTML token
//
// "<a href=...>" -> Open("a"), "</A>" -> Close("A"). Self-closing tags,
// comments and declarations give None.
fn html_tag(html: &str) -> Option<HtmlTag<'_>> {
    let html = html.trim();
    let inner = html.strip_prefix('<')?;
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    if len == 0 {
        return None;
    }
    let name = &inner[..len];

    if closing {
        Some(HtmlTag::Close(name))
    } else if html.ends_with("/>") {
        None
    } else {
        Some(HtmlTag::Open(name))
    }
}

fn is_protected_element(name: &str) -> bool {
    PROTECTED_ELEMENTS
        .iter()
        .any(|element| element.eq_ignore_ascii_case(name))
}

// Finds bare http(s) URLs in the document
//
// A URL runs from its scheme to the next whitespace or angle bracket.
// One pass over the "http" occurrences; ones inside a URL already found are
// skipped.
fn bare_urls(text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut covered_to = 0;

    for (start, _) in text.match_indices("http") {
        if start < covered_to {
            continue;
        }
        let scheme_rest = &text[start + 4..];
        if !(scheme_rest.starts_with("://") || scheme_rest.starts_with("s://")) {
            continue;
        }

        let len = text[start..]
            .find(|c: char| c.is_whitespace() || c == '<' || c == '>')
            .unwrap_or(text.len() - start);
        covered_to = start + len;
        found.push(start..covered_to);
    }

    found
}

// Sorts ranges and joins the ones that overlap or touch
fn merge(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Range<usize>?
//    - start..end, where start is included and end is not
//    - Here they are byte offsets into the &str, so they can slice it
//      directly: &markdown[range]
//
// 2. Why merge the ranges?
//    - A link inside an HTML block, or a URL inside a link label, would
//      otherwise show up twice
//    - Sorted, non-overlapping ranges let is_protected() use a binary
//      search (partition_point) instead of checking every range
//
// 3. What does partition_point do?
//    - Given a predicate that is true for a prefix of the slice, it returns
//      the index of the first element where it turns false
// -----------------------------------------------------------------------------
