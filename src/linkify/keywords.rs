// src/linkify/keywords.rs
// =============================================================================
// This module turns the configured keyword list into link rules.
//
// The site stores keywords as one comma-separated string, e.g.
//   "AI, bitcoin, C++, inversión"
// and a destination URL. The engine works on an ordered list of
// (keyword, destination) pairs so each keyword could point somewhere else;
// the shared-destination case is just every rule carrying the same URL.
// =============================================================================

/// One keyword and the URL it should link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRule {
    pub keyword: String,
    pub destination: String,
}

impl LinkRule {
    pub fn new(keyword: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            destination: destination.into(),
        }
    }

    /// A rule is usable when both sides have something in them after trimming
    pub fn is_active(&self) -> bool {
        !self.keyword.trim().is_empty() && !self.destination.trim().is_empty()
    }
}

// Splits a comma-separated keyword list
//
// Parameters:
//   raw: the list as typed in the admin settings
//
// Returns: keywords in their original order, trimmed, empty entries removed.
// Duplicates are kept; the engine handles them.
//
// Example:
//   " AI, ,bitcoin ,," -> ["AI", "bitcoin"]
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pairs every keyword with the same destination, preserving order.
pub fn rules_for<I, S>(keywords: I, destination: &str) -> Vec<LinkRule>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| LinkRule::new(k.as_ref(), destination))
        .collect()
}
