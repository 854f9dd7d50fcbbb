// src/linkify/mod.rs
// =============================================================================
// This module contains the keyword linkification engine.
//
// Submodules:
// - keywords: splits the configured keyword list into link rules
// - protect: finds Markdown regions that must never be rewritten
// - scan: finds qualifying occurrences of one keyword
// - engine: plans all replacements and rewrites the body once
//
// The engine is pure: no I/O, no shared state, and it never fails. Callers
// pass the settings in on every call.
// =============================================================================

mod engine;
mod keywords;
mod protect;
mod scan;

pub use engine::{apply, linkify, linkify_rules, plan, LinkifyOptions, Match, Occurrences};
pub use keywords::{parse_keywords, rules_for, LinkRule};
