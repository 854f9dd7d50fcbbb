// src/report.rs
// =============================================================================
// Prints the planned keyword matches of a document.
//
// Two formats:
// - a table for people, with a summary per keyword
// - JSON for scripts (serde_json)
//
// Everything is written to a `Write` so tests can capture it.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::linkify::{LinkRule, Match};

/// A match together with where it sits in the document, for display.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub keyword: String,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
    pub destination: String,
}

// Pairs each match with its keyword and 1-based line/column
pub fn build_report(body: &str, rules: &[LinkRule], matches: &[Match]) -> Vec<MatchReport> {
    let line_starts = line_starts(body);

    matches
        .iter()
        .map(|m| {
            let (line, column) = line_column(body, &line_starts, m.start);
            MatchReport {
                keyword: rules
                    .get(m.rule)
                    .map(|r| r.keyword.trim().to_string())
                    .unwrap_or_default(),
                text: m.text.clone(),
                line,
                column,
                start: m.start,
                end: m.end,
                destination: m.destination.clone(),
            }
        })
        .collect()
}

// Prints the report either as a table or JSON
pub fn print_report<W: Write>(out: &mut W, report: &[MatchReport], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else {
        print_table(out, report)?;
    }
    Ok(())
}

fn print_table<W: Write>(out: &mut W, report: &[MatchReport]) -> io::Result<()> {
    writeln!(out, "{:<10} {:<30} {:<40}", "LINE:COL", "TEXT", "DESTINATION")?;
    writeln!(out, "{}", "=".repeat(80))?;

    for row in report {
        let position = format!("{}:{}", row.line, row.column);
        writeln!(
            out,
            "{:<10} {:<30} {:<40}",
            position,
            truncate(&row.text, 30),
            truncate(&row.destination, 40)
        )?;
    }

    writeln!(out)?;

    // BTreeMap keeps the summary in a stable, sorted order
    let mut per_keyword: BTreeMap<&str, usize> = BTreeMap::new();
    for row in report {
        *per_keyword.entry(row.keyword.as_str()).or_default() += 1;
    }

    writeln!(out, "Summary:")?;
    for (keyword, count) in &per_keyword {
        writeln!(out, "   {keyword}: {count}")?;
    }
    writeln!(out, "   Total: {}", report.len())?;
    Ok(())
}

// Shortens long cells, counting characters rather than bytes
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

// Byte offset where each line begins
fn line_starts(body: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(body.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn line_column(body: &str, line_starts: &[usize], offset: usize) -> (usize, usize) {
    let line = line_starts.partition_point(|&start| start <= offset);
    let column = body[line_starts[line - 1]..offset].chars().count() + 1;
    (line, column)
}
