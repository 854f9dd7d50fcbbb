// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - apply: write the article with keywords linked
// - scan:  show which keywords would be linked, and where
// - slug:  turn an article title into its URL slug
//
// The keyword rules come from a settings file (--settings), from flags
// (--url / --keywords), or both; flags win over the file.
// =============================================================================

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "smartlinker",
    version,
    about = "Link configured keywords in markdown articles to a smartlink",
    long_about = "smartlinker wraps every standalone occurrence of the configured keywords \
                  in a markdown link, leaving existing links, images and code alone."
)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Link keywords in an article and print the result
    ///
    /// Example: smartlinker apply post.md --settings settings.json -o out.md
    Apply {
        /// Markdown file to read ("-" or nothing reads stdin)
        input: Option<PathBuf>,

        #[command(flatten)]
        rules: RuleArgs,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the keyword occurrences that would be linked
    ///
    /// Example: smartlinker scan post.md --url https://s.test --keywords "AI, C++"
    Scan {
        /// Markdown file to read ("-" or nothing reads stdin)
        input: Option<PathBuf>,

        #[command(flatten)]
        rules: RuleArgs,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the URL slug for an article title
    ///
    /// Example: smartlinker slug "¿Qué es Bitcoin?"
    Slug {
        /// The article title
        title: String,
    },
}

/// Where the keyword rules come from.
#[derive(Args, Debug, Default, Clone)]
pub struct RuleArgs {
    /// JSON settings file with smartlink_url and smartlink_keywords
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Destination URL for every keyword (overrides the settings file)
    #[arg(long)]
    pub url: Option<String>,

    /// Comma-separated keywords (overrides the settings file)
    #[arg(long)]
    pub keywords: Option<String>,

    /// Link only the first occurrence of each keyword
    #[arg(long)]
    pub first_only: bool,
}
