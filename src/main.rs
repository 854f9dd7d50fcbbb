// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, on stderr so stdout stays clean)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

use cli::{Cli, Commands, RuleArgs};
use smartlinker::report::{build_report, print_report};
use smartlinker::{linkify_rules, plan, slugify, LinkRule, LinkifyOptions, SmartlinkSettings};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Apply {
            input,
            rules,
            output,
        } => handle_apply(input.as_deref(), &rules, output.as_deref()),
        Commands::Scan { input, rules, json } => handle_scan(input.as_deref(), &rules, json),
        Commands::Slug { title } => {
            println!("{}", slugify(&title));
            Ok(0)
        }
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

// Handles the 'apply' subcommand: one engine call, one write
fn handle_apply(input: Option<&Path>, args: &RuleArgs, output: Option<&Path>) -> Result<i32> {
    let body = read_input(input)?;
    let rules = resolve_rules(args)?;

    let linked = linkify_rules(&body, &rules, options(args));

    match output {
        Some(path) => {
            fs::write(path, &linked)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote linked article");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(linked.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(0)
}

// Handles the 'scan' subcommand: report planned matches without rewriting
fn handle_scan(input: Option<&Path>, args: &RuleArgs, json: bool) -> Result<i32> {
    let body = read_input(input)?;
    let rules = resolve_rules(args)?;

    let matches = plan(&body, &rules, options(args));
    let report = build_report(&body, &rules, &matches);

    print_report(&mut io::stdout().lock(), &report, json)?;
    Ok(0)
}

fn options(args: &RuleArgs) -> LinkifyOptions {
    if args.first_only {
        LinkifyOptions::first_only()
    } else {
        LinkifyOptions::default()
    }
}

// Builds the rule list from the settings file and flag overrides
fn resolve_rules(args: &RuleArgs) -> Result<Vec<LinkRule>> {
    let mut settings = match &args.settings {
        Some(path) => SmartlinkSettings::load(path)?,
        None => SmartlinkSettings::default(),
    };

    if let Some(url) = &args.url {
        settings.smartlink_url = url.clone();
    }
    if let Some(keywords) = &args.keywords {
        settings.smartlink_keywords = keywords.clone();
    }

    // A strange URL is the site owner's call; link with it anyway
    if let Err(e) = settings.validate() {
        warn!("{e}");
    }

    let rules = settings.rules();
    if rules.is_empty() {
        warn!("no smartlink URL or keywords configured; output is unchanged");
    } else {
        info!(keywords = rules.len(), destination = %settings.smartlink_url.trim(), "rules loaded");
    }
    Ok(rules)
}

// Reads the article from a file, or stdin for None / "-"
fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("failed to read stdin")?;
            Ok(body)
        }
    }
}
