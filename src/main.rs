//! # msg — support message template retrieval
//!
//! One flat invocation: `msg [flags] [identifier|keyword ...] [limit]`.
//!
//! | Invocation | Meaning |
//! |------------|---------|
//! | `msg` | List every entry in the active categories, id order |
//! | `msg rsp1` | Fetch the entry with id `rsp1` |
//! | `msg payment billing` | Keyword search (AND across keywords) |
//! | `msg rsp1 payment` | Id fetch plus keyword search in one call |
//! | `msg payment 3` | Keyword search, at most 3 results |
//! | `msg --escalate vpn` | Search only the escalation source |
//! | `msg --all-files checkout` | Search every category |
//!
//! Category flags select which sources load; with no flag the configured
//! `search.default_files` applies. A trailing bare integer caps the
//! keyword-result count (identifier matches are never capped).
//!
//! Exit codes: 0 success (including "no matches"), 1 fatal
//! (configuration error or nothing loadable), 3 completed with
//! degradation warnings (skipped sources/records, stemming unavailable).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use msgkit::config::{self, Config};
use msgkit::error::MsgError;
use msgkit::models::{Category, Entry};
use msgkit::render::OutputMode;
use msgkit::resolver;
use msgkit::search;
use msgkit::session;
use msgkit::stem;
use msgkit::store;

/// Exit code for a run that completed with degradation warnings.
const EXIT_WARNINGS: i32 = 3;

#[derive(Parser)]
#[command(
    name = "msg",
    about = "Fetch support message templates by id or ranked keyword search",
    version,
    long_about = "msg retrieves standardized support message templates from categorized JSON \
    sources. Tokens that look like known identifiers (rsp1, esc2, ...) are fetched directly; \
    everything else is treated as keywords and matched against entry tags with exact, stemmed, \
    and compound-tag decomposition strategies. A trailing bare integer caps the number of \
    keyword results."
)]
struct Cli {
    /// Path to the base configuration file (TOML).
    #[arg(long, default_value = "./config/msg.toml")]
    config: PathBuf,

    /// Path to the custom overlay configuration. Defaults to a
    /// `custom.toml` next to the base file, if present.
    #[arg(long)]
    custom_config: Option<PathBuf>,

    /// Output mode: auto, pretty, or json. Overrides `output.mode`.
    #[arg(long, value_parser = parse_output_mode)]
    output: Option<OutputMode>,

    /// Load the response source.
    #[arg(long)]
    response: bool,

    /// Load the escalation source.
    #[arg(long)]
    escalate: bool,

    /// Load the workflow source.
    #[arg(long)]
    workflow: bool,

    /// Load the Grafana dashboard source.
    #[arg(long)]
    grafana: bool,

    /// Load the DataLens analytics source.
    #[arg(long)]
    datalens: bool,

    /// Load the service-info source.
    #[arg(long)]
    npc: bool,

    /// Load the general URL source.
    #[arg(long)]
    url: bool,

    /// Load every category.
    #[arg(long = "all-files")]
    all_files: bool,

    /// Identifiers and keywords, optionally ending in a bare result limit.
    tokens: Vec<String>,
}

fn parse_output_mode(s: &str) -> std::result::Result<OutputMode, String> {
    OutputMode::parse(s).ok_or_else(|| format!("unknown output mode '{}'", s))
}

impl Cli {
    /// Explicit category flags, `--all-files`, or the configured default.
    /// Never empty: config resolution guarantees a non-empty default set.
    fn category_filter(&self, config: &Config) -> Vec<Category> {
        if self.all_files {
            return Category::ALL.to_vec();
        }
        let flags = [
            (self.response, Category::Response),
            (self.escalate, Category::Escalate),
            (self.workflow, Category::Workflow),
            (self.grafana, Category::Grafana),
            (self.datalens, Category::DataLens),
            (self.npc, Category::Npc),
            (self.url, Category::Url),
        ];
        let selected: Vec<Category> = flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, cat)| *cat)
            .collect();
        if selected.is_empty() {
            config.search.default_files.clone()
        } else {
            selected
        }
    }
}

/// The parsed representation of one invocation's tokens.
#[derive(Debug, PartialEq, Eq)]
struct QueryTokens {
    identifiers: Vec<String>,
    keywords: Vec<String>,
    limit: Option<usize>,
}

impl QueryTokens {
    fn is_list_mode(&self) -> bool {
        self.identifiers.is_empty() && self.keywords.is_empty() && self.limit.is_none()
    }
}

/// Split raw tokens into identifier candidates, keywords, and an optional
/// trailing limit. A token of the shape `<known-prefix><digits>` is an
/// identifier candidate; the resolver sends misses back as keywords.
/// A trailing limit of `0` is rejected, the same floor config resolution
/// enforces for `search.max_display_results`.
fn classify_tokens(tokens: &[String]) -> Result<QueryTokens> {
    let mut tokens = tokens.to_vec();
    let mut limit = None;
    if let Some(last) = tokens.last() {
        if let Ok(n) = last.parse::<usize>() {
            if n == 0 {
                bail!("result limit must be >= 1");
            }
            limit = Some(n);
            tokens.pop();
        }
    }

    let mut identifiers = Vec::new();
    let mut keywords = Vec::new();
    for token in tokens {
        if is_identifier_token(&token) {
            identifiers.push(token);
        } else {
            keywords.push(token);
        }
    }
    Ok(QueryTokens {
        identifiers,
        keywords,
        limit,
    })
}

fn is_identifier_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    Category::ALL.iter().any(|cat| {
        lower
            .strip_prefix(cat.id_prefix())
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(&cli.config, cli.custom_config.as_deref())
        .with_context(|| format!("cannot start with config {}", cli.config.display()))?;

    let filter = cli.category_filter(&config);
    let renderer = cli.output.unwrap_or(config.output.mode).renderer();
    let query = classify_tokens(&cli.tokens)?;

    let mut warnings: Vec<String> = Vec::new();

    let stemmer = stem::from_config(&config.stemming);
    if stemmer.is_none() {
        if config.stemming.enabled {
            warnings.push(format!(
                "stemming unavailable for language '{}'; falling back to substring matching",
                config.stemming.language
            ));
        } else {
            warnings.push("stemming disabled; falling back to substring matching".into());
        }
    }

    let report = store::load_store(&config, &filter).await;
    warnings.extend(report.warnings.iter().map(|w| w.to_string()));
    let store = report.store;
    if store.is_empty() {
        for warning in &warnings {
            eprintln!("warning: {}", warning);
        }
        return Err(MsgError::EmptyCorpus.into());
    }

    let results: Vec<&Entry> = if query.is_list_mode() {
        // List mode bypasses scoring: every loaded entry, ascending id.
        let mut all: Vec<&Entry> = store.entries().iter().collect();
        all.sort_by(|a, b| a.id.to_lowercase().cmp(&b.id.to_lowercase()));
        all
    } else {
        let resolution = resolver::resolve_ids(&store, &query.identifiers);

        let mut keyword_tokens = query.keywords.clone();
        keyword_tokens.extend(resolution.unmatched.iter().cloned());
        let keywords = search::normalize_keywords(&keyword_tokens);

        let ranked = search::search(&store, &keywords, stemmer.as_deref());
        let limit = session::effective_limit(query.limit, &config);
        session::aggregate(resolution.matched, &ranked, limit)
    };

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }
    renderer.render(&results);

    if !warnings.is_empty() {
        std::process::exit(EXIT_WARNINGS);
    }
    Ok(())
}
