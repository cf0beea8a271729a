//! Result aggregation: one invocation's merge of identifier matches and
//! ranked keyword matches into the final display order.
//!
//! Identifier matches are a direct request and are always included in full,
//! never truncated by the limit. Keyword matches fill whatever budget
//! remains, skipping entries already present via an identifier.

use std::collections::HashSet;

use crate::config::Config;
use crate::models::Entry;
use crate::search::ScoredEntry;

/// Resolve the effective result limit: CLI trailing integer over the
/// configured `max_display_results` (which itself already absorbed the
/// built-in fallback at config resolution).
pub fn effective_limit(cli_override: Option<usize>, config: &Config) -> usize {
    cli_override.unwrap_or(config.search.max_display_results)
}

/// Merge identifier matches (request order) with keyword matches (score
/// order) under the effective limit.
pub fn aggregate<'a>(
    id_matches: Vec<&'a Entry>,
    keyword_matches: &[ScoredEntry<'a>],
    limit: usize,
) -> Vec<&'a Entry> {
    let mut results = id_matches;
    let present: HashSet<String> = results.iter().map(|e| e.id.to_lowercase()).collect();

    let remaining = limit.saturating_sub(results.len());
    results.extend(
        keyword_matches
            .iter()
            .filter(|s| !present.contains(&s.entry.id.to_lowercase()))
            .take(remaining)
            .map(|s| s.entry),
    );
    results
}
