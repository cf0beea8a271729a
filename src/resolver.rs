//! Exact identifier lookup.
//!
//! Matching is exact after case-folding; there is no partial or fuzzy id
//! matching here. Tokens that resolve to nothing are handed back so the
//! dispatcher can reclassify them as keywords — that is how
//! `msg rsp1 payment` works as "id + keyword" in a single call.

use std::collections::HashSet;

use crate::models::Entry;
use crate::store::EntryStore;

/// Outcome of resolving the requested identifier tokens.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// Matched entries, in the order the tokens were given.
    pub matched: Vec<&'a Entry>,
    /// Tokens with no corresponding entry, in input order.
    pub unmatched: Vec<String>,
}

/// Resolve requested identifiers against the store. Repeated identical
/// identifiers (case-insensitively) are resolved once.
pub fn resolve_ids<'a>(store: &'a EntryStore, requested: &[String]) -> Resolution<'a> {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    let mut seen = HashSet::new();

    for token in requested {
        if !seen.insert(token.to_lowercase()) {
            continue;
        }
        match store.get(token) {
            Some(entry) => matched.push(entry),
            None => unmatched.push(token.clone()),
        }
    }

    Resolution { matched, unmatched }
}
