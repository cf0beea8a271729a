//! Keyword search over entry tags.
//!
//! Each keyword is matched against every tag of an entry under three modes,
//! best mode wins per keyword:
//!
//! - exact equality (weight 4),
//! - stemmed equality via the injected stemmer (weight 2); with no stemmer
//!   this degrades to `tag.contains(keyword)`,
//! - decomposition (weight 1): the tag is split on separators and any
//!   sub-token is tested exactly or by the stemmed rule, so `studio`
//!   matches the compound tag `ai-studio`.
//!
//! Keywords combine with AND semantics: an entry missing any keyword is
//! excluded regardless of its partial score. The result is ordered by
//! score descending, then ascending id — never by load order, which is
//! meaningless to users. Truncation to the effective limit happens in the
//! session, which needs the identifier-match count first.

use crate::models::Entry;
use crate::stem::TextStemmer;
use crate::store::EntryStore;

pub const WEIGHT_EXACT: u32 = 4;
pub const WEIGHT_STEMMED: u32 = 2;
pub const WEIGHT_DECOMPOSED: u32 = 1;

/// Separators a compound tag is split on for decomposition matching.
const TAG_SEPARATORS: &[char] = &['-', '_', '.', '/', ' '];

/// An entry together with its summed per-keyword match weight.
#[derive(Debug, Clone)]
pub struct ScoredEntry<'a> {
    pub entry: &'a Entry,
    pub score: u32,
}

/// Lowercase, trim, drop empties, and deduplicate while preserving order.
pub fn normalize_keywords<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keywords: Vec<String> = Vec::new();
    for token in raw {
        let norm = token.as_ref().trim().to_lowercase();
        if !norm.is_empty() && !keywords.contains(&norm) {
            keywords.push(norm);
        }
    }
    keywords
}

/// Rank every entry matching ALL keywords. Zero keywords yields an empty
/// list — a search requires at least one term; listing is a separate path.
pub fn search<'a>(
    store: &'a EntryStore,
    keywords: &[String],
    stemmer: Option<&dyn TextStemmer>,
) -> Vec<ScoredEntry<'a>> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut scored = Vec::new();
    'entries: for entry in store.entries() {
        let tags: Vec<String> = entry.tags.iter().map(|t| t.to_lowercase()).collect();
        let mut score = 0;
        for keyword in keywords {
            match best_weight(keyword, &tags, stemmer) {
                Some(weight) => score += weight,
                None => continue 'entries,
            }
        }
        scored.push(ScoredEntry { entry, score });
    }

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.entry.id.to_lowercase().cmp(&b.entry.id.to_lowercase()))
    });
    scored
}

/// Highest weight the keyword achieves against any tag, or `None` when the
/// keyword misses the entry entirely.
fn best_weight(keyword: &str, tags: &[String], stemmer: Option<&dyn TextStemmer>) -> Option<u32> {
    tags.iter()
        .filter_map(|tag| match_tag(keyword, tag, stemmer))
        .max()
}

fn match_tag(keyword: &str, tag: &str, stemmer: Option<&dyn TextStemmer>) -> Option<u32> {
    if tag == keyword {
        return Some(WEIGHT_EXACT);
    }
    if stem_eq(keyword, tag, stemmer) {
        return Some(WEIGHT_STEMMED);
    }
    if tag
        .split(TAG_SEPARATORS)
        .any(|sub| sub == keyword || stem_eq(keyword, sub, stemmer))
    {
        return Some(WEIGHT_DECOMPOSED);
    }
    None
}

/// Stemmed equality, degrading to containment of the keyword in the tag
/// when no stemmer is available. The fallback is one-way: `run` matches
/// the tag `running`, but `running` does not match `run`.
fn stem_eq(keyword: &str, tag: &str, stemmer: Option<&dyn TextStemmer>) -> bool {
    match stemmer {
        Some(s) => s.stem(keyword) == s.stem(tag),
        None => tag.contains(keyword),
    }
}
