//! Pluggable word stemming.
//!
//! The search engine takes the stemmer as an optional injected capability.
//! When it is absent (disabled in config, or an unsupported language) the
//! engine degrades to substring containment in a single well-defined code
//! path; nothing here ever aborts the run.

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::StemmingConfig;

/// Reduces a word to a common linguistic root for broader matching.
pub trait TextStemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Snowball stemmer backed by `rust-stemmers`.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    /// `None` when the language is not a supported Snowball algorithm.
    pub fn new(language: &str) -> Option<Self> {
        algorithm_for(language).map(|alg| Self {
            inner: Stemmer::create(alg),
        })
    }
}

impl TextStemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }
}

fn algorithm_for(language: &str) -> Option<Algorithm> {
    match language.to_lowercase().as_str() {
        "danish" => Some(Algorithm::Danish),
        "dutch" => Some(Algorithm::Dutch),
        "english" => Some(Algorithm::English),
        "finnish" => Some(Algorithm::Finnish),
        "french" => Some(Algorithm::French),
        "german" => Some(Algorithm::German),
        "hungarian" => Some(Algorithm::Hungarian),
        "italian" => Some(Algorithm::Italian),
        "norwegian" => Some(Algorithm::Norwegian),
        "portuguese" => Some(Algorithm::Portuguese),
        "romanian" => Some(Algorithm::Romanian),
        "russian" => Some(Algorithm::Russian),
        "spanish" => Some(Algorithm::Spanish),
        "swedish" => Some(Algorithm::Swedish),
        "turkish" => Some(Algorithm::Turkish),
        _ => None,
    }
}

/// Build the stemming capability from config. Returns `None` (degraded
/// mode) when stemming is disabled or the language is unsupported; the
/// caller surfaces that as a warning.
pub fn from_config(cfg: &StemmingConfig) -> Option<Box<dyn TextStemmer>> {
    if !cfg.enabled {
        return None;
    }
    SnowballStemmer::new(&cfg.language).map(|s| Box::new(s) as Box<dyn TextStemmer>)
}
