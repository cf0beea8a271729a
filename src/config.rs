//! Two-tier TOML configuration.
//!
//! A base document (`--config`, not meant to be user-edited) and an optional
//! custom overlay (`--custom-config`, or `custom.toml` next to the base)
//! are each parsed into an all-optional [`ConfigDoc`], merged once at
//! startup with overlay precedence, and resolved into a single immutable
//! [`Config`] that is passed explicitly through the pipeline.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::MsgError;
use crate::models::Category;
use crate::render::OutputMode;

/// Built-in fallback for `search.max_display_results`.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Built-in fallback for `search.default_files`.
pub const DEFAULT_FILES: [Category; 1] = [Category::Response];

/// Effective configuration after merging base and overlay. Read-only for
/// the rest of the run.
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourcesConfig,
    pub search: SearchConfig,
    pub stemming: StemmingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct SourcesConfig {
    /// Directory holding the bundled base sources (`response.json`, ...).
    pub base_dir: PathBuf,
    /// Optional directory of user-added sources, loaded after all base
    /// sources. Missing files here are not an error.
    pub custom_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Categories loaded when no category flag is given. Never empty.
    pub default_files: Vec<Category>,
    /// Default cap on keyword-search output count.
    pub max_display_results: usize,
}

#[derive(Debug, Clone)]
pub struct StemmingConfig {
    pub enabled: bool,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub mode: OutputMode,
}

/// One configuration layer as written on disk. Every field is optional so
/// the same shape serves both the base document and the overlay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDoc {
    #[serde(default)]
    pub sources: SourcesDoc,
    #[serde(default)]
    pub search: SearchDoc,
    #[serde(default)]
    pub stemming: StemmingDoc,
    #[serde(default)]
    pub output: OutputDoc,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesDoc {
    pub base_dir: Option<PathBuf>,
    pub custom_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDoc {
    pub default_files: Option<Vec<String>>,
    pub max_display_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StemmingDoc {
    pub enabled: Option<bool>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputDoc {
    pub mode: Option<String>,
}

/// Load the base document, merge the overlay if one exists, and resolve.
///
/// When `custom_path` is `None`, a `custom.toml` sitting next to the base
/// document is picked up automatically; its absence is not an error. An
/// explicitly passed overlay path must exist.
pub fn load_config(path: &Path, custom_path: Option<&Path>) -> Result<Config, MsgError> {
    let base = read_doc(path)?;

    let overlay = match custom_path {
        Some(p) => Some(read_doc(p)?),
        None => {
            let sibling = path.with_file_name("custom.toml");
            if sibling.exists() {
                Some(read_doc(&sibling)?)
            } else {
                None
            }
        }
    };

    let merged = match overlay {
        Some(over) => merge(base, over),
        None => base,
    };
    resolve(merged)
}

fn read_doc(path: &Path) -> Result<ConfigDoc, MsgError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MsgError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| MsgError::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Merge two layers: every overlay field that is set wins; unset overlay
/// fields fall through to the base.
fn merge(base: ConfigDoc, over: ConfigDoc) -> ConfigDoc {
    ConfigDoc {
        sources: SourcesDoc {
            base_dir: over.sources.base_dir.or(base.sources.base_dir),
            custom_dir: over.sources.custom_dir.or(base.sources.custom_dir),
        },
        search: SearchDoc {
            default_files: over.search.default_files.or(base.search.default_files),
            max_display_results: over
                .search
                .max_display_results
                .or(base.search.max_display_results),
        },
        stemming: StemmingDoc {
            enabled: over.stemming.enabled.or(base.stemming.enabled),
            language: over.stemming.language.or(base.stemming.language),
        },
        output: OutputDoc {
            mode: over.output.mode.or(base.output.mode),
        },
    }
}

/// Apply built-in defaults and validate. The resolved default category set
/// is never empty.
fn resolve(doc: ConfigDoc) -> Result<Config, MsgError> {
    let default_files = match doc.search.default_files {
        Some(names) if !names.is_empty() => {
            let mut cats = Vec::with_capacity(names.len());
            for name in &names {
                let cat = Category::from_name(name).ok_or_else(|| {
                    MsgError::Config(format!(
                        "unknown category '{}' in search.default_files",
                        name
                    ))
                })?;
                if !cats.contains(&cat) {
                    cats.push(cat);
                }
            }
            cats
        }
        _ => DEFAULT_FILES.to_vec(),
    };

    let max_display_results = doc
        .search
        .max_display_results
        .unwrap_or(DEFAULT_MAX_RESULTS);
    if max_display_results == 0 {
        return Err(MsgError::Config(
            "search.max_display_results must be >= 1".into(),
        ));
    }

    let mode = match doc.output.mode {
        Some(ref s) => OutputMode::parse(s).ok_or_else(|| {
            MsgError::Config(format!(
                "unknown output mode '{}'. Must be auto, pretty, or json.",
                s
            ))
        })?,
        None => OutputMode::Auto,
    };

    Ok(Config {
        sources: SourcesConfig {
            base_dir: doc
                .sources
                .base_dir
                .unwrap_or_else(|| PathBuf::from("./data")),
            custom_dir: doc.sources.custom_dir,
        },
        search: SearchConfig {
            default_files,
            max_display_results,
        },
        stemming: StemmingConfig {
            enabled: doc.stemming.enabled.unwrap_or(true),
            language: doc
                .stemming
                .language
                .unwrap_or_else(|| "english".to_string()),
        },
        output: OutputConfig { mode },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(toml_str: &str) -> ConfigDoc {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_resolve_empty_doc_uses_builtins() {
        let cfg = resolve(ConfigDoc::default()).unwrap();
        assert_eq!(cfg.search.default_files, vec![Category::Response]);
        assert_eq!(cfg.search.max_display_results, DEFAULT_MAX_RESULTS);
        assert!(cfg.stemming.enabled);
        assert_eq!(cfg.stemming.language, "english");
    }

    #[test]
    fn test_overlay_field_wins() {
        let base = doc("[search]\nmax_display_results = 10\ndefault_files = [\"response\"]");
        let over = doc("[search]\nmax_display_results = 3");
        let cfg = resolve(merge(base, over)).unwrap();
        // Overlay set -> wins; overlay unset -> base value survives.
        assert_eq!(cfg.search.max_display_results, 3);
        assert_eq!(cfg.search.default_files, vec![Category::Response]);
    }

    #[test]
    fn test_unknown_default_file_rejected() {
        let base = doc("[search]\ndefault_files = [\"response\", \"nonsense\"]");
        let err = resolve(base).unwrap_err();
        assert!(err.to_string().contains("nonsense"));
    }

    #[test]
    fn test_empty_default_files_falls_back() {
        let base = doc("[search]\ndefault_files = []");
        let cfg = resolve(base).unwrap();
        assert_eq!(cfg.search.default_files, vec![Category::Response]);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let base = doc("[search]\nmax_display_results = 0");
        assert!(resolve(base).is_err());
    }

    #[test]
    fn test_duplicate_default_files_deduplicated() {
        let base = doc("[search]\ndefault_files = [\"response\", \"response\", \"escalate\"]");
        let cfg = resolve(base).unwrap();
        assert_eq!(
            cfg.search.default_files,
            vec![Category::Response, Category::Escalate]
        );
    }

    #[test]
    fn test_unknown_output_mode_rejected() {
        let base = doc("[output]\nmode = \"fancy\"");
        assert!(resolve(base).is_err());
    }
}
