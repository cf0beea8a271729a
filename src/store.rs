//! Entry store: loads the configured JSON sources into an immutable,
//! id-indexed collection.
//!
//! Sources are read concurrently (one task per file) but merged strictly in
//! the resolved source order — base files in category order, then custom
//! files — so id-collision resolution does not depend on which read
//! finishes first. A broken source or record is skipped and recorded as a
//! warning; only a corpus that ends up empty is fatal, and that check is
//! the dispatcher's.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::MsgError;
use crate::models::{Category, Content, Entry, RawRecord};

/// In-memory entry collection with O(1) case-folded id lookup.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    by_id: HashMap<String, usize>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact lookup after case-folding.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.by_id
            .get(&id.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert unless the id (case-insensitively) is already present.
    /// The earliest-loaded entry wins; a rejected duplicate comes back to
    /// the caller for the warning.
    pub fn insert(&mut self, entry: Entry) -> Result<(), Entry> {
        let key = entry.id.to_lowercase();
        if self.by_id.contains_key(&key) {
            return Err(entry);
        }
        self.by_id.insert(key, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }
}

/// Outcome of a load: the store plus every recovered failure.
#[derive(Debug)]
pub struct LoadReport {
    pub store: EntryStore,
    pub warnings: Vec<MsgError>,
}

/// One source file scheduled for loading.
#[derive(Debug, Clone)]
struct SourceSpec {
    path: PathBuf,
    category: Category,
    /// Base sources must exist; custom ones may be absent without a warning.
    required: bool,
}

/// Ordered source list for the active category filter: base files first
/// (in [`Category::ALL`] order restricted to the filter), then custom files.
fn resolve_sources(config: &Config, filter: &[Category]) -> Vec<SourceSpec> {
    let mut sources = Vec::new();
    for cat in Category::ALL {
        if filter.contains(&cat) {
            sources.push(SourceSpec {
                path: config.sources.base_dir.join(cat.file_name()),
                category: cat,
                required: true,
            });
        }
    }
    if let Some(custom_dir) = &config.sources.custom_dir {
        for cat in Category::ALL {
            if filter.contains(&cat) {
                sources.push(SourceSpec {
                    path: custom_dir.join(cat.file_name()),
                    category: cat,
                    required: false,
                });
            }
        }
    }
    sources
}

/// Load all sources for the active filter. Reads run concurrently; the
/// merge below walks the handles in source order, so first-loaded-wins is
/// deterministic.
pub async fn load_store(config: &Config, filter: &[Category]) -> LoadReport {
    let sources = resolve_sources(config, filter);

    let mut handles = Vec::with_capacity(sources.len());
    for spec in &sources {
        let path = spec.path.clone();
        handles.push(tokio::spawn(
            async move { tokio::fs::read_to_string(&path).await },
        ));
    }

    let mut store = EntryStore::new();
    let mut warnings = Vec::new();

    for (spec, handle) in sources.into_iter().zip(handles) {
        let read = match handle.await {
            Ok(read) => read,
            Err(e) => {
                warnings.push(MsgError::Load {
                    path: spec.path,
                    reason: format!("load task failed: {}", e),
                });
                continue;
            }
        };
        match read {
            Ok(content) => merge_source(&mut store, &mut warnings, &spec, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !spec.required => {}
            Err(e) => {
                warnings.push(MsgError::Load {
                    path: spec.path,
                    reason: e.to_string(),
                });
            }
        }
    }

    LoadReport { store, warnings }
}

/// Parse one source file and fold its valid records into the store.
fn merge_source(
    store: &mut EntryStore,
    warnings: &mut Vec<MsgError>,
    spec: &SourceSpec,
    content: &str,
) {
    let records: Vec<RawRecord> = match serde_json::from_str(content) {
        Ok(records) => records,
        Err(e) => {
            warnings.push(MsgError::Load {
                path: spec.path.clone(),
                reason: format!("not a valid JSON record array: {}", e),
            });
            return;
        }
    };

    for raw in records {
        match validate_record(raw, spec) {
            Ok(entry) => {
                if let Err(dup) = store.insert(entry) {
                    warnings.push(MsgError::Validation {
                        path: spec.path.clone(),
                        id: dup.id,
                        reason: "duplicate id, earlier entry kept".into(),
                    });
                }
            }
            Err(w) => warnings.push(w),
        }
    }
}

/// Per-record validation: id, description, non-empty tags, and exactly the
/// content field the source category requires.
fn validate_record(raw: RawRecord, spec: &SourceSpec) -> Result<Entry, MsgError> {
    let reject = |id: &str, reason: String| MsgError::Validation {
        path: spec.path.clone(),
        id: id.to_string(),
        reason,
    };

    let id = match raw.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => return Err(reject("?", "missing id".into())),
    };
    let description = raw
        .description
        .clone()
        .ok_or_else(|| reject(&id, "missing description".into()))?;
    if raw.tags.is_empty() {
        return Err(reject(&id, "tags must be non-empty".into()));
    }

    let present = raw.content_fields();
    let (field, value) = match present.as_slice() {
        [one] => *one,
        [] => return Err(reject(&id, "no content field".into())),
        many => {
            let names: Vec<&str> = many.iter().map(|(name, _)| *name).collect();
            return Err(reject(
                &id,
                format!("multiple content fields: {}", names.join(", ")),
            ));
        }
    };

    let expected = spec.category.content_field();
    if field != expected {
        return Err(reject(
            &id,
            format!(
                "content field '{}' does not belong in a {} source (expected '{}')",
                field,
                spec.category.name(),
                expected
            ),
        ));
    }

    let content = match spec.category {
        Category::Response | Category::Escalate => Content::Message(value.clone()),
        Category::Workflow | Category::Npc => Content::Text(value.clone()),
        Category::Grafana => Content::GrafanaUrl(value.clone()),
        Category::DataLens => Content::DatalensUrl(value.clone()),
        Category::Url => Content::Url(value.clone()),
    };

    Ok(Entry {
        id,
        description,
        tags: raw.tags,
        category: spec.category,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(category: Category) -> SourceSpec {
        SourceSpec {
            path: PathBuf::from(category.file_name()),
            category,
            required: true,
        }
    }

    fn raw(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_record() {
        let entry = validate_record(
            raw(r#"{"id":"rsp1","description":"d","tags":["payment"],"message":"m"}"#),
            &spec(Category::Response),
        )
        .unwrap();
        assert_eq!(entry.id, "rsp1");
        assert_eq!(entry.content, Content::Message("m".into()));
    }

    #[test]
    fn test_missing_id_rejected() {
        let err = validate_record(
            raw(r#"{"description":"d","tags":["t"],"message":"m"}"#),
            &spec(Category::Response),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing id"));
    }

    #[test]
    fn test_empty_tags_rejected() {
        let err = validate_record(
            raw(r#"{"id":"rsp1","description":"d","tags":[],"message":"m"}"#),
            &spec(Category::Response),
        )
        .unwrap_err();
        assert!(err.to_string().contains("tags"));
    }

    #[test]
    fn test_multiple_content_fields_rejected() {
        let err = validate_record(
            raw(r#"{"id":"rsp1","description":"d","tags":["t"],"message":"m","url":"u"}"#),
            &spec(Category::Response),
        )
        .unwrap_err();
        assert!(err.to_string().contains("multiple content fields"));
    }

    #[test]
    fn test_wrong_content_field_for_category_rejected() {
        let err = validate_record(
            raw(r#"{"id":"grf1","description":"d","tags":["t"],"message":"m"}"#),
            &spec(Category::Grafana),
        )
        .unwrap_err();
        assert!(err.to_string().contains("grafana_url"));
    }

    #[test]
    fn test_store_lookup_case_insensitive() {
        let mut store = EntryStore::new();
        store
            .insert(Entry {
                id: "Rsp1".into(),
                description: "d".into(),
                tags: vec!["t".into()],
                category: Category::Response,
                content: Content::Message("m".into()),
            })
            .unwrap();
        assert!(store.get("RSP1").is_some());
        assert!(store.get("rsp1").is_some());
        assert!(store.get("rsp2").is_none());
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let mut store = EntryStore::new();
        let first = Entry {
            id: "rsp1".into(),
            description: "first".into(),
            tags: vec!["t".into()],
            category: Category::Response,
            content: Content::Message("m1".into()),
        };
        let second = Entry {
            id: "RSP1".into(),
            description: "second".into(),
            tags: vec!["t".into()],
            category: Category::Response,
            content: Content::Message("m2".into()),
        };
        store.insert(first).unwrap();
        let rejected = store.insert(second).unwrap_err();
        assert_eq!(rejected.description, "second");
        assert_eq!(store.get("rsp1").unwrap().description, "first");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_source_skips_invalid_records() {
        let mut store = EntryStore::new();
        let mut warnings = Vec::new();
        let content = r#"[
            {"id":"rsp1","description":"ok","tags":["payment"],"message":"m"},
            {"id":"rsp2","description":"no tags","tags":[],"message":"m"},
            {"id":"rsp3","description":"ok too","tags":["billing"],"message":"m"}
        ]"#;
        merge_source(&mut store, &mut warnings, &spec(Category::Response), content);
        assert_eq!(store.len(), 2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_merge_source_malformed_json_is_one_warning() {
        let mut store = EntryStore::new();
        let mut warnings = Vec::new();
        merge_source(
            &mut store,
            &mut warnings,
            &spec(Category::Response),
            "{ not an array",
        );
        assert!(store.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("failed to load"));
    }

    #[tokio::test]
    async fn test_load_store_merges_in_source_order() {
        use crate::config::{OutputConfig, SearchConfig, SourcesConfig, StemmingConfig};
        use crate::render::OutputMode;

        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("base");
        let custom = tmp.path().join("custom");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::create_dir_all(&custom).unwrap();
        std::fs::write(
            base.join("response.json"),
            r#"[{"id":"rsp1","description":"base","tags":["payment"],"message":"m"}]"#,
        )
        .unwrap();
        // Same id in the custom layer: base loaded first, so base wins.
        std::fs::write(
            custom.join("response.json"),
            r#"[{"id":"rsp1","description":"custom","tags":["payment"],"message":"m"},
                {"id":"rsp9","description":"custom only","tags":["vpn"],"message":"m"}]"#,
        )
        .unwrap();

        let config = Config {
            sources: SourcesConfig {
                base_dir: base,
                custom_dir: Some(custom),
            },
            search: SearchConfig {
                default_files: vec![Category::Response],
                max_display_results: 5,
            },
            stemming: StemmingConfig {
                enabled: true,
                language: "english".into(),
            },
            output: OutputConfig {
                mode: OutputMode::Json,
            },
        };

        let report = load_store(&config, &[Category::Response]).await;
        assert_eq!(report.store.len(), 2);
        assert_eq!(report.store.get("rsp1").unwrap().description, "base");
        assert!(report.store.get("rsp9").is_some());
        // The shadowed custom duplicate is a warning, not an error.
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_load_store_missing_custom_file_is_silent() {
        use crate::config::{OutputConfig, SearchConfig, SourcesConfig, StemmingConfig};
        use crate::render::OutputMode;

        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("base");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(
            base.join("response.json"),
            r#"[{"id":"rsp1","description":"d","tags":["payment"],"message":"m"}]"#,
        )
        .unwrap();

        let config = Config {
            sources: SourcesConfig {
                base_dir: base,
                custom_dir: Some(tmp.path().join("missing-custom")),
            },
            search: SearchConfig {
                default_files: vec![Category::Response],
                max_display_results: 5,
            },
            stemming: StemmingConfig {
                enabled: true,
                language: "english".into(),
            },
            output: OutputConfig {
                mode: OutputMode::Json,
            },
        };

        let report = load_store(&config, &[Category::Response]).await;
        assert_eq!(report.store.len(), 1);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_load_store_missing_base_file_warns() {
        use crate::config::{OutputConfig, SearchConfig, SourcesConfig, StemmingConfig};
        use crate::render::OutputMode;

        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("base");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(
            base.join("response.json"),
            r#"[{"id":"rsp1","description":"d","tags":["payment"],"message":"m"}]"#,
        )
        .unwrap();
        // escalate.json deliberately absent.

        let config = Config {
            sources: SourcesConfig {
                base_dir: base,
                custom_dir: None,
            },
            search: SearchConfig {
                default_files: vec![Category::Response, Category::Escalate],
                max_display_results: 5,
            },
            stemming: StemmingConfig {
                enabled: true,
                language: "english".into(),
            },
            output: OutputConfig {
                mode: OutputMode::Json,
            },
        };

        let report = load_store(&config, &[Category::Response, Category::Escalate]).await;
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }
}
