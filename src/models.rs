//! Core data models used throughout msgkit.
//!
//! These types represent the categorized message templates that flow through
//! the load, resolve, search, and render pipeline. Every entry is immutable
//! after load.

use serde::Deserialize;

/// Classification of an entry, derived from the source file it was loaded
/// from. Each category fixes the source file name, the identifier prefix,
/// and the content field its records must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Response,
    Escalate,
    Workflow,
    Grafana,
    DataLens,
    Npc,
    Url,
}

impl Category {
    /// All categories in load order. Base sources merge in this order, so
    /// collision resolution is stable.
    pub const ALL: [Category; 7] = [
        Category::Response,
        Category::Escalate,
        Category::Workflow,
        Category::Grafana,
        Category::DataLens,
        Category::Npc,
        Category::Url,
    ];

    /// Canonical lowercase name, used in config (`default_files`) and in
    /// the JSON output form.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Response => "response",
            Category::Escalate => "escalate",
            Category::Workflow => "workflow",
            Category::Grafana => "grafana",
            Category::DataLens => "datalens",
            Category::Npc => "npc",
            Category::Url => "url",
        }
    }

    /// Source file name for this category, relative to a source directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Identifier prefix. A token of the shape `<prefix><digits>` is treated
    /// as an identifier request for this category.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::Response => "rsp",
            Category::Escalate => "esc",
            Category::Workflow => "wfl",
            Category::Grafana => "grf",
            Category::DataLens => "dtl",
            Category::Npc => "npc",
            Category::Url => "url",
        }
    }

    /// The content field a record in this category must populate.
    pub fn content_field(&self) -> &'static str {
        match self {
            Category::Response | Category::Escalate => "message",
            Category::Workflow | Category::Npc => "text",
            Category::Grafana => "grafana_url",
            Category::DataLens => "datalens_url",
            Category::Url => "url",
        }
    }

    /// Parse a canonical category name (as accepted in `default_files`).
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// The per-category payload of an entry. Exactly one content field is
/// populated per source record; the variant carries which one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// `message` — a ready-to-send support message (Response, Escalate).
    Message(String),
    /// `text` — free-form informational text (Workflow, Npc).
    Text(String),
    /// `grafana_url` — a dashboard link (Grafana).
    GrafanaUrl(String),
    /// `datalens_url` — an analytics link (DataLens).
    DatalensUrl(String),
    /// `url` — a general resource link (Url).
    Url(String),
}

impl Content {
    /// The source-record field name this payload was read from.
    pub fn field_name(&self) -> &'static str {
        match self {
            Content::Message(_) => "message",
            Content::Text(_) => "text",
            Content::GrafanaUrl(_) => "grafana_url",
            Content::DatalensUrl(_) => "datalens_url",
            Content::Url(_) => "url",
        }
    }

    /// The payload text itself.
    pub fn value(&self) -> &str {
        match self {
            Content::Message(s)
            | Content::Text(s)
            | Content::GrafanaUrl(s)
            | Content::DatalensUrl(s)
            | Content::Url(s) => s,
        }
    }
}

/// One retrievable message template.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Unique within the loaded corpus under case-insensitive comparison.
    pub id: String,
    pub description: String,
    /// Non-empty; the basis of keyword matching.
    pub tags: Vec<String>,
    pub category: Category,
    pub content: Content,
}

impl Entry {
    /// The entry's validated JSON form: the source-record shape plus the
    /// derived category. Used by the JSON renderer.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("id".into(), serde_json::Value::String(self.id.clone()));
        map.insert(
            "category".into(),
            serde_json::Value::String(self.category.name().to_string()),
        );
        map.insert(
            "description".into(),
            serde_json::Value::String(self.description.clone()),
        );
        map.insert(
            "tags".into(),
            serde_json::Value::Array(
                self.tags
                    .iter()
                    .map(|t| serde_json::Value::String(t.clone()))
                    .collect(),
            ),
        );
        map.insert(
            self.content.field_name().into(),
            serde_json::Value::String(self.content.value().to_string()),
        );
        serde_json::Value::Object(map)
    }
}

/// A source record as it appears on disk, before validation. All fields are
/// optional here so a broken record can be skipped with a precise warning
/// instead of failing the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub message: Option<String>,
    pub text: Option<String>,
    pub grafana_url: Option<String>,
    pub datalens_url: Option<String>,
    pub url: Option<String>,
}

impl RawRecord {
    /// All populated content fields as `(field name, value)` pairs.
    pub fn content_fields(&self) -> Vec<(&'static str, &String)> {
        let mut present = Vec::new();
        if let Some(v) = &self.message {
            present.push(("message", v));
        }
        if let Some(v) = &self.text {
            present.push(("text", v));
        }
        if let Some(v) = &self.grafana_url {
            present.push(("grafana_url", v));
        }
        if let Some(v) = &self.datalens_url {
            present.push(("datalens_url", v));
        }
        if let Some(v) = &self.url {
            present.push(("url", v));
        }
        present
    }
}
