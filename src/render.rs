//! Result rendering.
//!
//! The renderer is selected once at startup from `output.mode` (or the
//! `--output` flag) and injected into the dispatcher, so the degraded path
//! is a single decision, not scattered probing. `auto` picks the pretty
//! renderer on a TTY and the raw JSON dump otherwise; the JSON form
//! preserves every validated field, so falling back is degraded but never
//! lossy.

use owo_colors::{AnsiColors, OwoColorize};

use crate::models::{Category, Entry};

/// Output mode for the CLI: auto-detect, force pretty, or force JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Auto,
    Pretty,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(OutputMode::Auto),
            "pretty" => Some(OutputMode::Pretty),
            "json" => Some(OutputMode::Json),
            _ => None,
        }
    }

    /// Build the renderer for this mode. `Auto` degrades to the JSON dump
    /// when stdout is not a terminal.
    pub fn renderer(&self) -> Box<dyn ResultRenderer> {
        match self {
            OutputMode::Pretty => Box::new(PrettyRenderer),
            OutputMode::Json => Box::new(JsonRenderer),
            OutputMode::Auto => {
                if atty::is(atty::Stream::Stdout) {
                    Box::new(PrettyRenderer)
                } else {
                    Box::new(JsonRenderer)
                }
            }
        }
    }
}

/// Formats the final ordered entry list to stdout.
pub trait ResultRenderer {
    fn render(&self, results: &[&Entry]);
}

/// Human-friendly blocks with category-coded color.
pub struct PrettyRenderer;

impl ResultRenderer for PrettyRenderer {
    fn render(&self, results: &[&Entry]) {
        if results.is_empty() {
            println!("No matches.");
            return;
        }
        for entry in results {
            let color = category_color(entry.category);
            println!(
                "{}  [{}]  {}",
                entry.id.color(color).bold(),
                entry.category.name().color(color),
                entry.description
            );
            println!("    tags: {}", entry.tags.join(", "));
            println!("    {}: {}", entry.content.field_name(), entry.content.value());
            println!();
        }
    }
}

/// The degraded path: matched entries in their validated JSON form, all
/// fields preserved.
pub struct JsonRenderer;

impl ResultRenderer for JsonRenderer {
    fn render(&self, results: &[&Entry]) {
        let values: Vec<serde_json::Value> = results.iter().map(|e| e.to_json()).collect();
        let doc = serde_json::Value::Array(values);
        match serde_json::to_string_pretty(&doc) {
            Ok(s) => println!("{}", s),
            // Value -> string cannot realistically fail; Display is the
            // last-resort compact form.
            Err(_) => println!("{}", doc),
        }
    }
}

fn category_color(category: Category) -> AnsiColors {
    match category {
        Category::Response => AnsiColors::Green,
        Category::Escalate => AnsiColors::Red,
        Category::Workflow => AnsiColors::Yellow,
        Category::Grafana => AnsiColors::Cyan,
        Category::DataLens => AnsiColors::Magenta,
        Category::Npc => AnsiColors::Blue,
        Category::Url => AnsiColors::White,
    }
}
