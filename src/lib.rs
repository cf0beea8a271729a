//! # msgkit
//!
//! Support message template retrieval. The `msg` binary fetches
//! standardized templates either by exact identifier or by ranked keyword
//! search across categorized JSON data sources (responses, escalations,
//! workflows, dashboard links, analytics links, service info, URLs).
//!
//! ## Pipeline
//!
//! ```text
//! argv ──▶ query descriptor ──▶ store ──▶ resolver ──▶ session ──▶ renderer
//!                                  │          search ────▲
//!                                  └──────────────▲──────┘
//! ```
//!
//! Data flows one way. The store and the merged configuration are built
//! once per invocation and read-only afterwards; the process exits after
//! rendering.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Two-tier TOML configuration (base + custom overlay) |
//! | [`models`] | Entry, category, and content payload types |
//! | [`error`] | Error taxonomy (fatal vs. recovered) |
//! | [`store`] | JSON source loading and id-indexed entry collection |
//! | [`resolver`] | Exact identifier lookup |
//! | [`search`] | Keyword matching, scoring, and ranking |
//! | [`session`] | Result merging and limit budgeting |
//! | [`stem`] | Pluggable Snowball stemming |
//! | [`render`] | Pretty and raw-JSON result output |

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod resolver;
pub mod search;
pub mod session;
pub mod stem;
pub mod store;
